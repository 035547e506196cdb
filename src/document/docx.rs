//! DOCX export: a minimal WordprocessingML package.

use std::{
    fmt::{self, Write as FmtWrite},
    io::{Cursor, Write},
};

use quick_xml::escape::escape;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::document::{
    export::{ExportError, ExportResult},
    rules::{export_plan, sanitize_for_export, ExportBlock},
    shape::NormalizedContent,
};

pub const HEADING_BLUE: &str = "1E40AF";
pub const SUBHEADING_PURPLE: &str = "581C87";
pub const CORRECT_GREEN: &str = "22C55E";
pub const MUTED_GRAY: &str = "6B7280";
pub const BLACK: &str = "000000";

const HEADING_SPACING_AFTER: u32 = 200;
const BODY_SPACING_AFTER: u32 = 120;
const BODY_SIZE: u32 = 22;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style></w:styles>"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParagraphStyle {
    Heading1,
    Heading2,
}

impl ParagraphStyle {
    fn style_id(&self) -> &'static str {
        match self {
            ParagraphStyle::Heading1 => "Heading1",
            ParagraphStyle::Heading2 => "Heading2",
        }
    }
}

/// A single-run paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocxParagraph {
    pub style: Option<ParagraphStyle>,
    pub spacing_after: u32,
    pub text: String,
    pub bold: bool,
    /// Half-points, as stored in `w:sz`.
    pub size: u32,
    pub color: &'static str,
}

impl DocxParagraph {
    fn heading(style: ParagraphStyle, text: String, size: u32, color: &'static str) -> Self {
        Self {
            style: Some(style),
            spacing_after: HEADING_SPACING_AFTER,
            text,
            bold: true,
            size,
            color,
        }
    }

    fn body(text: String, bold: bool, color: &'static str) -> Self {
        Self {
            style: None,
            spacing_after: BODY_SPACING_AFTER,
            text,
            bold,
            size: BODY_SIZE,
            color,
        }
    }

    fn write_xml(&self, xml: &mut String) -> ExportResult<()> {
        xml.push_str("<w:p><w:pPr>");
        if let Some(style) = self.style {
            write!(xml, "<w:pStyle w:val=\"{}\"/>", style.style_id()).map_err(xml_error)?;
        }
        write!(
            xml,
            "<w:spacing w:after=\"{}\"/><w:jc w:val=\"left\"/></w:pPr><w:r><w:rPr>",
            self.spacing_after
        )
        .map_err(xml_error)?;
        if self.bold {
            xml.push_str("<w:b/><w:bCs/>");
        }
        write!(
            xml,
            "<w:color w:val=\"{}\"/><w:sz w:val=\"{}\"/><w:szCs w:val=\"{}\"/></w:rPr>",
            self.color, self.size, self.size
        )
        .map_err(xml_error)?;
        write!(
            xml,
            "<w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            escape(self.text.as_str())
        )
        .map_err(xml_error)
    }
}

fn xml_error(err: fmt::Error) -> ExportError {
    ExportError::Docx(format!("document.xml: {}", err))
}

/// Map the shared export plan onto DOCX paragraphs. Gaps have no DOCX
/// counterpart; paragraph spacing covers them.
pub fn paragraphs(plan: &[ExportBlock]) -> Vec<DocxParagraph> {
    plan.iter()
        .filter_map(|block| {
            let text = block.text()?;
            let paragraph = match block {
                ExportBlock::Heading(_) => {
                    DocxParagraph::heading(ParagraphStyle::Heading1, text, 32, HEADING_BLUE)
                }
                ExportBlock::Subheading(_) => {
                    DocxParagraph::heading(ParagraphStyle::Heading2, text, 28, SUBHEADING_PURPLE)
                }
                ExportBlock::SectionLine(_) => DocxParagraph::body(text, true, HEADING_BLUE),
                ExportBlock::QuestionPrompt(_) => DocxParagraph::body(text, true, BLACK),
                ExportBlock::QuizOption { correct, .. } => DocxParagraph::body(
                    text,
                    *correct,
                    if *correct { CORRECT_GREEN } else { BLACK },
                ),
                ExportBlock::Explanation(_) => DocxParagraph::body(text, false, MUTED_GRAY),
                ExportBlock::Paragraph(_) | ExportBlock::BranchItem(_) => {
                    DocxParagraph::body(text, false, BLACK)
                }
                ExportBlock::Gap(_) => return None,
            };
            Some(paragraph)
        })
        .collect()
}

pub fn document_xml(paragraphs: &[DocxParagraph]) -> ExportResult<String> {
    let mut xml = String::with_capacity(512 + paragraphs.len() * 256);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>"#);
    for paragraph in paragraphs {
        paragraph.write_xml(&mut xml)?;
    }
    xml.push_str(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1134" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#);
    xml.push_str("</w:body></w:document>");
    Ok(xml)
}

fn core_properties_xml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title><dc:creator>study-forge</dc:creator></cp:coreProperties>"#,
        escape(sanitize_for_export(title).as_str())
    )
}

pub fn render_docx(content: &NormalizedContent, topic: &str) -> ExportResult<Vec<u8>> {
    let document = document_xml(&paragraphs(&export_plan(content, topic)))?;
    let core = core_properties_xml(topic);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        ("docProps/core.xml", core.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/document.xml", document.as_bytes()),
    ];
    for (name, data) in parts {
        writer.start_file(name, options)?;
        writer.write_all(data)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{kind::ContentKind, normalizer::normalize};
    use serde_json::json;
    use std::io::Read;

    #[test]
    fn free_text_maps_to_headings_and_body() {
        let content = normalize(
            ContentKind::Notes,
            &json!("Photosynthesis\nHow plants make food\nChlorophyll absorbs light.\nThis is a short fact"),
            "Plants",
        );
        let paragraphs = paragraphs(&export_plan(&content, "Plants"));

        assert_eq!(paragraphs.len(), 4);
        assert_eq!(paragraphs[0].style, Some(ParagraphStyle::Heading1));
        assert_eq!(paragraphs[0].color, HEADING_BLUE);
        assert_eq!(paragraphs[1].style, Some(ParagraphStyle::Heading2));
        assert_eq!(paragraphs[1].color, SUBHEADING_PURPLE);
        assert!(!paragraphs[2].bold);
        assert_eq!(paragraphs[3].text, "This is a short fact");
        assert!(paragraphs[3].bold);
        assert_eq!(paragraphs[3].color, HEADING_BLUE);
    }

    #[test]
    fn text_is_escaped_in_document_xml() {
        let xml = document_xml(&[
            DocxParagraph::body("a < b".to_string(), false, BLACK),
            DocxParagraph::heading(ParagraphStyle::Heading2, "Q & A".to_string(), 28, SUBHEADING_PURPLE),
        ])
        .expect("document xml");
        assert!(xml.contains("a &lt; b"));
        assert!(xml.contains("<w:pStyle w:val=\"Heading2\"/>"));
        assert!(xml.contains(">Q &amp; A</w:t>"));
        assert!(xml.ends_with("</w:body></w:document>"));
    }

    #[test]
    fn package_contains_required_parts() {
        let content = normalize(ContentKind::Handout, &json!("Title\nSub\nBody text."), "Topic");
        let bytes = render_docx(&content, "Topic").expect("docx renders");

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "docProps/core.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {}", name);
        }

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .expect("document part")
            .read_to_string(&mut document)
            .expect("utf-8 document");
        assert!(document.contains(">Body text.</w:t>"));
        assert!(document.contains("<w:pStyle w:val=\"Heading1\"/>"));
    }
}
