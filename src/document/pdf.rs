//! PDF export.
//!
//! Layout happens in millimetres on an A4 page, top-down from a fixed top
//! margin. Pagination is checked before every wrapped line, so a single
//! paragraph can continue onto the next page.

use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, ObjectId, Stream,
};

use crate::document::{
    export::{ExportError, ExportResult},
    metrics::{wrap_text, Face},
    rules::{export_plan, sanitize_for_export, ExportBlock, Gap},
    shape::NormalizedContent,
};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
pub const TOP_MM: f32 = 20.0;
/// A line placed below this cursor position starts a new page.
pub const PAGE_BOTTOM_MM: f32 = 270.0;
const BLOCK_SPACING_MM: f32 = 5.0;
const SECTION_GAP_MM: f32 = 5.0;
const GROUP_GAP_MM: f32 = 3.0;
const LINE_ADVANCE_PER_PT: f32 = 0.5;
const PT_PER_MM: f32 = 72.0 / 25.4;

pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const HEADING_BLUE: Rgb = [30, 64, 175];
pub const SUBHEADING_PURPLE: Rgb = [88, 28, 135];
pub const CORRECT_GREEN: Rgb = [34, 197, 94];
pub const MUTED_GRAY: Rgb = [107, 114, 128];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
}

impl TextStyle {
    const fn new(size: f32, bold: bool, color: Rgb) -> Self {
        Self { size, bold, color }
    }

    fn face(&self) -> Face {
        Face::from_bold(self.bold)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub style: TextStyle,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PdfPage {
    pub lines: Vec<PlacedLine>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PdfLayout {
    pub pages: Vec<PdfPage>,
}

impl PdfLayout {
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }
}

pub fn style_for(block: &ExportBlock) -> Option<TextStyle> {
    let style = match block {
        ExportBlock::Heading(_) => TextStyle::new(20.0, true, HEADING_BLUE),
        ExportBlock::Subheading(_) => TextStyle::new(14.0, true, SUBHEADING_PURPLE),
        ExportBlock::SectionLine(_) => TextStyle::new(12.0, true, BLACK),
        ExportBlock::Paragraph(_) | ExportBlock::BranchItem(_) => {
            TextStyle::new(10.0, false, BLACK)
        }
        ExportBlock::QuestionPrompt(_) => TextStyle::new(12.0, true, BLACK),
        ExportBlock::QuizOption { correct: true, .. } => TextStyle::new(10.0, true, CORRECT_GREEN),
        ExportBlock::QuizOption { correct: false, .. } => TextStyle::new(10.0, false, BLACK),
        ExportBlock::Explanation(_) => TextStyle::new(9.0, false, MUTED_GRAY),
        ExportBlock::Gap(_) => return None,
    };
    Some(style)
}

struct Cursor {
    pages: Vec<PdfPage>,
    y_mm: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PdfPage::default()],
            y_mm: TOP_MM,
        }
    }

    fn place_block(&mut self, text: &str, style: TextStyle) {
        let max_width_pt = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) * PT_PER_MM;

        for line in wrap_text(text, style.face(), style.size, max_width_pt) {
            if self.y_mm > PAGE_BOTTOM_MM {
                self.pages.push(PdfPage::default());
                self.y_mm = TOP_MM;
            }
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(PlacedLine {
                    text: line,
                    x_mm: MARGIN_MM,
                    y_mm: self.y_mm,
                    style,
                });
            }
            self.y_mm += style.size * LINE_ADVANCE_PER_PT;
        }
        self.y_mm += BLOCK_SPACING_MM;
    }
}

pub fn layout(plan: &[ExportBlock]) -> PdfLayout {
    let mut cursor = Cursor::new();

    for block in plan {
        match (block, style_for(block), block.text()) {
            (ExportBlock::Gap(Gap::Section), _, _) => cursor.y_mm += SECTION_GAP_MM,
            (ExportBlock::Gap(Gap::Group), _, _) => cursor.y_mm += GROUP_GAP_MM,
            (_, Some(style), Some(text)) => cursor.place_block(&text, style),
            _ => {}
        }
    }

    PdfLayout {
        pages: cursor.pages,
    }
}

pub fn render_pdf(content: &NormalizedContent, topic: &str) -> ExportResult<Vec<u8>> {
    let layout = layout(&export_plan(content, topic));
    encode(&layout, topic)
}

fn font_resource(face: Face) -> &'static str {
    match face {
        Face::Regular => "F1",
        Face::Bold => "F2",
    }
}

fn color_component(value: u8) -> Object {
    (f32::from(value) / 255.0).into()
}

fn page_operations(page: &PdfPage) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(page.lines.len() * 6);
    for line in &page.lines {
        let [r, g, b] = line.style.color;
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![font_resource(line.style.face()).into(), line.style.size.into()],
            ),
            Operation::new(
                "rg",
                vec![color_component(r), color_component(g), color_component(b)],
            ),
            Operation::new(
                "Td",
                vec![
                    (line.x_mm * PT_PER_MM).into(),
                    ((PAGE_HEIGHT_MM - line.y_mm) * PT_PER_MM).into(),
                ],
            ),
            Operation::new("Tj", vec![Object::string_literal(line.text.as_str())]),
            Operation::new("ET", vec![]),
        ]);
    }
    operations
}

fn add_font(doc: &mut Document, face: Face) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn encode(layout: &PdfLayout, title: &str) -> ExportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = add_font(&mut doc, Face::Regular);
    let bold_id = add_font(&mut doc, Face::Bold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            font_resource(Face::Regular) => regular_id,
            font_resource(Face::Bold) => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(format!("content stream: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_count),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            (PAGE_WIDTH_MM * PT_PER_MM).into(),
            (PAGE_HEIGHT_MM * PT_PER_MM).into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(sanitize_for_export(title)),
        "Producer" => Object::string_literal("study-forge"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{kind::ContentKind, normalizer::normalize};
    use serde_json::json;

    fn notes(body: &str) -> NormalizedContent {
        normalize(ContentKind::Notes, &json!(body), "Topic")
    }

    #[test]
    fn heading_and_subheading_get_accent_styles() {
        let plan = export_plan(&notes("Title\nSubtitle\nA body line."), "Topic");
        let layout = layout(&plan);
        let lines: Vec<_> = layout.lines().collect();

        assert_eq!(lines[0].text, "Title");
        assert_eq!(lines[0].style, TextStyle::new(20.0, true, HEADING_BLUE));
        assert_eq!(lines[0].y_mm, TOP_MM);
        assert_eq!(lines[1].style, TextStyle::new(14.0, true, SUBHEADING_PURPLE));
        assert_eq!(lines[2].style, TextStyle::new(10.0, false, BLACK));
    }

    #[test]
    fn subheading_lines_are_bold_and_larger_than_paragraphs() {
        let section = style_for(&ExportBlock::SectionLine(String::new())).expect("style");
        let paragraph = style_for(&ExportBlock::Paragraph(String::new())).expect("style");

        assert!(section.bold);
        assert!(!paragraph.bold);
        assert!(section.size > paragraph.size);
    }

    #[test]
    fn correct_option_is_colored_distinctly() {
        let correct = style_for(&ExportBlock::QuizOption {
            label: "B".to_string(),
            text: "4".to_string(),
            correct: true,
        })
        .expect("style");
        let wrong = style_for(&ExportBlock::QuizOption {
            label: "A".to_string(),
            text: "3".to_string(),
            correct: false,
        })
        .expect("style");

        assert_eq!(correct.color, CORRECT_GREEN);
        assert_ne!(correct.color, wrong.color);
    }

    #[test]
    fn long_paragraph_spans_pages_mid_flow() {
        let paragraph = "Photosynthesis converts light energy into chemical energy. ".repeat(300);
        let body = format!("Title\nSubtitle\n{}", paragraph);
        let layout = layout(&export_plan(&notes(&body), "Topic"));

        assert!(layout.pages.len() > 1);
        for page in &layout.pages {
            for line in &page.lines {
                assert!(line.y_mm >= TOP_MM);
                assert!(line.y_mm <= PAGE_BOTTOM_MM + 10.0);
            }
        }
        assert_eq!(layout.pages[1].lines[0].y_mm, TOP_MM);

        let placed_words: usize = layout
            .lines()
            .map(|line| line.text.split_whitespace().count())
            .sum();
        let expected_words = 2 + paragraph.split_whitespace().count();
        assert_eq!(placed_words, expected_words);
    }

    #[test]
    fn rendered_bytes_form_a_loadable_document() {
        let body = format!("Title\nSubtitle\n{}", "A long sentence here. ".repeat(400));
        let bytes = render_pdf(&notes(&body), "Topic").expect("pdf renders");

        let doc = Document::load_mem(&bytes).expect("pdf loads");
        let expected = layout(&export_plan(&notes(&body), "Topic")).pages.len();
        assert!(expected > 1);
        assert_eq!(doc.get_pages().len(), expected);
    }
}
