use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{docx, pdf, rules::export_file_name, shape::NormalizedContent};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("DOCX packing failed: {0}")]
    Docx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        ExportError::Docx(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            other => Err(format!("Unsupported export format '{}'", other)),
        }
    }
}

/// A named binary artifact ready for download.
#[derive(Clone, Debug)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn export(
    content: &NormalizedContent,
    topic: &str,
    format: ExportFormat,
) -> ExportResult<ExportedDocument> {
    let bytes = match format {
        ExportFormat::Pdf => pdf::render_pdf(content, topic)?,
        ExportFormat::Docx => docx::render_docx(content, topic)?,
    };

    Ok(ExportedDocument {
        file_name: export_file_name(topic, format.extension()),
        content_type: format.content_type(),
        bytes,
    })
}
