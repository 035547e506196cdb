//! Presentation rules shared by every renderer.
//!
//! The view, PDF and DOCX renderers all classify lines and mark quiz options
//! through these functions. Export renderers go one step further and walk the
//! same [`ExportBlock`] plan, so they can only differ in styling.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::shape::{Branch, ContentShape, NormalizedContent, Question};

/// Lines at or above this many characters are never sub-headings.
pub const SUBHEADING_MAX_CHARS: usize = 50;

pub const DEFAULT_FILE_STEM: &str = "study-material";
pub const DEFAULT_CENTRAL_TOPIC: &str = "Main Topic";

static DISALLOWED_EXPORT_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_\s\-.,!?():]")
        .expect("DISALLOWED_EXPORT_CHARS is a valid regex pattern")
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN is a valid regex pattern"));

/// Strip everything outside word characters, whitespace and `- . , ! ? ( ) :`,
/// collapse whitespace runs to one space and trim.
pub fn sanitize_for_export(text: &str) -> String {
    let kept = DISALLOWED_EXPORT_CHARS.replace_all(text, "");
    WHITESPACE_RUN.replace_all(&kept, " ").trim().to_string()
}

pub fn is_subheading_line(line: &str) -> bool {
    line.chars().count() < SUBHEADING_MAX_CHARS && !line.contains('.')
}

/// `0 -> "A"`, `25 -> "Z"`, then `26 -> "AA"`, `27 -> "AB"` and so on.
pub fn option_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// Mind-map root label: the central idea, else the topic, else a placeholder.
pub fn central_heading<'a>(central: &'a str, topic: &'a str) -> &'a str {
    if !central.trim().is_empty() {
        central
    } else if !topic.trim().is_empty() {
        topic
    } else {
        DEFAULT_CENTRAL_TOPIC
    }
}

pub fn is_correct_option(question: &Question, index: usize) -> bool {
    question.correct_index == Some(index as i64)
}

/// Export file name: sanitized topic plus extension.
pub fn export_file_name(topic: &str, extension: &str) -> String {
    let stem = sanitize_for_export(topic);
    let stem = if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem
    };
    format!("{}.{}", stem, extension)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyLine {
    pub text: String,
    pub is_subheading: bool,
}

/// Heading, subheading and classified body lines of a free-text body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreeTextOutline {
    pub heading: Option<String>,
    pub subheading: Option<String>,
    pub body: Vec<BodyLine>,
}

pub fn outline(body: &str) -> FreeTextOutline {
    let mut lines = body
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let heading = lines.next().map(str::to_string);
    let subheading = lines.next().map(str::to_string);
    let body = lines
        .map(|line| BodyLine {
            text: line.to_string(),
            is_subheading: is_subheading_line(line),
        })
        .collect();

    FreeTextOutline {
        heading,
        subheading,
        body,
    }
}

/// Depth of a vertical gap between groups of blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gap {
    Section,
    Group,
}

/// One logical unit of an exported document. All text is already sanitized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportBlock {
    Heading(String),
    Subheading(String),
    SectionLine(String),
    Paragraph(String),
    QuestionPrompt(String),
    QuizOption {
        label: String,
        text: String,
        correct: bool,
    },
    Explanation(String),
    BranchItem(String),
    Gap(Gap),
}

impl ExportBlock {
    /// Rendered text of the block, or `None` for gaps.
    pub fn text(&self) -> Option<String> {
        match self {
            ExportBlock::Heading(t)
            | ExportBlock::Subheading(t)
            | ExportBlock::SectionLine(t)
            | ExportBlock::Paragraph(t)
            | ExportBlock::QuestionPrompt(t)
            | ExportBlock::Explanation(t)
            | ExportBlock::BranchItem(t) => Some(t.clone()),
            ExportBlock::QuizOption { label, text, .. } => {
                Some(sanitize_for_export(&format!("{}. {}", label, text)))
            }
            ExportBlock::Gap(_) => None,
        }
    }
}

/// Sequence of blocks both document exporters lay out.
pub fn export_plan(content: &NormalizedContent, topic: &str) -> Vec<ExportBlock> {
    match content.shape() {
        ContentShape::FreeText { body } => free_text_plan(body, topic),
        ContentShape::Quiz { questions } => quiz_plan(questions, topic),
        ContentShape::MindMap { central, branches } => mind_map_plan(central, branches, topic),
        ContentShape::Unstructured { raw } => unstructured_plan(raw, topic),
    }
}

fn free_text_plan(body: &str, topic: &str) -> Vec<ExportBlock> {
    let outline = outline(body);
    let mut blocks = vec![ExportBlock::Heading(sanitize_for_export(
        outline.heading.as_deref().unwrap_or(topic),
    ))];

    if let Some(subheading) = outline.subheading {
        blocks.push(ExportBlock::Subheading(sanitize_for_export(&subheading)));
    }

    blocks.extend(outline.body.into_iter().map(|line| {
        let text = sanitize_for_export(&line.text);
        if line.is_subheading {
            ExportBlock::SectionLine(text)
        } else {
            ExportBlock::Paragraph(text)
        }
    }));
    blocks
}

fn quiz_plan(questions: &[Question], topic: &str) -> Vec<ExportBlock> {
    let mut blocks = vec![
        ExportBlock::Heading(sanitize_for_export(&format!("Quiz: {}", topic))),
        ExportBlock::Gap(Gap::Section),
    ];

    for (idx, question) in questions.iter().enumerate() {
        blocks.push(ExportBlock::QuestionPrompt(sanitize_for_export(&format!(
            "{}. {}",
            idx + 1,
            question.prompt
        ))));

        for (opt_idx, option) in question.options.iter().enumerate() {
            blocks.push(ExportBlock::QuizOption {
                label: option_label(opt_idx),
                text: sanitize_for_export(option),
                correct: is_correct_option(question, opt_idx),
            });
        }

        if let Some(explanation) = &question.explanation {
            blocks.push(ExportBlock::Explanation(sanitize_for_export(&format!(
                "Explanation: {}",
                explanation
            ))));
        }
        blocks.push(ExportBlock::Gap(Gap::Section));
    }
    blocks
}

fn mind_map_plan(central: &str, branches: &[Branch], topic: &str) -> Vec<ExportBlock> {
    let heading = central_heading(central, topic);
    let mut blocks = vec![
        ExportBlock::Heading(sanitize_for_export(heading)),
        ExportBlock::Gap(Gap::Section),
    ];

    for branch in branches {
        blocks.push(ExportBlock::Subheading(sanitize_for_export(&branch.title)));
        blocks.extend(
            branch
                .items
                .iter()
                .map(|item| ExportBlock::BranchItem(sanitize_for_export(&format!("- {}", item)))),
        );
        blocks.push(ExportBlock::Gap(Gap::Group));
    }
    blocks
}

fn unstructured_plan(raw: &serde_json::Value, topic: &str) -> Vec<ExportBlock> {
    let dump = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
    let mut blocks = vec![ExportBlock::Heading(sanitize_for_export(topic))];
    blocks.extend(
        dump.lines()
            .map(sanitize_for_export)
            .filter(|line| !line.is_empty())
            .map(ExportBlock::Paragraph),
    );
    blocks
}
