use serde::Serialize;

use crate::document::{
    kind::ContentKind,
    rules::{central_heading, is_correct_option, option_label, outline},
    shape::{Branch, ContentShape, NormalizedContent, Question},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTone {
    Lead,
    Notice,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewOption {
    pub label: String,
    pub text: String,
    pub correct: bool,
}

/// One node of the on-screen preview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ViewNode {
    Heading {
        level: u8,
        text: String,
    },
    Text {
        tone: TextTone,
        text: String,
    },
    Question {
        number: usize,
        prompt: String,
        options: Vec<ViewOption>,
        #[serde(skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    Branch {
        title: String,
        items: Vec<String>,
    },
    Preformatted {
        text: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewTree {
    pub kind: ContentKind,
    pub nodes: Vec<ViewNode>,
}

/// Build the read-only preview of `content`.
///
/// Text is shown unsanitized. Free text only previews its heading and
/// subheading; the full body is available through the exports.
pub fn render(content: &NormalizedContent, topic: &str) -> ViewTree {
    let nodes = match content.shape() {
        ContentShape::FreeText { body } => free_text(content.kind(), body, topic),
        ContentShape::Quiz { questions } => questions
            .iter()
            .enumerate()
            .map(|(idx, q)| question(idx, q))
            .collect(),
        ContentShape::MindMap { central, branches } => mind_map(central, branches, topic),
        ContentShape::Unstructured { raw } => vec![ViewNode::Preformatted {
            text: serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string()),
        }],
    };

    ViewTree {
        kind: content.kind(),
        nodes,
    }
}

fn free_text(kind: ContentKind, body: &str, topic: &str) -> Vec<ViewNode> {
    let outline = outline(body);
    let (fallback_subheading, notice) = match kind {
        ContentKind::Handout => (
            "Generated handout ready for download",
            "Handout generated successfully. Download the PDF or DOCX export for the full formatted document.",
        ),
        _ => (
            "Generated content ready for download",
            "Content generated successfully. Download the PDF or DOCX export for the full formatted document.",
        ),
    };

    vec![
        ViewNode::Heading {
            level: 1,
            text: outline.heading.unwrap_or_else(|| topic.to_string()),
        },
        ViewNode::Text {
            tone: TextTone::Lead,
            text: outline
                .subheading
                .unwrap_or_else(|| fallback_subheading.to_string()),
        },
        ViewNode::Text {
            tone: TextTone::Notice,
            text: notice.to_string(),
        },
    ]
}

fn question(idx: usize, question: &Question) -> ViewNode {
    ViewNode::Question {
        number: idx + 1,
        prompt: question.prompt.clone(),
        options: question
            .options
            .iter()
            .enumerate()
            .map(|(opt_idx, text)| ViewOption {
                label: option_label(opt_idx),
                text: text.clone(),
                correct: is_correct_option(question, opt_idx),
            })
            .collect(),
        explanation: question.explanation.clone(),
    }
}

fn mind_map(central: &str, branches: &[Branch], topic: &str) -> Vec<ViewNode> {
    std::iter::once(ViewNode::Heading {
        level: 1,
        text: central_heading(central, topic).to_string(),
    })
    .chain(branches.iter().map(|branch| ViewNode::Branch {
        title: branch.title.clone(),
        items: branch.items.clone(),
    }))
    .collect()
}
