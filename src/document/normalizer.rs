use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::document::{
    kind::ContentKind,
    payload::{MindMapPayload, QuizPayload},
    rules::central_heading,
    shape::{Branch, ContentShape, NormalizedContent, Question},
};

pub const EMPTY_BODY_PLACEHOLDER: &str = "No content was generated for this topic.";
pub const FALLBACK_BRANCH_TITLE: &str = "Content";

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[^\n`]*\n(.*?)\n?```").expect("FENCED_BLOCK is a valid regex pattern")
});

/// Coerce raw provider output (or a stored raw value) into a shape for `kind`.
///
/// Never fails: unparseable output for quiz and mind-map kinds becomes the
/// kind's fallback shape, and well-formed JSON of the wrong structure becomes
/// `Unstructured`.
pub fn normalize(kind: ContentKind, raw: &Value, topic: &str) -> NormalizedContent {
    let shape = match kind {
        ContentKind::Notes | ContentKind::Handout => free_text(raw),
        ContentKind::Quiz | ContentKind::Mindmap => structured(kind, raw, topic),
    };
    NormalizedContent::new(kind, shape)
}

/// Interior of the first triple-backtick block, if the text has one.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn free_text(raw: &Value) -> ContentShape {
    let body = match raw {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("text") {
            Some(Value::String(s)) => s.clone(),
            _ => raw.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    };

    if body.trim().is_empty() {
        ContentShape::FreeText {
            body: EMPTY_BODY_PLACEHOLDER.to_string(),
        }
    } else {
        ContentShape::FreeText { body }
    }
}

fn structured(kind: ContentKind, raw: &Value, topic: &str) -> ContentShape {
    let value = match raw {
        Value::String(text) => {
            let candidate = extract_fenced_block(text).unwrap_or(text.as_str());
            match serde_json::from_str::<Value>(candidate.trim()) {
                Ok(value) => value,
                Err(err) => {
                    log::warn!(
                        "Generator output for {} is not valid JSON ({}), using fallback shape",
                        kind,
                        err
                    );
                    return fallback(kind, text, topic);
                }
            }
        }
        other => other.clone(),
    };

    if !value.is_object() {
        log::warn!("Generator output for {} is not a JSON object", kind);
        return ContentShape::Unstructured { raw: value };
    }

    match kind {
        ContentKind::Quiz => match serde_json::from_value::<QuizPayload>(value.clone()) {
            Ok(payload) => ContentShape::Quiz {
                questions: payload.questions.into_iter().map(Question::from).collect(),
            },
            Err(err) => {
                log::warn!("Quiz payload does not match the schema: {}", err);
                ContentShape::Unstructured { raw: value }
            }
        },
        ContentKind::Mindmap => match serde_json::from_value::<MindMapPayload>(value.clone()) {
            Ok(payload) => ContentShape::MindMap {
                central: central_heading(&payload.central, topic).to_string(),
                branches: payload.branches.into_iter().map(Branch::from).collect(),
            },
            Err(err) => {
                log::warn!("Mind map payload does not match the schema: {}", err);
                ContentShape::Unstructured { raw: value }
            }
        },
        ContentKind::Notes | ContentKind::Handout => free_text(&value),
    }
}

fn fallback(kind: ContentKind, text: &str, topic: &str) -> ContentShape {
    match kind {
        ContentKind::Quiz => ContentShape::Quiz {
            questions: vec![Question {
                prompt: text.to_string(),
                options: Vec::new(),
                correct_index: Some(0),
                explanation: None,
            }],
        },
        _ => ContentShape::MindMap {
            central: central_heading("", topic).to_string(),
            branches: vec![Branch {
                title: FALLBACK_BRANCH_TITLE.to_string(),
                items: vec![text.to_string()],
            }],
        },
    }
}
