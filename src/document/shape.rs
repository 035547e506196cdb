use serde::Serialize;

use crate::document::kind::ContentKind;

/// A single multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// May point outside `options`; such a question simply has no highlighted option.
    pub correct_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub title: String,
    pub items: Vec<String>,
}

/// Structural form of one generated artifact.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ContentShape {
    FreeText { body: String },
    Quiz { questions: Vec<Question> },
    MindMap { central: String, branches: Vec<Branch> },
    /// Well-formed data that fits no known schema. Renderers dump it verbatim.
    Unstructured { raw: serde_json::Value },
}

impl ContentShape {
    pub fn variant_name(&self) -> &'static str {
        match self {
            ContentShape::FreeText { .. } => "free_text",
            ContentShape::Quiz { .. } => "quiz",
            ContentShape::MindMap { .. } => "mind_map",
            ContentShape::Unstructured { .. } => "unstructured",
        }
    }

    /// Whether this variant is the structured form expected for `kind`.
    /// `Unstructured` is accepted for every kind.
    pub fn agrees_with(&self, kind: ContentKind) -> bool {
        match self {
            ContentShape::FreeText { .. } => kind.is_free_text(),
            ContentShape::Quiz { .. } => kind == ContentKind::Quiz,
            ContentShape::MindMap { .. } => kind == ContentKind::Mindmap,
            ContentShape::Unstructured { .. } => true,
        }
    }
}

/// A shape paired with the kind it was normalized for.
///
/// Only the normalizer builds these, so `kind` and `shape` always agree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedContent {
    kind: ContentKind,
    #[serde(flatten)]
    shape: ContentShape,
}

impl NormalizedContent {
    pub(crate) fn new(kind: ContentKind, shape: ContentShape) -> Self {
        debug_assert!(shape.agrees_with(kind));
        Self { kind, shape }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn shape(&self) -> &ContentShape {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_agrees_with_notes_and_handouts_only() {
        let shape = ContentShape::FreeText {
            body: "Body".to_string(),
        };
        assert!(shape.agrees_with(ContentKind::Notes));
        assert!(shape.agrees_with(ContentKind::Handout));
        assert!(!shape.agrees_with(ContentKind::Quiz));
        assert!(!shape.agrees_with(ContentKind::Mindmap));
    }

    #[test]
    fn unstructured_agrees_with_every_kind() {
        let shape = ContentShape::Unstructured {
            raw: serde_json::json!([1, 2, 3]),
        };
        for kind in ContentKind::ALL {
            assert!(shape.agrees_with(kind));
        }
    }

    #[test]
    fn normalized_content_serializes_with_kind_and_shape_tags() {
        let content = NormalizedContent::new(
            ContentKind::Mindmap,
            ContentShape::MindMap {
                central: "Cells".to_string(),
                branches: vec![],
            },
        );
        let json = serde_json::to_value(&content).expect("content should serialize");
        assert_eq!(json["kind"], "mindmap");
        assert_eq!(json["shape"], "mind_map");
        assert_eq!(json["central"], "Cells");
    }
}
