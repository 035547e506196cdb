//! Wire format the provider is asked to emit for structured kinds.
//!
//! Scalars are accepted loosely (a numeric option, a `"1"` answer index).
//! Structural mismatches still fail; the normalizer turns those into an
//! `Unstructured` shape.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::document::shape::{Branch, Question};

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct QuizPayload {
    #[serde(default)]
    pub questions: Vec<QuestionPayload>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct QuestionPayload {
    #[serde(default, alias = "prompt")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    #[schemars(with = "Vec<String>")]
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    #[serde(
        default,
        rename = "correctAnswer",
        alias = "correctIndex",
        alias = "correct_answer",
        deserialize_with = "lenient_index"
    )]
    #[schemars(with = "Option<i64>")]
    pub correct_answer: Option<i64>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct MindMapPayload {
    #[serde(default)]
    pub central: String,
    #[serde(default)]
    pub branches: Vec<BranchPayload>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct BranchPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    #[schemars(with = "Vec<String>")]
    pub items: Vec<String>,
}

impl From<QuestionPayload> for Question {
    fn from(payload: QuestionPayload) -> Self {
        Question {
            prompt: payload.question,
            options: payload.options,
            correct_index: payload.correct_answer,
            explanation: payload.explanation.filter(|e| !e.trim().is_empty()),
        }
    }
}

impl From<BranchPayload> for Branch {
    fn from(payload: BranchPayload) -> Self {
        Branch {
            title: payload.title,
            items: payload.items,
        }
    }
}

/// JSON Schema text for the quiz payload, embedded in the quiz prompt.
pub fn quiz_schema_json() -> String {
    serde_json::to_string(&schemars::schema_for!(QuizPayload)).unwrap_or_default()
}

/// JSON Schema text for the mind-map payload, embedded in the mind-map prompt.
pub fn mind_map_schema_json() -> String {
    serde_json::to_string(&schemars::schema_for!(MindMapPayload)).unwrap_or_default()
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(scalar_to_string)
        .collect())
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}
