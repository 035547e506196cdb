use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{normalize, ContentKind, NormalizedContent};

/// One persisted generation, owned by the user who requested it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GeneratedContent {
    pub id: String,
    pub user_id: String,
    pub kind: ContentKind,
    pub title: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub level: String,
    /// Unnormalized provider output.
    pub raw: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_code: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub views_count: i64,
    pub created_at: DateTime<Utc>,
}

impl GeneratedContent {
    pub fn new(
        user_id: &str,
        kind: ContentKind,
        topic: &str,
        subject: Option<&str>,
        level: &str,
        raw: serde_json::Value,
    ) -> Self {
        GeneratedContent {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            title: topic.to_string(),
            topic: topic.to_string(),
            subject: subject.map(str::to_string),
            level: level.to_string(),
            raw,
            share_code: None,
            is_public: false,
            views_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn normalized(&self) -> NormalizedContent {
        normalize(self.kind, &self.raw, &self.topic)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
