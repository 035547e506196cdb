use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    document::{render_view, ContentKind, NormalizedContent, ViewTree},
    models::domain::GeneratedContent,
};

/// Record metadata without the raw payload.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    pub id: String,
    pub kind: ContentKind,
    pub title: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub level: String,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_code: Option<String>,
    pub views_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&GeneratedContent> for ContentSummary {
    fn from(record: &GeneratedContent) -> Self {
        ContentSummary {
            id: record.id.clone(),
            kind: record.kind,
            title: record.title.clone(),
            topic: record.topic.clone(),
            subject: record.subject.clone(),
            level: record.level.clone(),
            is_public: record.is_public,
            share_code: record.share_code.clone(),
            views_count: record.views_count,
            created_at: record.created_at,
        }
    }
}

/// A record with its normalized content and on-screen view.
#[derive(Debug, Clone, Serialize)]
pub struct ContentDetails {
    #[serde(flatten)]
    pub summary: ContentSummary,
    pub content: NormalizedContent,
    pub view: ViewTree,
}

impl From<&GeneratedContent> for ContentDetails {
    fn from(record: &GeneratedContent) -> Self {
        let content = record.normalized();
        let view = render_view(&content, &record.topic);
        ContentDetails {
            summary: ContentSummary::from(record),
            content,
            view,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareInfo {
    pub share_code: String,
    pub is_public: bool,
    pub share_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub items: Vec<ContentSummary>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
