use serde::Deserialize;
use validator::Validate;

use crate::document::ContentKind;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(alias = "contentType")]
    pub kind: ContentKind,

    #[validate(length(min = 1, max = 200, message = "Topic must be 1-200 characters"))]
    pub topic: String,

    #[validate(length(max = 100))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub level: String,

    #[validate(length(max = 2000))]
    pub additional_info: Option<String>,
}

impl GenerateContentRequest {
    /// Trimmed copy with blank optional fields dropped.
    pub fn normalized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            kind: self.kind,
            topic: self.topic.trim().to_string(),
            subject: non_blank(self.subject),
            level: self.level.trim().to_string(),
            additional_info: non_blank(self.additional_info),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    #[serde(alias = "is_public")]
    pub is_public: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn request(topic: &str, level: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            kind: ContentKind::Quiz,
            topic: topic.to_string(),
            subject: None,
            level: level.to_string(),
            additional_info: None,
        }
    }

    #[test]
    fn test_valid_generate_request() {
        assert!(request("Photosynthesis", "beginner").validate().is_ok());
    }

    #[test]
    fn test_empty_topic_is_rejected() {
        assert!(request("", "beginner").validate().is_err());
        assert!(request(&"x".repeat(201), "beginner").validate().is_err());
    }

    #[test]
    fn test_empty_level_is_rejected() {
        assert!(request("Cells", "").validate().is_err());
    }

    #[test]
    fn test_request_accepts_content_type_alias() {
        let parsed: GenerateContentRequest = serde_json::from_str(
            r#"{"contentType":"mindmap","topic":"Cells","level":"beginner","additionalInfo":"short"}"#,
        )
        .unwrap();

        assert_eq!(parsed.kind, ContentKind::Mindmap);
        assert_eq!(parsed.additional_info.as_deref(), Some("short"));
    }

    #[test]
    fn test_normalized_trims_and_drops_blanks() {
        let parsed = GenerateContentRequest {
            kind: ContentKind::Notes,
            topic: "  Cells ".to_string(),
            subject: Some("   ".to_string()),
            level: " beginner".to_string(),
            additional_info: Some(" more ".to_string()),
        }
        .normalized();

        assert_eq!(parsed.topic, "Cells");
        assert_eq!(parsed.subject, None);
        assert_eq!(parsed.level, "beginner");
        assert_eq!(parsed.additional_info.as_deref(), Some("more"));
    }

    #[test]
    fn test_pagination_defaults_and_caps() {
        let empty = PaginationParams {
            offset: None,
            limit: None,
        };
        assert_eq!(empty.offset(), 0);
        assert_eq!(empty.limit(), 10);

        let big = PaginationParams {
            offset: Some(5),
            limit: Some(1000),
        };
        assert_eq!(big.limit(), 100);
        assert!(big.validate().is_err());
    }
}
