use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    document::{export, ExportFormat, ExportedDocument},
    errors::{AppError, AppResult},
    models::{
        domain::GeneratedContent,
        dto::{
            request::{GenerateContentRequest, PaginationParams},
            response::{ContentDetails, ContentSummary, HistoryPage, ShareInfo},
        },
    },
    repositories::ContentRepository,
    services::generation::{ContentGenerator, GenerationRequest},
};

pub const SHARE_CODE_LEN: usize = 8;
const SHARE_CODE_ATTEMPTS: usize = 5;
pub const NOT_SHARED_MESSAGE: &str = "Content not found or not publicly shared";

pub struct ContentService {
    repository: Arc<dyn ContentRepository>,
    generator: Arc<dyn ContentGenerator>,
    public_base_url: String,
}

impl ContentService {
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        generator: Arc<dyn ContentGenerator>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            generator,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn generate(
        &self,
        user_id: &str,
        request: GenerateContentRequest,
    ) -> AppResult<ContentDetails> {
        let request = request.normalized();
        request.validate()?;

        let raw = self
            .generator
            .generate(&GenerationRequest::from(&request))
            .await?;

        let record = GeneratedContent::new(
            user_id,
            request.kind,
            &request.topic,
            request.subject.as_deref(),
            &request.level,
            Value::String(raw),
        );
        let record = self.repository.create(record).await?;

        let details = ContentDetails::from(&record);
        log::info!(
            "Generated {} for user {} as {} content",
            details.summary.kind,
            user_id,
            details.content.shape().variant_name()
        );
        Ok(details)
    }

    pub async fn get_owned(&self, id: &str, user_id: &str) -> AppResult<ContentDetails> {
        let record = self.find_owned(id, user_id).await?;
        Ok(ContentDetails::from(&record))
    }

    pub async fn list_history(
        &self,
        user_id: &str,
        pagination: &PaginationParams,
    ) -> AppResult<HistoryPage> {
        let (offset, limit) = (pagination.offset(), pagination.limit());
        let (items, total) = self.repository.list_by_user(user_id, offset, limit).await?;

        Ok(HistoryPage {
            items: items.iter().map(ContentSummary::from).collect(),
            total,
            offset,
            limit,
        })
    }

    pub async fn delete_owned(&self, id: &str, user_id: &str) -> AppResult<()> {
        self.find_owned(id, user_id).await?;
        self.repository.delete(id).await?;
        log::info!("User {} deleted content {}", user_id, id);
        Ok(())
    }

    pub async fn share(&self, id: &str, user_id: &str) -> AppResult<ShareInfo> {
        let record = self.find_owned(id, user_id).await?;

        let record = match record.share_code {
            Some(_) => record,
            None => {
                let code = self.unused_share_code().await?;
                let record = self.repository.set_share_code(id, &code).await?;
                if record.share_code.as_deref() == Some(code.as_str()) {
                    log::info!("Issued share code {} for content {}", code, id);
                }
                record
            }
        };

        self.share_info(&record)
    }

    pub async fn set_visibility(
        &self,
        id: &str,
        user_id: &str,
        is_public: bool,
    ) -> AppResult<ContentSummary> {
        self.find_owned(id, user_id).await?;
        let record = self.repository.set_visibility(id, is_public).await?;
        Ok(ContentSummary::from(&record))
    }

    /// Public lookup by share code. The view count is bumped on a best-effort basis.
    pub async fn view_shared(&self, code: &str) -> AppResult<ContentDetails> {
        let record = self.find_shared(code).await?;

        if let Err(err) = self.repository.increment_views(&record.id).await {
            log::warn!("Failed to record view for content {}: {}", record.id, err);
        }

        Ok(ContentDetails::from(&record))
    }

    pub async fn export_owned(
        &self,
        id: &str,
        user_id: &str,
        format: ExportFormat,
    ) -> AppResult<ExportedDocument> {
        let record = self.find_owned(id, user_id).await?;
        export_record(record, format).await
    }

    pub async fn export_shared(&self, code: &str, format: ExportFormat) -> AppResult<ExportedDocument> {
        let record = self.find_shared(code).await?;
        export_record(record, format).await
    }

    async fn find_owned(&self, id: &str, user_id: &str) -> AppResult<GeneratedContent> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content with id '{}' not found", id)))?;

        if !record.is_owned_by(user_id) {
            return Err(AppError::Forbidden(
                "You can only access your own content".to_string(),
            ));
        }
        Ok(record)
    }

    async fn find_shared(&self, code: &str) -> AppResult<GeneratedContent> {
        self.repository
            .find_public_by_share_code(&code.trim().to_uppercase())
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_SHARED_MESSAGE.to_string()))
    }

    async fn unused_share_code(&self) -> AppResult<String> {
        for _ in 0..SHARE_CODE_ATTEMPTS {
            let code = new_share_code();
            if !self.repository.share_code_exists(&code).await? {
                return Ok(code);
            }
            log::debug!("Share code {} already taken, retrying", code);
        }
        Err(AppError::InternalError(
            "Could not allocate a unique share code".to_string(),
        ))
    }

    fn share_info(&self, record: &GeneratedContent) -> AppResult<ShareInfo> {
        let share_code = record.share_code.clone().ok_or_else(|| {
            AppError::InternalError(format!("Content {} has no share code", record.id))
        })?;

        Ok(ShareInfo {
            share_url: format!("{}/share/{}", self.public_base_url, share_code),
            share_code,
            is_public: record.is_public,
        })
    }
}

/// Eight uppercase alphanumeric characters.
pub fn new_share_code() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SHARE_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}

async fn export_record(record: GeneratedContent, format: ExportFormat) -> AppResult<ExportedDocument> {
    let id = record.id.clone();
    let document = tokio::task::spawn_blocking(move || {
        let content = record.normalized();
        export(&content, &record.topic, format)
    })
    .await??;

    log::info!(
        "Exported content {} as {} ({} bytes)",
        id,
        format,
        document.bytes.len()
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        document::{ContentKind, ContentShape},
        repositories::content_repository::MockContentRepository,
        services::generation::MockContentGenerator,
        test_utils::fixtures::{notes_record, quiz_record},
    };

    fn service(repository: MockContentRepository, generator: MockContentGenerator) -> ContentService {
        ContentService::new(
            Arc::new(repository),
            Arc::new(generator),
            "http://localhost:8080/",
        )
    }

    #[test]
    fn test_share_code_format() {
        let code = new_share_code();
        assert_eq!(code.len(), SHARE_CODE_LEN);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn test_get_owned_rejects_other_users() {
        let stored = notes_record("owner");
        let mut repository = MockContentRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service(repository, MockContentGenerator::new());
        let result = service.get_owned("any", "intruder").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_owned_missing_is_not_found() {
        let mut repository = MockContentRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = service(repository, MockContentGenerator::new());
        let result = service.get_owned("missing", "owner").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_generate_propagates_rate_limit_without_persisting() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(AppError::RateLimited));
        let mut repository = MockContentRepository::new();
        repository.expect_create().never();

        let service = service(repository, generator);
        let request = GenerateContentRequest {
            kind: ContentKind::Quiz,
            topic: "Fractions".to_string(),
            subject: None,
            level: "beginner".to_string(),
            additional_info: None,
        };

        let result = service.generate("owner", request).await;
        assert!(matches!(result, Err(AppError::RateLimited)));
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_topic_before_calling_provider() {
        let mut generator = MockContentGenerator::new();
        generator.expect_generate().never();

        let service = service(MockContentRepository::new(), generator);
        let request = GenerateContentRequest {
            kind: ContentKind::Notes,
            topic: "   ".to_string(),
            subject: None,
            level: "beginner".to_string(),
            additional_info: None,
        };

        let result = service.generate("owner", request).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_view_shared_ignores_view_count_failures() {
        let mut shared = notes_record("owner");
        shared.share_code = Some("ABCD1234".to_string());
        shared.is_public = true;

        let mut repository = MockContentRepository::new();
        repository
            .expect_find_public_by_share_code()
            .withf(|code| code.eq_ignore_ascii_case("ABCD1234"))
            .returning(move |_| Ok(Some(shared.clone())));
        repository
            .expect_increment_views()
            .returning(|_| Err(AppError::DatabaseError("write failed".to_string())));

        let service = service(repository, MockContentGenerator::new());
        let details = service.view_shared("abcd1234").await.unwrap();

        assert_eq!(details.summary.share_code.as_deref(), Some("ABCD1234"));
    }

    #[tokio::test]
    async fn test_share_reuses_existing_code() {
        let mut shared = notes_record("owner");
        shared.share_code = Some("EXIST123".to_string());
        shared.is_public = true;

        let mut repository = MockContentRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(shared.clone())));
        repository.expect_set_share_code().never();

        let service = service(repository, MockContentGenerator::new());
        let info = service.share("id", "owner").await.unwrap();

        assert_eq!(info.share_code, "EXIST123");
        assert_eq!(info.share_url, "http://localhost:8080/share/EXIST123");
    }

    #[tokio::test]
    async fn test_share_returns_code_stored_by_concurrent_request() {
        let unshared = notes_record("owner");
        let mut winner = unshared.clone();
        winner.share_code = Some("WINNER01".to_string());
        winner.is_public = true;

        let mut repository = MockContentRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(unshared.clone())));
        repository.expect_share_code_exists().returning(|_| Ok(false));
        repository
            .expect_set_share_code()
            .times(1)
            .returning(move |_, _| Ok(winner.clone()));

        let service = service(repository, MockContentGenerator::new());
        let info = service.share("id", "owner").await.unwrap();

        assert_eq!(info.share_code, "WINNER01");
        assert_eq!(info.share_url, "http://localhost:8080/share/WINNER01");
    }

    #[tokio::test]
    async fn test_generate_returns_normalized_details_for_fenced_quiz() {
        let raw = quiz_record("owner").raw;
        let mut generator = MockContentGenerator::new();
        generator.expect_generate().returning(move |_| {
            Ok(raw.as_str().map(str::to_string).unwrap_or_default())
        });
        let mut repository = MockContentRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|record| Ok(record));

        let service = service(repository, generator);
        let request = GenerateContentRequest {
            kind: ContentKind::Quiz,
            topic: "Fractions".to_string(),
            subject: Some("Math".to_string()),
            level: "beginner".to_string(),
            additional_info: None,
        };

        let details = service.generate("owner", request).await.unwrap();
        match details.content.shape() {
            ContentShape::Quiz { questions } => assert_eq!(questions.len(), 2),
            other => panic!("unexpected shape {}", other.variant_name()),
        }
        assert_eq!(details.view.nodes.len(), 2);
    }

    #[tokio::test]
    async fn test_export_owned_renders_stored_raw_output() {
        let stored = quiz_record("owner");
        let mut repository = MockContentRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service(repository, MockContentGenerator::new());
        let document = service
            .export_owned("id", "owner", ExportFormat::Docx)
            .await
            .unwrap();

        assert_eq!(document.file_name, "Fractions.docx");
        assert!(!document.bytes.is_empty());
        assert!(matches!(
            service.export_owned("id", "intruder", ExportFormat::Pdf).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
