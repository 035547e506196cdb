#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use study_forge::{
    config::Config,
    document::ContentKind,
    errors::{AppError, AppResult},
    models::domain::GeneratedContent,
    repositories::ContentRepository,
    services::{ContentGenerator, GenerationRequest},
};

pub const TEST_JWT_SECRET: &str = "integration_test_jwt_secret_value";

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "study-forge-test".to_string(),
        content_collection: "generated_content".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from(TEST_JWT_SECRET.to_string()),
        ai_api_key: SecretString::from("unused".to_string()),
        ai_api_base: "http://localhost:9".to_string(),
        ai_model: "test-model".to_string(),
        public_base_url: "https://study.example.com".to_string(),
        cors_allowed_origin: None,
    }
}

#[derive(Default)]
pub struct InMemoryContentRepository {
    items: Arc<RwLock<HashMap<String, GeneratedContent>>>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<GeneratedContent> {
        self.items.read().await.get(id).cloned()
    }

    async fn update<F>(&self, id: &str, apply: F) -> AppResult<GeneratedContent>
    where
        F: FnOnce(&mut GeneratedContent) + Send,
    {
        let mut items = self.items.write().await;
        let record = items
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Content with id '{}' not found", id)))?;
        apply(record);
        Ok(record.clone())
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn create(&self, content: GeneratedContent) -> AppResult<GeneratedContent> {
        let mut items = self.items.write().await;
        if items.contains_key(&content.id) {
            return Err(AppError::DatabaseError(format!(
                "Duplicate content id '{}'",
                content.id
            )));
        }
        items.insert(content.id.clone(), content.clone());
        Ok(content)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<GeneratedContent>> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn find_public_by_share_code(&self, code: &str) -> AppResult<Option<GeneratedContent>> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .find(|c| c.is_public && c.share_code.as_deref() == Some(code))
            .cloned())
    }

    async fn share_code_exists(&self, code: &str) -> AppResult<bool> {
        Ok(self
            .items
            .read()
            .await
            .values()
            .any(|c| c.share_code.as_deref() == Some(code)))
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<GeneratedContent>, i64)> {
        let items = self.items.read().await;
        let mut owned: Vec<GeneratedContent> = items
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = owned.len() as i64;
        let page = owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.items
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Content with id '{}' not found", id)))
    }

    async fn set_share_code(&self, id: &str, code: &str) -> AppResult<GeneratedContent> {
        let code = code.to_string();
        self.update(id, move |record| {
            if record.share_code.is_none() {
                record.share_code = Some(code);
                record.is_public = true;
            }
        })
        .await
    }

    async fn set_visibility(&self, id: &str, is_public: bool) -> AppResult<GeneratedContent> {
        self.update(id, move |record| record.is_public = is_public)
            .await
    }

    async fn increment_views(&self, id: &str) -> AppResult<()> {
        self.update(id, |record| record.views_count += 1).await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Returns canned provider output per kind, or a scripted failure.
pub struct ScriptedGenerator {
    failure: Option<AppError>,
    calls: Arc<RwLock<Vec<GenerationRequest>>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            failure: None,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn failing(error: AppError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub async fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.read().await.clone()
    }
}

pub const NOTES_OUTPUT: &str = "Photosynthesis\nHow plants turn light into food\nOverview\nPlants capture light with chlorophyll.\nKey Terms\nGlucose is the sugar plants produce.";

pub const QUIZ_OUTPUT: &str = "Here is your quiz:\n```json\n{\"questions\":[{\"question\":\"What gas do plants absorb?\",\"options\":[\"Oxygen\",\"Carbon dioxide\",\"Nitrogen\"],\"correctAnswer\":1,\"explanation\":\"Plants take in CO2.\"}]}\n```";

pub const MIND_MAP_OUTPUT: &str = "{\"central\":\"Photosynthesis\",\"branches\":[{\"title\":\"Inputs\",\"items\":[\"Light\",\"Water\"]},{\"title\":\"Outputs\",\"items\":[\"Glucose\"]}]}";

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        self.calls.write().await.push(request.clone());

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        Ok(match request.kind {
            ContentKind::Notes | ContentKind::Handout => NOTES_OUTPUT,
            ContentKind::Quiz => QUIZ_OUTPUT,
            ContentKind::Mindmap => MIND_MAP_OUTPUT,
        }
        .to_string())
    }
}
