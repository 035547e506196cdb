use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{ContentRepository, MongoContentRepository},
    services::{ContentGenerator, ContentService, OpenAiContentGenerator},
};

#[derive(Clone)]
pub struct AppState {
    pub content_service: Arc<ContentService>,
    pub config: Arc<Config>,
    /// `None` when the state was assembled without a database (tests).
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let content_repository = Arc::new(MongoContentRepository::new(&db));
        content_repository.ensure_indexes().await?;

        let generator = Arc::new(OpenAiContentGenerator::new(&config));

        let mut state = Self::from_parts(config, content_repository, generator);
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_parts(
        config: Config,
        repository: Arc<dyn ContentRepository>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        let content_service = Arc::new(ContentService::new(
            repository,
            generator,
            config.public_base_url.clone(),
        ));

        Self {
            content_service,
            config: Arc::new(config),
            db: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
