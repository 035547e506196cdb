use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::GeneratedContent,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create(&self, content: GeneratedContent) -> AppResult<GeneratedContent>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<GeneratedContent>>;
    /// Only matches records that are currently public.
    async fn find_public_by_share_code(&self, code: &str) -> AppResult<Option<GeneratedContent>>;
    async fn share_code_exists(&self, code: &str) -> AppResult<bool>;
    /// Newest first, with the total count for the user.
    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<GeneratedContent>, i64)>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    /// Stores `code` and marks the record public, unless the record already
    /// holds a code. Returns the record with whichever code is stored.
    async fn set_share_code(&self, id: &str, code: &str) -> AppResult<GeneratedContent>;
    async fn set_visibility(&self, id: &str, is_public: bool) -> AppResult<GeneratedContent>;
    async fn increment_views(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoContentRepository {
    collection: Collection<GeneratedContent>,
}

impl MongoContentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.content(),
        }
    }

    async fn update_and_fetch(
        &self,
        id: &str,
        update: mongodb::bson::Document,
    ) -> AppResult<GeneratedContent> {
        self.collection
            .find_one_and_update(doc! { "id": id }, update)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content with id '{}' not found", id)))
    }
}

#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn create(&self, content: GeneratedContent) -> AppResult<GeneratedContent> {
        self.collection.insert_one(&content).await?;
        Ok(content)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<GeneratedContent>> {
        let content = self.collection.find_one(doc! { "id": id }).await?;
        Ok(content)
    }

    async fn find_public_by_share_code(&self, code: &str) -> AppResult<Option<GeneratedContent>> {
        let content = self
            .collection
            .find_one(doc! { "share_code": code, "is_public": true })
            .await?;
        Ok(content)
    }

    async fn share_code_exists(&self, code: &str) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "share_code": code })
            .await?;
        Ok(count > 0)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<GeneratedContent>, i64)> {
        let filter = doc! { "user_id": user_id };

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1, "_id": -1 })
            .skip(Some(offset.max(0) as u64))
            .limit(Some(limit))
            .build();

        let cursor = self.collection.find(filter).with_options(find_options).await?;
        let items: Vec<GeneratedContent> = cursor.try_collect().await?;

        Ok((items, total))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Content with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn set_share_code(&self, id: &str, code: &str) -> AppResult<GeneratedContent> {
        let issued = self
            .collection
            .find_one_and_update(
                doc! { "id": id, "share_code": null },
                doc! { "$set": { "share_code": code, "is_public": true } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        match issued {
            Some(record) => Ok(record),
            None => self
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Content with id '{}' not found", id))),
        }
    }

    async fn set_visibility(&self, id: &str, is_public: bool) -> AppResult<GeneratedContent> {
        self.update_and_fetch(id, doc! { "$set": { "is_public": is_public } })
            .await
    }

    async fn increment_views(&self, id: &str) -> AppResult<()> {
        self.collection
            .update_one(doc! { "id": id }, doc! { "$inc": { "views_count": 1_i64 } })
            .await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for generated content collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let share_code_index = IndexModel::builder()
            .keys(doc! { "share_code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "share_code": { "$type": "string" } })
                    .name("share_code_unique".to_string())
                    .build(),
            )
            .build();

        let history_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_history".to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_indexes(vec![id_index, share_code_index, history_index])
            .await?;

        log::info!("Successfully created indexes for generated content collection");
        Ok(())
    }
}
