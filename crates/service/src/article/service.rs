use std::sync::Arc;

use tracing::{info, instrument};

use models::article::{validate_fields, Article, ArticleFields, NewArticle};

use crate::{article::repository::ArticleRepository, errors::ServiceError};

/// Application service in front of an [`ArticleRepository`].
/// Enforces the title/content rule before any write reaches storage.
#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self { Self { repo } }

    pub async fn list_all(&self) -> Result<Vec<Article>, ServiceError> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: i32) -> Result<Option<Article>, ServiceError> { self.repo.get_by_id(id).await }

    #[instrument(skip(self, new), fields(title = %new.fields.title))]
    pub async fn create(&self, new: NewArticle) -> Result<Article, ServiceError> {
        validate_fields(&new.fields)?;
        let created = self.repo.create(new).await?;
        info!(id = created.id, "article_created");
        Ok(created)
    }

    /// All-or-nothing replacement: missing optional fields become `None`.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: i32, changes: ArticleFields) -> Result<Option<Article>, ServiceError> {
        validate_fields(&changes)?;
        let updated = self.repo.update(id, changes).await?;
        if updated.is_some() {
            info!(id, "article_updated");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<Option<Article>, ServiceError> {
        let deleted = self.repo.delete(id).await?;
        if deleted.is_some() {
            info!(id, "article_deleted");
        }
        Ok(deleted)
    }

    pub async fn ping(&self) -> Result<(), ServiceError> { self.repo.ping().await }
}
