use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::article::{self, Article, ArticleFields, NewArticle};

use crate::errors::ServiceError;

/// Durable CRUD over articles. "Absent" is `Ok(None)`, never an error.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Article>, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<Option<Article>, ServiceError>;
    async fn create(&self, new: NewArticle) -> Result<Article, ServiceError>;
    async fn update(&self, id: i32, fields: ArticleFields) -> Result<Option<Article>, ServiceError>;
    async fn delete(&self, id: i32) -> Result<Option<Article>, ServiceError>;
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmArticleRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmArticleRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ArticleRepository for SeaOrmArticleRepository {
    async fn list_all(&self) -> Result<Vec<Article>, ServiceError> {
        Ok(article::list_all(&self.db).await?)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Article>, ServiceError> {
        Ok(article::find(&self.db, id).await?)
    }

    async fn create(&self, new: NewArticle) -> Result<Article, ServiceError> {
        Ok(article::create(&self.db, new).await?)
    }

    async fn update(&self, id: i32, fields: ArticleFields) -> Result<Option<Article>, ServiceError> {
        Ok(article::update(&self.db, id, fields).await?)
    }

    async fn delete(&self, id: i32) -> Result<Option<Article>, ServiceError> {
        Ok(article::delete(&self.db, id).await?)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(models::db::ping(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn fields(title: &str) -> ArticleFields {
        ArticleFields {
            title: title.to_string(),
            description: Some("summary".into()),
            content: "body".into(),
            author: Some("desk".into()),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn article_crud_against_postgres() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmArticleRepository::new(db);

        let created = repo.create(fields("pg crud").into()).await?;
        let found = repo.get_by_id(created.id).await?.expect("created row is readable");
        assert_eq!(found, created);

        let mut changed = fields("pg crud v2");
        changed.author = None;
        let updated = repo.update(created.id, changed).await?.expect("row exists");
        assert_eq!(updated.title, "pg crud v2");
        assert_eq!(updated.author, None);
        assert_eq!(updated.published_at, created.published_at);

        let listed = repo.list_all().await?;
        assert!(listed.iter().any(|a| a.id == created.id));

        let deleted = repo.delete(created.id).await?.expect("row existed");
        assert_eq!(deleted, updated);
        assert!(repo.get_by_id(created.id).await?.is_none());
        assert!(repo.delete(created.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_id_does_not_insert() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmArticleRepository::new(db);

        let before = repo.list_all().await?.len();
        assert!(repo.update(i32::MAX, fields("ghost")).await?.is_none());
        assert_eq!(repo.list_all().await?.len(), before);
        Ok(())
    }

    #[tokio::test]
    async fn long_title_and_author_persist() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmArticleRepository::new(db);

        let mut long = fields(&"t".repeat(300));
        long.author = Some("a".repeat(300));
        let created = repo.create(long.clone().into()).await?;
        assert_eq!(created.title, long.title);
        assert_eq!(created.author, long.author);
        repo.delete(created.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn ping_succeeds_on_live_database() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        SeaOrmArticleRepository::new(db).ping().await?;
        Ok(())
    }
}
