use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use models::article::{self, Article, ArticleFields, NewArticle};

use crate::{article::repository::ArticleRepository, errors::ServiceError};

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Article>,
}

/// Process-local article store with the same contract as the SeaORM one.
///
/// Ids are assigned from a counter starting at 1 and never reused. Marking the
/// store offline makes every call fail with [`ServiceError::Db`], which stands
/// in for an unreachable database.
#[derive(Clone, Default)]
pub struct MemoryArticleRepository {
    table: Arc<RwLock<Table>>,
    offline: Arc<AtomicBool>,
}

impl MemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), ServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::Db("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn list_all(&self) -> Result<Vec<Article>, ServiceError> {
        self.check_online()?;
        let table = self.table.read().await;
        let mut rows: Vec<Article> = table.rows.values().cloned().collect();
        rows.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Article>, ServiceError> {
        self.check_online()?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, new: NewArticle) -> Result<Article, ServiceError> {
        self.check_online()?;
        article::validate_fields(&new.fields)?;
        let mut table = self.table.write().await;
        table.next_id += 1;
        let f = new.fields;
        let row = Article {
            id: table.next_id,
            title: f.title,
            description: f.description,
            content: f.content,
            author: f.author,
            image_url: f.image_url,
            published_at: new.published_at.unwrap_or_else(|| Utc::now().into()),
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, fields: ArticleFields) -> Result<Option<Article>, ServiceError> {
        self.check_online()?;
        article::validate_fields(&fields)?;
        let mut table = self.table.write().await;
        let Some(row) = table.rows.get_mut(&id) else { return Ok(None) };
        row.title = fields.title;
        row.description = fields.description;
        row.content = fields.content;
        row.author = fields.author;
        row.image_url = fields.image_url;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<Option<Article>, ServiceError> {
        self.check_online()?;
        Ok(self.table.write().await.rows.remove(&id))
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        self.check_online()
    }
}
