use sea_orm::{
    entity::prelude::*, ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub author: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    pub published_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub type Article = Model;

/// Every field an update replaces. `id` and `published_at` are fixed at creation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArticleFields {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewArticle {
    pub fields: ArticleFields,
    /// Defaults to the insert time when `None`.
    pub published_at: Option<DateTimeWithTimeZone>,
}

impl From<ArticleFields> for NewArticle {
    fn from(fields: ArticleFields) -> Self {
        Self { fields, published_at: None }
    }
}

pub fn validate_title(t: &str) -> Result<(), ModelError> {
    if t.is_empty() {
        return Err(ModelError::Validation("title must not be empty".into()));
    }
    Ok(())
}

pub fn validate_content(c: &str) -> Result<(), ModelError> {
    if c.is_empty() {
        return Err(ModelError::Validation("content must not be empty".into()));
    }
    Ok(())
}

pub fn validate_fields(f: &ArticleFields) -> Result<(), ModelError> {
    validate_title(&f.title)?;
    validate_content(&f.content)
}

/// Newest first; `id` breaks ties between articles published in the same instant.
pub fn list_query() -> Select<Entity> {
    Entity::find()
        .order_by_desc(Column::PublishedAt)
        .order_by_desc(Column::Id)
}

fn apply_fields(am: &mut ActiveModel, f: ArticleFields) {
    am.title = Set(f.title);
    am.description = Set(f.description);
    am.content = Set(f.content);
    am.author = Set(f.author);
    am.image_url = Set(f.image_url);
}

pub fn new_active_model(new: NewArticle) -> ActiveModel {
    let mut am = ActiveModel {
        id: NotSet,
        published_at: Set(new.published_at.unwrap_or_else(|| Utc::now().into())),
        ..Default::default()
    };
    apply_fields(&mut am, new.fields);
    am
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(list_query().all(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn create(db: &DatabaseConnection, new: NewArticle) -> Result<Model, ModelError> {
    validate_fields(&new.fields)?;
    let model = new_active_model(new).insert(db).await?;
    Ok(model)
}

/// Replace all mutable fields. Returns `None` for an unknown id; never inserts.
pub async fn update(db: &DatabaseConnection, id: i32, fields: ArticleFields) -> Result<Option<Model>, ModelError> {
    validate_fields(&fields)?;
    let txn = db.begin().await?;
    let Some(found) = Entity::find_by_id(id).lock_exclusive().one(&txn).await? else {
        txn.commit().await?;
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    apply_fields(&mut am, fields);
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    Ok(Some(updated))
}

/// Remove the row and hand back what it held. `None` when nothing was there.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    let txn = db.begin().await?;
    let Some(found) = Entity::find_by_id(id).lock_exclusive().one(&txn).await? else {
        txn.commit().await?;
        return Ok(None);
    };
    Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(Some(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn fields(title: &str, content: &str) -> ArticleFields {
        ArticleFields { title: title.into(), content: content.into(), ..Default::default() }
    }

    #[test]
    fn empty_title_or_content_rejected() {
        assert!(matches!(validate_fields(&fields("", "body")), Err(ModelError::Validation(_))));
        assert!(matches!(validate_fields(&fields("title", "")), Err(ModelError::Validation(_))));
        assert!(validate_fields(&fields("title", "body")).is_ok());
    }

    #[test]
    fn free_text_columns_are_unbounded() {
        for col in [Column::Title, Column::Description, Column::Content, Column::Author, Column::ImageUrl] {
            assert_eq!(col.def().get_column_type(), &ColumnType::Text, "{col:?}");
        }
    }

    #[test]
    fn list_orders_newest_first() {
        let sql = list_query().build(DbBackend::Postgres).sql;
        assert!(sql.contains(r#"ORDER BY "articles"."published_at" DESC, "articles"."id" DESC"#), "{sql}");
    }

    #[test]
    fn user_values_are_bound_not_inlined() {
        let hostile = "x'); DROP TABLE articles; --";
        let new = NewArticle::from(ArticleFields {
            title: hostile.into(),
            content: "body".into(),
            author: Some(hostile.into()),
            ..Default::default()
        });
        let stmt = Entity::insert(new_active_model(new)).build(DbBackend::Postgres);
        assert!(!stmt.sql.contains("DROP TABLE"), "{}", stmt.sql);
        assert!(stmt.sql.contains("$1"));
        let values = stmt.values.expect("insert carries bound values");
        assert!(format!("{values:?}").contains("DROP TABLE"));

        let stmt = Entity::find_by_id(7).build(DbBackend::Postgres);
        assert!(stmt.sql.contains(r#""articles"."id" = $1"#), "{}", stmt.sql);
    }

    #[test]
    fn published_at_defaults_to_now() {
        let before = Utc::now();
        let am = new_active_model(fields("a", "b").into());
        let published: DateTimeWithTimeZone = am.published_at.unwrap();
        assert!(published.with_timezone(&Utc) >= before);
    }

    #[test]
    fn supplied_published_at_is_kept() {
        let at = DateTimeWithTimeZone::parse_from_rfc3339("2024-03-01T08:00:00+00:00").unwrap();
        let am = new_active_model(NewArticle { fields: fields("a", "b"), published_at: Some(at) });
        assert_eq!(am.published_at.unwrap(), at);
    }
}
