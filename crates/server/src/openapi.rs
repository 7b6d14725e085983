use axum::Json;
use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub timestamp: String }

#[derive(ToSchema)]
pub struct DbHealthResponse { pub status: String, pub database: String, pub error: Option<String> }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
pub struct ArticleDoc {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
    /// RFC 3339, set by the server at creation.
    pub published_at: String,
}

/// Accepted as JSON or as a urlencoded form.
#[derive(ToSchema)]
pub struct ArticleInputDoc {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

#[derive(ToSchema)]
pub struct DeleteOutputDoc { pub message: String, pub article: ArticleDoc }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::health::health_db,
        crate::routes::articles::list,
        crate::routes::articles::get,
        crate::routes::articles::create,
        crate::routes::articles::update,
        crate::routes::articles::delete,
    ),
    components(
        schemas(
            HealthResponse,
            DbHealthResponse,
            ErrorDoc,
            ArticleDoc,
            ArticleInputDoc,
            DeleteOutputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "articles")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_article_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/health/db", "/api/articles", "/api/articles/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let item = &doc.paths.paths["/api/articles/{id}"];
        assert!(item.get.is_some() && item.put.is_some() && item.delete.is_some());
        assert!(item.patch.is_none());
    }
}
