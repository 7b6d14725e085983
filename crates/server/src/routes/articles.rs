use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    Form, Json,
};
use models::article::{Article, ArticleFields};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ServerState;
use crate::errors::ApiError;

/// Request body for create and update. Everything is optional at the wire
/// level; presence of `title` and `content` is checked before any storage call.
/// Unknown keys (`id`, `published_at`) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ArticlePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

impl ArticlePayload {
    pub fn into_fields(self) -> Result<ArticleFields, ApiError> {
        let title = self.title.filter(|t| !t.is_empty());
        let content = self.content.filter(|c| !c.is_empty());
        let (Some(title), Some(content)) = (title, content) else {
            return Err(ApiError::MissingFields);
        };
        Ok(ArticleFields {
            title,
            description: self.description,
            content,
            author: self.author,
            image_url: self.image_url,
        })
    }
}

/// Body extractor for article writes.
///
/// JSON and urlencoded forms are decoded; an empty body or any other content
/// type reads as `{}`, so the request fails field validation rather than
/// body decoding.
#[derive(Debug)]
pub struct ArticleBody(pub ArticlePayload);

fn content_type(req: &Request) -> String {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default()
}

#[async_trait]
impl<S> FromRequest<S> for ArticleBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ct = content_type(&req);
        let mime = ct.split(';').next().unwrap_or_default().trim().to_string();

        if mime == "application/x-www-form-urlencoded" {
            let Form(payload) = Form::<ArticlePayload>::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
            return Ok(Self(payload));
        }

        let is_json = mime == "application/json" || mime.ends_with("+json");
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidBody(e.to_string()))?;
        if !is_json || bytes.is_empty() {
            return Ok(Self(ArticlePayload::default()));
        }
        let Json(payload) = Json::<ArticlePayload>::from_bytes(&bytes)?;
        Ok(Self(payload))
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    pub message: &'static str,
    pub article: Article,
}

/// Ids are integers; any other path segment cannot name an article.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| ApiError::NotFound)
}

#[utoipa::path(
    get, path = "/api/articles", tag = "articles",
    responses(
        (status = 200, description = "Articles, newest first", body = [crate::openapi::ArticleDoc]),
        (status = 500, description = "Internal server error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Article>>, ApiError> {
    let list = state.articles.list_all().await?;
    info!(count = list.len(), "list articles");
    Ok(Json(list))
}

#[utoipa::path(
    get, path = "/api/articles/{id}", tag = "articles",
    params(("id" = i32, Path, description = "Article id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ArticleDoc),
        (status = 404, description = "Article not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Article>, ApiError> {
    let id = parse_id(&id)?;
    state.articles.get(id).await?.map(Json).ok_or(ApiError::NotFound)
}

#[utoipa::path(
    post, path = "/api/articles", tag = "articles",
    request_body = crate::openapi::ArticleInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ArticleDoc),
        (status = 400, description = "Title and content are required", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Internal server error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ArticleBody(payload): ArticleBody,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let fields = payload.into_fields()?;
    let created = state.articles.create(fields.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/articles/{id}", tag = "articles",
    params(("id" = i32, Path, description = "Article id")),
    request_body = crate::openapi::ArticleInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ArticleDoc),
        (status = 400, description = "Title and content are required", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Article not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ArticleBody(payload): ArticleBody,
) -> Result<Json<Article>, ApiError> {
    let fields = payload.into_fields()?;
    let id = parse_id(&id)?;
    state.articles.update(id, fields).await?.map(Json).ok_or(ApiError::NotFound)
}

#[utoipa::path(
    delete, path = "/api/articles/{id}", tag = "articles",
    params(("id" = i32, Path, description = "Article id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::DeleteOutputDoc),
        (status = 404, description = "Article not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<DeleteOutput>, ApiError> {
    let id = parse_id(&id)?;
    let article = state.articles.delete(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(DeleteOutput { message: "Article deleted successfully", article }))
}
