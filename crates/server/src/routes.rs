use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use service::article::ArticleService;

use crate::errors::ApiError;

pub mod articles;
pub mod health;

/// Shared by every handler. Cloning is cheap: the service holds an `Arc`
/// around the repository, which in turn holds the connection pool.
#[derive(Clone)]
pub struct ServerState {
    pub articles: ArticleService,
}

impl ServerState {
    pub fn new(articles: ArticleService) -> Self { Self { articles } }
}

/// Catch-all for unknown paths and for unsupported methods on known ones.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Build the full application router: health probes plus the article API.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health).fallback(route_not_found))
        .route("/health/db", get(health::health_db).fallback(route_not_found))
        .route("/api-docs/openapi.json", get(crate::openapi::openapi_json).fallback(route_not_found));

    let article_routes = Router::new()
        .route(
            "/api/articles",
            get(articles::list).post(articles::create).fallback(route_not_found),
        )
        .route(
            "/api/articles/:id",
            get(articles::get)
                .put(articles::update)
                .delete(articles::delete)
                .fallback(route_not_found),
        );

    health_routes
        .merge(article_routes)
        .fallback(route_not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
