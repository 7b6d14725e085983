use axum::{extract::State, http::StatusCode, Json};
use common::types::{DbHealth, Health};
use tracing::error;

use super::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::now())
}

#[utoipa::path(
    get, path = "/health/db", tag = "health",
    responses(
        (status = 200, description = "Database connected", body = crate::openapi::DbHealthResponse),
        (status = 503, description = "Database disconnected", body = crate::openapi::DbHealthResponse)
    )
)]
/// The one endpoint allowed to echo storage error detail back to the caller.
pub async fn health_db(State(state): State<ServerState>) -> (StatusCode, Json<DbHealth>) {
    match state.articles.ping().await {
        Ok(()) => (StatusCode::OK, Json(DbHealth::connected())),
        Err(e) => {
            error!(error = %e, "database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(DbHealth::disconnected(e.to_string())))
        }
    }
}
