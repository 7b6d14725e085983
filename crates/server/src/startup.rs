use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::routes::{self, ServerState};
use service::article::{ArticleService, SeaOrmArticleRepository};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(cfg.bind_addr().parse()?)
}

/// Probe the pool once at startup. A database that is down is logged, not
/// fatal: the API stays up and `/health/db` reports the outage.
async fn check_database(db: &DatabaseConnection, run_migrations: bool) -> anyhow::Result<()> {
    if let Err(e) = models::db::ping(db).await {
        error!(event = "db_unreachable", error = %e, "failed to connect to database");
        return Ok(());
    }
    info!(event = "db_connected", "database connection established successfully");
    if run_migrations {
        migration::Migrator::up(db, None).await?;
        info!(event = "migrations_applied", "database schema up to date");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(event = "shutdown_signal", signal = "SIGINT", "closing HTTP server"),
        _ = terminate => info!(event = "shutdown_signal", signal = "SIGTERM", "closing HTTP server"),
    }
}

/// Wire the article service onto an existing pool.
pub fn build_app(db: DatabaseConnection) -> Router {
    let repo = Arc::new(SeaOrmArticleRepository::new(db));
    let state = ServerState::new(ArticleService::new(repo));
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and run the HTTP server until a shutdown signal.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = configs::AppConfig::load()?;

    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from(&cfg.database)).await?;
    check_database(&db, cfg.database.run_migrations).await?;

    let app = build_app(db.clone());

    let addr = load_bind_addr(&cfg.server)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, event = "listening", "FastNews API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(event = "http_closed", "HTTP server closed");

    if let Err(e) = db.close().await {
        warn!(error = %e, "error while closing database pool");
    } else {
        info!(event = "db_closed", "database pool closed");
    }
    Ok(())
}
