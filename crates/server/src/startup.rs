use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, LogFormat};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth::AuthEndpoint};
use service::auth::{repo::SeaOrmAuthStore, AccountService, AuthConfig};

/// Initialize logging via shared common utils
pub fn init_logging(cfg: &AppConfig) {
    let filter = cfg.logging.filter.as_deref();
    match cfg.logging.format {
        LogFormat::Compact => common::utils::logging::init_logging_compact(filter),
        LogFormat::Json => common::utils::logging::init_logging_json(filter),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: connect, migrate, build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let store = Arc::new(SeaOrmAuthStore::new(db));
    let accounts = Arc::new(AccountService::new(store, AuthConfig::from(&cfg.auth)));
    let app: Router = routes::build_router(AuthEndpoint::new(accounts), build_cors());

    let addr: SocketAddr = cfg.bind_addr().parse()?;
    info!(%addr, "starting auth server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, draining connections");
    }
}
