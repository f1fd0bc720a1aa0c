use anyhow::Context;
use backend::api::{self, AppState};
use backend::auth::{AuthService, JwtAuth};
use backend::config::ServerConfig;
use backend::session::SessionCoordinator;
use backend::store::{GameStore, MemoryGameStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = ServerConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if config.uses_dev_secret() {
        warn!("CHESS_JWT_SECRET not set, using the development secret");
    }

    let store: Arc<dyn GameStore> = Arc::new(MemoryGameStore::new());
    let auth: Arc<dyn AuthService> = Arc::new(JwtAuth::new(config.jwt_secret.as_bytes()));
    let state = AppState::new(store, auth);
    let coordinator = state.coordinator.clone();

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "chess server listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal(coordinator))
        .await
        .context("server error")?;

    info!("chess server stopped");
    Ok(())
}

/// Wait for Ctrl-C, then close every socket so in-flight connections can drain
async fn shutdown_signal(coordinator: Arc<SessionCoordinator>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
    coordinator.shutdown();
}
