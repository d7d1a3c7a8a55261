use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ideas_server::build_router;
use ideas_server::config::AppConfig;
use ideas_server::database::init_db;
use ideas_server::identity::JwtIdentityResolver;
use ideas_server::seed::ensure_indexes;
use ideas_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;

    let db = init_db(&config.database.url, config.database.max_connections).await?;
    ensure_indexes(&db).await?;
    info!("Database ready");

    let state = AppState {
        db,
        identity: Arc::new(JwtIdentityResolver::new(&config.auth.jwt_secret)),
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
