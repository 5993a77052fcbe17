use demo_app::config::Config;
use demo_app::db::Database;
use demo_app::handlers::{self, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the demo HTTP service.
///
/// Initializes logging, loads and validates the configuration, prepares the
/// database pool and serves the router until the process is stopped.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo_app=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Connections are opened on demand; /health reports when they fail
    let db = Database::connect_lazy(&config);
    tracing::info!(
        "Database pool prepared for {} (max {} connections)",
        config.database.describe(),
        config.db_max_connections
    );

    let addr = config.bind_addr();
    let app_state = Arc::new(AppState {
        db: db.pool.clone(),
        config,
    });

    let app = handlers::router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
