//! PhishGuard GRC Register Server
//!
//! Serves the risk register produced by the `phishguard` pipeline to
//! dashboards: filtered rows, the risk summary, the control mapping, the
//! Markdown compliance report and classification metrics.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 PHISHGUARD REGISTER API              │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────────────────────────┐  │
//! │  │  Router   │──▶│  Register snapshot (RwLock)    │  │
//! │  │  (Axum)   │   │  swapped by upload / reset     │  │
//! │  └─────┬─────┘   └────────────────────────────────┘  │
//! │        ▼                                              │
//! │  register CSV · metrics JSON · control policy        │
//! └──────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod state;


use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use phishguard_core::logic::risk::ControlPolicy;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

pub use error::{AppError, AppResult};
pub use state::{AppState, RegisterSnapshot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "phishguard_cloud=debug,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("PhishGuard register server starting...");
    tracing::info!("Register: {}", config.register_path.display());

    let policy = match &config.policy_path {
        Some(path) => ControlPolicy::load(path)
            .with_context(|| format!("failed to load control policy {}", path.display()))?,
        None => ControlPolicy::default(),
    };

    let snapshot = RegisterSnapshot::load_default(&config.register_path)
        .await
        .context("failed to load register")?;

    // Build application state
    let state = AppState::new(config.clone(), policy, snapshot);

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let register_routes = Router::new()
        .route(
            "/api/v1/register",
            get(handlers::register::list)
                .post(handlers::register::upload)
                .delete(handlers::register::reset),
        )
        .route("/api/v1/register/levels", get(handlers::register::levels))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    let report_routes = Router::new()
        .route("/api/v1/reports/summary", get(handlers::reports::summary))
        .route("/api/v1/reports/controls", get(handlers::reports::controls))
        .route("/api/v1/reports/compliance", get(handlers::reports::compliance))
        .route("/api/v1/metrics", get(handlers::metrics::get));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(register_routes)
        .merge(report_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
