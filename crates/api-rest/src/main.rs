//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you want the REST server without the workspace's
//! `filecdn-run` wrapper (which additionally loads a `.env` file).

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use filecdn_core::{
    public_base_url_from_env_value, root_dir_from_env_value, CoreConfig, ListingService,
};

/// Main entry point for the filecdn REST API server
///
/// # Environment Variables
/// - `FILECDN_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `FILECDN_ROOT_DIR`: Directory to serve (default: "files_root")
/// - `FILECDN_PUBLIC_URL`: Base URL used in generated links (default: "http://localhost:3000")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the served root is missing or the public URL is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("FILECDN_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        root_dir_from_env_value(std::env::var("FILECDN_ROOT_DIR").ok()),
        public_base_url_from_env_value(std::env::var("FILECDN_PUBLIC_URL").ok()),
    )?);

    tracing::info!(
        "-- Starting filecdn REST API on {} serving {}",
        addr,
        cfg.root_dir().display()
    );

    let app = router(AppState::new(Arc::new(ListingService::new(cfg))));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
