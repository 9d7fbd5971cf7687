use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use filecdn_core::{
    CoreConfig, ListingService, public_base_url_from_env_value, root_dir_from_env_value,
};

/// Main entry point for the filecdn application
///
/// Loads `.env`, resolves the served root and public URL once, and serves the REST API.
///
/// # Environment Variables
/// - `FILECDN_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `FILECDN_ROOT_DIR`: Directory to serve (default: "files_root")
/// - `FILECDN_PUBLIC_URL`: Base URL used in generated links (default: "http://localhost:3000")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("filecdn=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("FILECDN_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::new(
        root_dir_from_env_value(std::env::var("FILECDN_ROOT_DIR").ok()),
        public_base_url_from_env_value(std::env::var("FILECDN_PUBLIC_URL").ok()),
    )?);

    tracing::info!("++ Starting filecdn REST on {}", rest_addr);
    tracing::info!("++ Serving {} as {}", cfg.root_dir().display(), cfg.public_base_url());

    let app = router(AppState::new(Arc::new(ListingService::new(cfg))));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
