use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use caredesk::api::{server, ApiContext};
use caredesk::config::{self, Config};
use caredesk::db;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    if let Err(e) = run().await {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let config = Config::from_env();

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("cannot create data directory: {e}"))?;
    }
    std::fs::create_dir_all(&config.uploads_dir)
        .map_err(|e| format!("cannot create uploads directory: {e}"))?;

    // Fail fast if the database cannot be opened or migrated
    db::open_database(&config.db_path).map_err(|e| format!("database unavailable: {e}"))?;
    tracing::info!(db = %config.db_path.display(), "database ready");

    let bind_addr = config.bind_addr;
    let ctx = ApiContext::new(Arc::new(config));
    let server = server::start_server(ctx, bind_addr).await?;
    tracing::info!("listening on http://{}", server.addr);

    server.join().await;
    Ok(())
}
