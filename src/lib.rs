pub mod api;
pub mod config;
pub mod crypto;
pub mod db;
pub mod models;
pub mod registro;
pub mod rut;
pub mod scoring;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::{ConfigError, Settings};
use crate::db::DatabaseError;
use crate::scoring::{ScoringError, ScoringTables};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Threshold tables rejected: {0}")]
    Tables(#[from] ScoringError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Server failed: {0}")]
    Server(String),
}

/// Initialize tracing. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Load settings, validate tables, migrate the database and serve the API
/// until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = Settings::from_env()?;
    let tables = ScoringTables::standard()?;

    {
        let conn = db::open_database(&settings.db_path)?;
        tracing::info!(
            path = %settings.db_path.display(),
            schema_version = db::get_current_version(&conn),
            "Database ready"
        );
    }

    let ctx = ApiContext::new(&settings, tables);
    let mut server = api::start_server_on(ctx, settings.bind_addr)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!(addr = %server.addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
    }
    server.shutdown();
    server.stopped().await;
    Ok(())
}
