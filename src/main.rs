use dotenvy::dotenv;
use std::sync::Arc;
use subscription_tracker::{
    api::{self, AppState},
    config::{self, database},
    core::DatabaseStore,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file (as early as possible)
    let dotenv_loaded = dotenv().is_ok(); // Non-fatal, env vars can be set externally

    // 2. Load the application configuration
    let app_config = config::load_app_config()?;

    // 3. Initialize tracing; RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.server.log_filter)),
        )
        .init();
    info!(dotenv_loaded, "Configuration loaded.");

    // 4. Initialize database and schema
    database::ensure_sqlite_directory(&app_config.database.url)?;
    let db = database::create_connection(&app_config.database.url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Serve the API until shutdown
    let state = AppState::new(Arc::new(DatabaseStore::new(db)));
    api::serve(&app_config.server.bind_address, state)
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    Ok(())
}
