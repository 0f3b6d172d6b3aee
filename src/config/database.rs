//! Database configuration module.
//!
//! Opens the `SeaORM` connection and creates the schema from the entity definitions with
//! `Schema::create_table_from_entity`, so the table always matches the Rust model without
//! hand-written SQL. Table and index creation use `IF NOT EXISTS` and are safe to run on
//! every start.

use crate::entities::Subscription;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default database when neither the config file nor `DATABASE_URL` names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/subscriptions.sqlite?mode=rwc";

/// Opens a connection pool to `database_url`.
#[instrument(skip(database_url))]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    let db = Database::connect(database_url).await?;
    info!(backend = ?db.get_database_backend(), "Database connection established");
    Ok(db)
}

/// Creates the parent directory of a file-backed `SQLite` database.
///
/// `mode=rwc` lets `SQLite` create the file itself, but not a missing directory. Other
/// backends and in-memory databases are left alone.
pub fn ensure_sqlite_directory(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
        debug!(directory = %parent.display(), "Ensured SQLite directory");
    }
    Ok(())
}

/// Creates the subscriptions table and its indexes if they are missing.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut subscription_table = schema.create_table_from_entity(Subscription);
    subscription_table.if_not_exists();
    db.execute(builder.build(&subscription_table)).await?;

    for mut index in schema.create_index_from_entity(Subscription) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }

    debug!("Subscription schema ensured");
    Ok(())
}
