//! Database configuration module for Lobby Locator.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables are generated
//! from the entity definitions with `Schema::create_table_from_entity`, so the schema always
//! matches the Rust structs without hand-written SQL.

use crate::entities::{Game, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Returns the file path of an `SQLite` URL, or `None` for in-memory and non-`SQLite`
/// URLs.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// Creates the directory an `SQLite` database file lives in, if it is missing.
async fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    let Some(parent) = sqlite_file_path(database_url).and_then(Path::parent) else {
        return Ok(());
    };
    if !parent.as_os_str().is_empty() {
        debug!("Ensuring database directory {} exists", parent.display());
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Establishes a connection to the database at `database_url`.
///
/// For file-backed `SQLite` databases the containing directory is created first.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    ensure_sqlite_parent_dir(database_url).await?;
    let db = Database::connect(database_url).await?;
    info!("Connected to database");
    Ok(db)
}

/// Creates all tables that do not exist yet.
///
/// Safe to call on every startup: existing tables and their rows are left untouched.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let game_table = schema.create_table_from_entity(Game).if_not_exists().to_owned();
    let user_table = schema.create_table_from_entity(User).if_not_exists().to_owned();

    db.execute(builder.build(&game_table)).await?;
    db.execute(builder.build(&user_table)).await?;

    Ok(())
}
