//! Database configuration module for `PocketLedger`.
//!
//! Handles `SQLite` connection setup and table creation using `SeaORM`. Table
//! creation uses `Schema::create_table_from_entity` so the database schema is
//! generated from the entity definitions without manual SQL; the same code
//! path backs both the on-disk database and the in-memory databases used by
//! tests.

use crate::entities::{Account, Entry, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/pocket_ledger.sqlite?mode=rwc";

/// Resolves the database URL from the environment.
///
/// Loads a `.env` file if present (non-fatal when missing), then reads
/// `DATABASE_URL`, falling back to a local `SQLite` file.
pub fn get_database_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database described by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    info!(%database_url, "connecting to ledger database");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Creates tables for users, accounts, and entries. Safe to call on a fresh
/// database only; existing tables make the underlying DDL fail.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema.create_table_from_entity(User);
    let account_table = schema.create_table_from_entity(Account);
    let entry_table = schema.create_table_from_entity(Entry);

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&account_table)).await?;
    db.execute(builder.build(&entry_table)).await?;

    info!("ledger tables created");
    Ok(())
}
