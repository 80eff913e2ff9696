//! Shared test utilities for `PocketLedger`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test users, accounts, and entries with sensible
//! defaults.

use crate::{
    core::entry::{AccountRef, NewEntry, record_entry},
    entities::{Direction, account, entry, user},
    errors::Result,
    store,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a `NaiveDate` from literals known valid at the call site.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test user with the given email.
pub async fn create_test_user(db: &DatabaseConnection, email: &str) -> Result<user::Model> {
    store::users::insert_user(db, email).await
}

/// Sets up a complete test environment with one user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "test@example.com").await?;
    Ok((db, user))
}

/// Creates a test account with a 0.0 initial balance.
pub async fn create_test_account(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<account::Model> {
    store::accounts::insert_account(db, user_id, name, 0.0).await
}

/// Creates a test account with a custom initial balance.
pub async fn create_custom_account(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    initial_balance: f64,
) -> Result<account::Model> {
    store::accounts::insert_account(db, user_id, name, initial_balance).await
}

/// Records a test entry with sensible defaults.
///
/// # Defaults
/// * `fee`: 0.0
/// * `currency`: base currency ("CNY")
/// * `rate_to_base`: 1.0
/// * `account`: unassigned
/// * `category`: absent
pub async fn record_test_entry(
    db: &DatabaseConnection,
    user_id: i64,
    on: NaiveDate,
    direction: Direction,
    amount: f64,
) -> Result<entry::Model> {
    record_entry(
        db,
        user_id,
        NewEntry {
            date: Some(on),
            direction,
            amount,
            ..Default::default()
        },
    )
    .await
}

/// Records a test entry attached to an existing account.
pub async fn record_account_entry(
    db: &DatabaseConnection,
    user_id: i64,
    account_id: i64,
    on: NaiveDate,
    direction: Direction,
    amount: f64,
) -> Result<entry::Model> {
    record_entry(
        db,
        user_id,
        NewEntry {
            date: Some(on),
            direction,
            amount,
            account: AccountRef::Existing(account_id),
            ..Default::default()
        },
    )
    .await
}
