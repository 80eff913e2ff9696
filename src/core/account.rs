//! Account business logic and the new-user bootstrap.
//!
//! Accounts are created explicitly here, or implicitly: every new user gets
//! a default account, and an account can be created inline while recording
//! an entry (see [`crate::core::entry`]).

use crate::{
    entities::{account, user},
    errors::{Error, Result},
    store,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::info;

/// Name given to the account created alongside a new user.
pub const DEFAULT_ACCOUNT_NAME: &str = "Default";

/// Creates a new account after validating the name is not blank.
pub async fn create_account(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    initial_balance: f64,
) -> Result<account::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Account name cannot be empty".to_string(),
        });
    }
    store::accounts::insert_account(db, user_id, name, initial_balance).await
}

/// Deletes an account, leaving its entries behind with the reference nulled.
pub async fn delete_account(db: &DatabaseConnection, user_id: i64, account_id: i64) -> Result<()> {
    store::accounts::delete_account(db, user_id, account_id).await
}

/// Creates a new user together with their default account, in one
/// transaction. Mirrors the registration flow of the outer layer: identity
/// verification is not this crate's concern, but the user row and its
/// starter account are.
pub async fn create_user_with_default_account(
    db: &DatabaseConnection,
    email: &str,
) -> Result<(user::Model, account::Model)> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(Error::Config {
            message: "Email cannot be empty".to_string(),
        });
    }
    if store::users::get_user_by_email(db, &email).await?.is_some() {
        return Err(Error::Config {
            message: format!("Email already registered: {email}"),
        });
    }

    let txn = db.begin().await?;
    let user = store::users::insert_user(&txn, &email).await?;
    let account = store::accounts::insert_account(&txn, user.id, DEFAULT_ACCOUNT_NAME, 0.0).await?;
    txn.commit().await?;

    info!(user_id = user.id, "user created with default account");
    Ok((user, account))
}
