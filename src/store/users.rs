//! User persistence - identity rows that accounts and entries hang off.
//!
//! Authentication lives outside this crate; these functions only manage the
//! stable identity records the rest of the store filters on.

use crate::{
    entities::{User, user},
    errors::Result,
};
use sea_orm::{Set, prelude::*};

/// Inserts a new user row.
///
/// Email uniqueness is enforced by the database; callers wanting a friendly
/// duplicate-email error check with [`get_user_by_email`] first.
pub async fn insert_user<C: ConnectionTrait>(db: &C, email: &str) -> Result<user::Model> {
    let model = user::ActiveModel {
        email: Set(email.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Finds a user by their unique email, returning None if absent.
pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a user by primary key.
pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}
