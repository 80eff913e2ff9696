//! User entity - The owner of accounts and ledger entries.
//!
//! Authentication and session management live outside this crate; the user
//! row exists so ownership filtering has a stable identity to hang off, and
//! so the "default account created alongside a new user" lifecycle has a
//! parent record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Contact address used as the user's login identity by the outer layer
    #[sea_orm(unique)]
    pub email: String,
    /// When the user was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many accounts
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
    /// One user owns many ledger entries
    #[sea_orm(has_many = "super::entry::Entity")]
    Entries,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
