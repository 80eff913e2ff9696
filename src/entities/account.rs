//! Account entity - A named bucket of ledger entries owned by one user.
//!
//! The current balance is never stored: it is always computed on read as
//! `initial_balance` plus the net sum of referencing entries, which removes
//! any update-anomaly risk at the cost of an aggregate per view.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning user
    pub user_id: i64,
    /// Display label; unique only by convention, not enforced
    pub name: String,
    /// Starting balance in base currency, user-supplied, never derived
    pub initial_balance: f64,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each account belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One account has many entries (weak reference, entries may be unassigned)
    #[sea_orm(has_many = "super::entry::Entity")]
    Entries,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
