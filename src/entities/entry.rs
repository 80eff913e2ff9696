//! Entry entity - A single financial event in the ledger.
//!
//! Each entry carries its own currency plus a user-supplied conversion rate
//! to the base currency, and stores a derived `net_base` value computed once
//! at creation time. `net_base` is the source of truth for all aggregation;
//! it is never recomputed from amount/fee/rate afterward. Entries are
//! immutable once recorded: they are only ever created and deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Flow direction of an entry - a closed two-variant tag, never free text.
///
/// Sign policy lives entirely here and in
/// [`compute_net_base`](crate::core::normalize::compute_net_base): `amount`
/// and `fee` are stored as non-negative magnitudes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money flowing in; net value is positive (minus the fee)
    #[sea_orm(string_value = "income")]
    Income,
    /// Money flowing out; net value is negative (and the fee still debits)
    #[default]
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl Direction {
    /// Stable lowercase label, matching the stored database value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning user; every query filters on it
    pub user_id: i64,
    /// Calendar date of the event - the bucketing key for all aggregations
    pub date: Date,
    /// Income or expense; the only carrier of sign
    pub direction: Direction,
    /// Non-negative magnitude in the entry's own currency
    pub amount: f64,
    /// Non-negative fee in the entry's own currency, always a cost
    pub fee: f64,
    /// ISO-like currency code, e.g. `"CNY"`, `"USD"`
    pub currency: String,
    /// 1 unit of `currency` = `rate_to_base` units of the base currency
    pub rate_to_base: f64,
    /// Optional weak reference to an account; entries may be unassigned
    pub account_id: Option<i64>,
    /// Free-form classification; `None` is reported as "Uncategorized"
    pub category: Option<String>,
    /// Comma-separated free-form tags
    pub tags: String,
    /// Free-form note
    pub note: String,
    /// Derived, stored signed value in base currency (income positive,
    /// expense negative, fee included)
    pub net_base: f64,
    /// When the entry was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Entry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each entry optionally belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
