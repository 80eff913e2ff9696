//! Ledger store - persistence layer for users, accounts, and entries.
//!
//! Every function takes the database connection and the owning user's
//! identity as explicit parameters; there is no ambient global state. User
//! isolation is enforced by filtering every query on `user_id`. The aggregate
//! query contract in [`entries`] is what the aggregation engine in
//! [`crate::core::report`] is expressed in terms of, so its shapes (inclusive
//! bounds, silent date gaps, `YYYY-MM` month labels, positive-only category
//! sums) must hold identically for any backend.

pub mod accounts;
pub mod entries;
pub mod users;
