//! Core business logic - framework-agnostic ledger operations.
//!
//! Everything here takes a persistence handle and the owning user's identity
//! as explicit parameters and returns structured data for a presentation
//! layer to format.

/// Account operations and the new-user bootstrap
pub mod account;
/// Entry recording and deletion
pub mod entry;
/// CSV export of raw entries
pub mod export;
/// Net-base normalization - the currency conversion and sign policy
pub mod normalize;
/// The aggregation engine - reporting views over the ledger store
pub mod report;
