//! Entry recording business logic.
//!
//! Applies the lenient input policy (absolute values, default currency and
//! rate), computes the stored `net_base` via the normalization function, and
//! handles the inline-account flow: an entry can name a brand-new account
//! that is created together with it in one transaction.

use crate::{
    core::normalize::{BASE_CURRENCY, compute_net_base},
    entities::{Direction, entry},
    errors::{Error, Result},
    store,
    store::entries::EntryRecord,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::debug;

/// How a new entry is attached to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccountRef {
    /// No account; the entry is recorded unassigned
    #[default]
    Unassigned,
    /// Attach to an existing account by id. An id that does not exist or
    /// belongs to another user is treated as unassigned, mirroring the
    /// lenient input policy.
    Existing(i64),
    /// Create a new account with this name (0.0 initial balance) and attach
    /// the entry to it. A blank name is treated as unassigned.
    New(String),
}

/// User-supplied fields for a new entry, before normalization.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    /// Calendar date; defaults to today when absent
    pub date: Option<NaiveDate>,
    /// Income or expense; defaults to expense
    pub direction: Direction,
    /// Magnitude in the entry's own currency; sign is discarded
    pub amount: f64,
    /// Fee in the entry's own currency; sign is discarded
    pub fee: f64,
    /// Currency code; blank or absent defaults to the base currency
    pub currency: Option<String>,
    /// Conversion rate to base; absent defaults to 1.0
    pub rate_to_base: Option<f64>,
    /// Account attachment
    pub account: AccountRef,
    /// Free-form category; blank is stored as absent
    pub category: Option<String>,
    /// Comma-separated tags
    pub tags: String,
    /// Free-form note
    pub note: String,
}

/// Records a new entry for the user, computing and storing its `net_base`.
///
/// The stored amount and fee are the absolute values of the input; sign is
/// carried only by the direction. The currency code is trimmed and
/// uppercased. When the entry names a new account, account and entry are
/// created in one transaction.
pub async fn record_entry(
    db: &DatabaseConnection,
    user_id: i64,
    new_entry: NewEntry,
) -> Result<entry::Model> {
    let txn = db.begin().await?;

    let account_id = match &new_entry.account {
        AccountRef::New(name) if !name.trim().is_empty() => {
            let account = store::accounts::insert_account(&txn, user_id, name.trim(), 0.0).await?;
            Some(account.id)
        }
        AccountRef::New(_) | AccountRef::Unassigned => None,
        AccountRef::Existing(id) => store::accounts::get_account(&txn, user_id, *id)
            .await?
            .map(|account| account.id),
    };

    let date = new_entry.date.unwrap_or_else(|| Utc::now().date_naive());
    let amount = new_entry.amount.abs();
    let fee = new_entry.fee.abs();
    let rate_to_base = new_entry.rate_to_base.unwrap_or(1.0);
    let currency = new_entry
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map_or_else(|| BASE_CURRENCY.to_string(), str::to_uppercase);
    let category = new_entry
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToOwned::to_owned);

    let net_base = compute_net_base(new_entry.direction, amount, fee, rate_to_base);

    let record = EntryRecord {
        date,
        direction: new_entry.direction,
        amount,
        fee,
        currency,
        rate_to_base,
        account_id,
        category,
        tags: new_entry.tags,
        note: new_entry.note,
        net_base,
    };
    let model = store::entries::insert_entry(&txn, user_id, record).await?;
    txn.commit().await?;

    debug!(entry_id = model.id, user_id, net_base, "entry recorded");
    Ok(model)
}

/// Deletes an entry owned by the user.
///
/// Entries are immutable; deletion is the only correction mechanism.
pub async fn delete_entry(db: &DatabaseConnection, user_id: i64, entry_id: i64) -> Result<()> {
    store::entries::delete_entry(db, user_id, entry_id).await?;
    debug!(entry_id, user_id, "entry deleted");
    Ok(())
}

/// Checks that an account reference is resolvable before recording.
///
/// Optional strict variant of the lenient attach policy: callers that want
/// to reject rather than orphan a dangling [`AccountRef::Existing`] can call
/// this first.
pub async fn validate_account_ref(
    db: &DatabaseConnection,
    user_id: i64,
    account: &AccountRef,
) -> Result<()> {
    if let AccountRef::Existing(id) = account {
        store::accounts::get_account(db, user_id, *id)
            .await?
            .ok_or(Error::AccountNotFound { id: *id })?;
    }
    Ok(())
}
