//! CSV export of raw ledger entries.
//!
//! The export collaborator consumes entries ordered by date ascending with
//! id as tie-break, and the numeric precision contract is fixed: amount and
//! fee to 2 decimals, rate to 4 decimals, net to 2 decimals.

use crate::{
    errors::{Error, Result},
    store,
    store::entries::{EntryFilter, EntryOrder},
};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing::debug;

const HEADER: [&str; 11] = [
    "date",
    "direction",
    "amount",
    "fee",
    "currency",
    "rate_to_base",
    "account",
    "category",
    "tags",
    "note",
    "net_base",
];

/// Serializes the user's entries matching the filter to a CSV string.
///
/// The account column carries the account's display name, empty for
/// unassigned entries; category, tags, and note are emitted as empty strings
/// when absent.
pub async fn export_csv(
    db: &DatabaseConnection,
    user_id: i64,
    filter: &EntryFilter,
) -> Result<String> {
    let account_names: HashMap<i64, String> = store::accounts::list_accounts(db, user_id)
        .await?
        .into_iter()
        .map(|account| (account.id, account.name))
        .collect();

    let entries = store::entries::list_entries(db, user_id, filter, EntryOrder::DateAscending).await?;
    let row_count = entries.len();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for entry in entries {
        let account = entry
            .account_id
            .and_then(|id| account_names.get(&id).cloned())
            .unwrap_or_default();
        writer.write_record(&[
            entry.date.format("%Y-%m-%d").to_string(),
            entry.direction.as_str().to_string(),
            format!("{:.2}", entry.amount),
            format!("{:.2}", entry.fee),
            entry.currency,
            format!("{:.4}", entry.rate_to_base),
            account,
            entry.category.unwrap_or_default(),
            entry.tags,
            entry.note,
            format!("{:.2}", entry.net_base),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(e.into_error().into()))?;
    let output = String::from_utf8(bytes).map_err(|e| Error::Config {
        message: format!("export produced invalid UTF-8: {e}"),
    })?;

    debug!(user_id, row_count, "entries exported");
    Ok(output)
}
