//! Entry persistence and the aggregate query contract.
//!
//! Entries are append-only and delete-only: once recorded they are never
//! edited, so the stored `net_base` stays consistent with the amount, fee,
//! and rate it was derived from. The aggregate functions here are the entire
//! surface the aggregation engine is built on; their shapes are a contract
//! any backend must satisfy identically:
//!
//! - range sums are inclusive on both bounds and return 0.0 for no rows,
//! - per-date sums contain only dates that have at least one entry (gap
//!   filling is the engine's job, not the store's),
//! - per-month sums use `YYYY-MM` labels, ascending, months with no entries
//!   absent,
//! - the category breakdown sums only positive `net_base` contributions.
//!
//! Month bucketing is done by folding the per-date sums in Rust rather than
//! with a backend-specific SQL date-format expression, so every backend
//! produces identical labels.

use crate::{
    entities::{Direction, Entry, entry},
    errors::{Error, Result},
};
use sea_orm::{
    Condition, QueryOrder, QuerySelect, Set,
    prelude::*,
    sea_query::{Expr, Func},
};
use std::collections::{BTreeMap, HashMap};

/// Reported category label for entries recorded without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Column values for a new entry, already normalized by the caller.
///
/// `net_base` must equal the normalization function applied to the other
/// fields; [`crate::core::entry::record_entry`] is the only production path
/// that builds one.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    /// Calendar date of the event
    pub date: Date,
    /// Income or expense
    pub direction: Direction,
    /// Non-negative magnitude in `currency`
    pub amount: f64,
    /// Non-negative fee in `currency`
    pub fee: f64,
    /// ISO-like currency code
    pub currency: String,
    /// 1 unit of `currency` in base currency units
    pub rate_to_base: f64,
    /// Optional owning account
    pub account_id: Option<i64>,
    /// Optional free-form category
    pub category: Option<String>,
    /// Comma-separated tags
    pub tags: String,
    /// Free-form note
    pub note: String,
    /// Derived signed base-currency value
    pub net_base: f64,
}

/// Filter for listing and exporting entries. All fields optional; an empty
/// filter matches everything the user owns.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Inclusive lower date bound
    pub start_date: Option<Date>,
    /// Inclusive upper date bound
    pub end_date: Option<Date>,
    /// Case-insensitive substring match over category, tags, and note
    pub keyword: Option<String>,
    /// Restrict to one flow direction
    pub direction: Option<Direction>,
}

/// Ordering for entry listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrder {
    /// Date descending, id descending - for browsing
    NewestFirst,
    /// Date ascending, id ascending as tie-break - the export contract
    DateAscending,
}

/// Inserts a fully-prepared entry row for the given user.
pub async fn insert_entry<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    record: EntryRecord,
) -> Result<entry::Model> {
    let model = entry::ActiveModel {
        user_id: Set(user_id),
        date: Set(record.date),
        direction: Set(record.direction),
        amount: Set(record.amount),
        fee: Set(record.fee),
        currency: Set(record.currency),
        rate_to_base: Set(record.rate_to_base),
        account_id: Set(record.account_id),
        category: Set(record.category),
        tags: Set(record.tags),
        note: Set(record.note),
        net_base: Set(record.net_base),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Finds an entry by id, scoped to its owner. Returns None for entries that
/// do not exist or belong to another user.
pub async fn get_entry(
    db: &DatabaseConnection,
    user_id: i64,
    entry_id: i64,
) -> Result<Option<entry::Model>> {
    Entry::find_by_id(entry_id)
        .filter(entry::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes an entry owned by the user. Hard delete; entries have no edit
/// path, so removal is the only correction mechanism.
pub async fn delete_entry(db: &DatabaseConnection, user_id: i64, entry_id: i64) -> Result<()> {
    let entry = get_entry(db, user_id, entry_id)
        .await?
        .ok_or(Error::EntryNotFound { id: entry_id })?;
    entry.delete(db).await?;
    Ok(())
}

/// Lists entries matching the filter, in the requested order.
pub async fn list_entries(
    db: &DatabaseConnection,
    user_id: i64,
    filter: &EntryFilter,
    order: EntryOrder,
) -> Result<Vec<entry::Model>> {
    let mut query = Entry::find().filter(entry::Column::UserId.eq(user_id));

    if let Some(start) = filter.start_date {
        query = query.filter(entry::Column::Date.gte(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(entry::Column::Date.lte(end));
    }
    if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(entry::Column::Category.contains(keyword))
                .add(entry::Column::Tags.contains(keyword))
                .add(entry::Column::Note.contains(keyword)),
        );
    }
    if let Some(direction) = filter.direction {
        query = query.filter(entry::Column::Direction.eq(direction));
    }

    let query = match order {
        EntryOrder::NewestFirst => query
            .order_by_desc(entry::Column::Date)
            .order_by_desc(entry::Column::Id),
        EntryOrder::DateAscending => query
            .order_by_asc(entry::Column::Date)
            .order_by_asc(entry::Column::Id),
    };

    query.all(db).await.map_err(Into::into)
}

/// Sums `net_base` over `[start, end]` inclusive. 0.0 when no rows match.
pub async fn sum_net_base_in_range(
    db: &DatabaseConnection,
    user_id: i64,
    start: Date,
    end: Date,
) -> Result<f64> {
    let total: Option<Option<f64>> = Entry::find()
        .select_only()
        .column_as(entry::Column::NetBase.sum(), "total")
        .filter(entry::Column::UserId.eq(user_id))
        .filter(entry::Column::Date.gte(start))
        .filter(entry::Column::Date.lte(end))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0.0))
}

/// Sums `net_base` per date over `[start, end]` inclusive.
///
/// Only dates with at least one entry appear in the result; dates with no
/// activity are absent, not zero.
pub async fn sum_net_base_by_date(
    db: &DatabaseConnection,
    user_id: i64,
    start: Date,
    end: Date,
) -> Result<HashMap<Date, f64>> {
    let rows: Vec<(Date, f64)> = Entry::find()
        .select_only()
        .column(entry::Column::Date)
        .column_as(entry::Column::NetBase.sum(), "total")
        .filter(entry::Column::UserId.eq(user_id))
        .filter(entry::Column::Date.gte(start))
        .filter(entry::Column::Date.lte(end))
        .group_by(entry::Column::Date)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Sums `net_base` per month from `since` (inclusive) onward.
///
/// Labels are `YYYY-MM`, ascending; months with no entries do not appear.
/// Bucketing folds the per-date SQL sums in Rust, so the label format does
/// not depend on any backend date-formatting dialect.
pub async fn sum_net_base_by_month(
    db: &DatabaseConnection,
    user_id: i64,
    since: Date,
) -> Result<Vec<(String, f64)>> {
    let rows: Vec<(Date, f64)> = Entry::find()
        .select_only()
        .column(entry::Column::Date)
        .column_as(entry::Column::NetBase.sum(), "total")
        .filter(entry::Column::UserId.eq(user_id))
        .filter(entry::Column::Date.gte(since))
        .group_by(entry::Column::Date)
        .into_tuple()
        .all(db)
        .await?;

    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for (date, total) in rows {
        *months.entry(date.format("%Y-%m").to_string()).or_insert(0.0) += total;
    }
    Ok(months.into_iter().collect())
}

/// Sums only the positive `net_base` contributions per category, showing
/// which categories produced inflow rather than net category profit/loss.
/// Negative rows contribute 0 to their category's sum. Entries without a
/// category are reported under [`UNCATEGORIZED`].
pub async fn sum_positive_net_base_by_category(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<HashMap<String, f64>> {
    let positive_only = Expr::case(
        Expr::col(entry::Column::NetBase).gt(0.0),
        Expr::col(entry::Column::NetBase),
    )
    .finally(Expr::val(0.0));

    let rows: Vec<(Option<String>, Option<f64>)> = Entry::find()
        .select_only()
        .column(entry::Column::Category)
        .column_as(Expr::expr(Func::sum(positive_only)), "total")
        .filter(entry::Column::UserId.eq(user_id))
        .group_by(entry::Column::Category)
        .into_tuple()
        .all(db)
        .await?;

    let mut breakdown = HashMap::new();
    for (category, total) in rows {
        let label = category.unwrap_or_else(|| UNCATEGORIZED.to_string());
        *breakdown.entry(label).or_insert(0.0) += total.unwrap_or(0.0);
    }
    Ok(breakdown)
}

/// Sums `net_base` per assigned account. Unassigned entries are excluded.
pub async fn sum_net_base_by_account(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<HashMap<i64, f64>> {
    let rows: Vec<(Option<i64>, Option<f64>)> = Entry::find()
        .select_only()
        .column(entry::Column::AccountId)
        .column_as(entry::Column::NetBase.sum(), "total")
        .filter(entry::Column::UserId.eq(user_id))
        .filter(entry::Column::AccountId.is_not_null())
        .group_by(entry::Column::AccountId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(account_id, total)| Some((account_id?, total.unwrap_or(0.0))))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{date, record_test_entry, setup_test_db, setup_with_user};

    #[tokio::test]
    async fn test_sum_in_range_inclusive_bounds() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        record_test_entry(&db, user.id, date(2024, 5, 1), Direction::Income, 10.0).await?;
        record_test_entry(&db, user.id, date(2024, 5, 10), Direction::Income, 20.0).await?;
        record_test_entry(&db, user.id, date(2024, 5, 11), Direction::Income, 40.0).await?;

        // Both bounds inclusive
        let total = sum_net_base_in_range(&db, user.id, date(2024, 5, 1), date(2024, 5, 10)).await?;
        assert_eq!(total, 30.0);

        // Single-day range
        let total = sum_net_base_in_range(&db, user.id, date(2024, 5, 10), date(2024, 5, 10)).await?;
        assert_eq!(total, 20.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_in_range_empty_is_zero() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let total = sum_net_base_in_range(&db, user.id, date(2024, 1, 1), date(2024, 1, 31)).await?;
        assert_eq!(total, 0.0);

        // Inverted range yields zero, not an error
        let total = sum_net_base_in_range(&db, user.id, date(2024, 2, 1), date(2024, 1, 1)).await?;
        assert_eq!(total, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_in_range_isolates_users() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = crate::store::users::insert_user(&db, "alice@example.com").await?;
        let bob = crate::store::users::insert_user(&db, "bob@example.com").await?;

        record_test_entry(&db, alice.id, date(2024, 5, 1), Direction::Income, 100.0).await?;
        record_test_entry(&db, bob.id, date(2024, 5, 1), Direction::Income, 7.0).await?;

        let total = sum_net_base_in_range(&db, alice.id, date(2024, 5, 1), date(2024, 5, 1)).await?;
        assert_eq!(total, 100.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_by_date_skips_empty_days() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        record_test_entry(&db, user.id, date(2024, 5, 1), Direction::Income, 10.0).await?;
        record_test_entry(&db, user.id, date(2024, 5, 1), Direction::Expense, 4.0).await?;
        record_test_entry(&db, user.id, date(2024, 5, 3), Direction::Income, 5.0).await?;

        let by_date = sum_net_base_by_date(&db, user.id, date(2024, 5, 1), date(2024, 5, 31)).await?;

        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[&date(2024, 5, 1)], 6.0);
        assert_eq!(by_date[&date(2024, 5, 3)], 5.0);
        // A day with no entries is absent, not zero
        assert!(!by_date.contains_key(&date(2024, 5, 2)));

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_by_month_labels_and_order() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        record_test_entry(&db, user.id, date(2024, 3, 20), Direction::Expense, 5.0).await?;
        record_test_entry(&db, user.id, date(2024, 5, 2), Direction::Income, 10.0).await?;
        record_test_entry(&db, user.id, date(2024, 5, 28), Direction::Income, 1.0).await?;
        // Before the window, must not appear
        record_test_entry(&db, user.id, date(2023, 12, 31), Direction::Income, 99.0).await?;

        let months = sum_net_base_by_month(&db, user.id, date(2024, 1, 1)).await?;

        // April has no entries and is absent; labels ascend
        assert_eq!(
            months,
            vec![("2024-03".to_string(), -5.0), ("2024-05".to_string(), 11.0)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sum_by_month_since_is_inclusive() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        record_test_entry(&db, user.id, date(2024, 1, 1), Direction::Income, 10.0).await?;

        let months = sum_net_base_by_month(&db, user.id, date(2024, 1, 1)).await?;
        assert_eq!(months, vec![("2024-01".to_string(), 10.0)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_category_breakdown_positive_only() -> Result<()> {
        use crate::core::entry::{AccountRef, NewEntry, record_entry};

        let (db, user) = setup_with_user().await?;

        for (direction, amount) in [
            (Direction::Income, 100.0),
            (Direction::Expense, 40.0),
            (Direction::Income, 25.0),
        ] {
            record_entry(
                &db,
                user.id,
                NewEntry {
                    date: Some(date(2024, 5, 1)),
                    direction,
                    amount,
                    category: Some("X".to_string()),
                    account: AccountRef::Unassigned,
                    ..Default::default()
                },
            )
            .await?;
        }

        let breakdown = sum_positive_net_base_by_category(&db, user.id).await?;
        // Expenses contribute 0, not their negative value: 125, never 85
        assert_eq!(breakdown["X"], 125.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_category_breakdown_uncategorized() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        // record_test_entry leaves category unset
        record_test_entry(&db, user.id, date(2024, 5, 1), Direction::Income, 30.0).await?;

        let breakdown = sum_positive_net_base_by_category(&db, user.id).await?;
        assert_eq!(breakdown[UNCATEGORIZED], 30.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_entries_keyword_and_direction() -> Result<()> {
        use crate::core::entry::{AccountRef, NewEntry, record_entry};

        let (db, user) = setup_with_user().await?;

        record_entry(
            &db,
            user.id,
            NewEntry {
                date: Some(date(2024, 5, 1)),
                direction: Direction::Expense,
                amount: 12.0,
                category: Some("groceries".to_string()),
                note: "weekly shop".to_string(),
                account: AccountRef::Unassigned,
                ..Default::default()
            },
        )
        .await?;
        record_entry(
            &db,
            user.id,
            NewEntry {
                date: Some(date(2024, 5, 2)),
                direction: Direction::Income,
                amount: 100.0,
                category: Some("salary".to_string()),
                account: AccountRef::Unassigned,
                ..Default::default()
            },
        )
        .await?;

        let filter = EntryFilter {
            keyword: Some("shop".to_string()),
            ..Default::default()
        };
        let matched = list_entries(&db, user.id, &filter, EntryOrder::NewestFirst).await?;
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].category.as_deref(), Some("groceries"));

        let filter = EntryFilter {
            direction: Some(Direction::Income),
            ..Default::default()
        };
        let matched = list_entries(&db, user.id, &filter, EntryOrder::NewestFirst).await?;
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].direction, Direction::Income);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_entries_ordering() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let a = record_test_entry(&db, user.id, date(2024, 5, 2), Direction::Income, 1.0).await?;
        let b = record_test_entry(&db, user.id, date(2024, 5, 1), Direction::Income, 2.0).await?;
        let c = record_test_entry(&db, user.id, date(2024, 5, 1), Direction::Income, 3.0).await?;

        let newest = list_entries(&db, user.id, &EntryFilter::default(), EntryOrder::NewestFirst).await?;
        let ids: Vec<i64> = newest.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a.id, c.id, b.id]);

        let export = list_entries(&db, user.id, &EntryFilter::default(), EntryOrder::DateAscending).await?;
        let ids: Vec<i64> = export.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b.id, c.id, a.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_entry_ownership_checked() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = crate::store::users::insert_user(&db, "alice@example.com").await?;
        let bob = crate::store::users::insert_user(&db, "bob@example.com").await?;

        let entry = record_test_entry(&db, alice.id, date(2024, 5, 1), Direction::Income, 10.0).await?;

        // Bob cannot delete Alice's entry
        let result = delete_entry(&db, bob.id, entry.id).await;
        assert!(matches!(result, Err(Error::EntryNotFound { .. })));

        delete_entry(&db, alice.id, entry.id).await?;
        assert!(get_entry(&db, alice.id, entry.id).await?.is_none());

        Ok(())
    }
}
