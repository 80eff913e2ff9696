//! The aggregation engine - reporting views over the ledger store.
//!
//! Turns the store's aggregate query results into the fixed set of reporting
//! views, applying the gap-filling, rounding, and ordering policy the store
//! does not provide. Every function takes the reference date `today` as an
//! explicit parameter so the views are deterministic under test; rounding to
//! 2 decimals happens only at the reporting boundary, internal running
//! totals accumulate unrounded to avoid compounding error across the 30-day
//! cumulative series.

use crate::{errors::Result, store};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Number of points in the daily series.
const DAILY_SERIES_DAYS: i64 = 30;

/// Point-in-time profit/loss summaries, rounded for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct PointSummaries {
    /// Net value for today alone
    pub today: f64,
    /// Net value for the trailing 7 calendar days, today inclusive
    pub week: f64,
    /// Net value from the 1st of the current month through today
    pub month_to_date: f64,
}

/// Fixed-length daily profit/loss series with a running total.
///
/// Three parallel vectors of identical length, index-aligned, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct DailySeries {
    /// `MM-DD` labels, one per calendar day
    pub labels: Vec<String>,
    /// Net value per day; days with no activity are explicit 0.0 points
    pub values: Vec<f64>,
    /// Running cumulative total, seeded at 0.0 before the first day
    pub cumulative: Vec<f64>,
}

/// Variable-length monthly profit/loss series.
///
/// Unlike [`DailySeries`], months with no entries are absent rather than
/// zero - the asymmetry is deliberate and covered by tests.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySeries {
    /// `YYYY-MM` labels, ascending
    pub labels: Vec<String>,
    /// Net value per labeled month
    pub values: Vec<f64>,
}

/// One category's positive inflow total.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySlice {
    /// Category label, "Uncategorized" for entries without one
    pub label: String,
    /// Sum of positive net contributions only
    pub total: f64,
}

/// One account's derived balance view.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    /// Account id
    pub id: i64,
    /// Display name
    pub name: String,
    /// User-supplied starting balance
    pub initial_balance: f64,
    /// Net sum of entries referencing this account
    pub net_contribution: f64,
    /// `initial_balance + net_contribution`
    pub current_balance: f64,
}

/// Everything the dashboard view needs, in one struct.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Today / week / month-to-date scalars
    pub summaries: PointSummaries,
    /// 30-day daily series with running total
    pub daily: DailySeries,
    /// Roughly-six-month trend
    pub monthly: MonthlySeries,
    /// Positive-only category breakdown, sorted by label
    pub categories: Vec<CategorySlice>,
    /// Per-account balances, name ascending
    pub accounts: Vec<AccountSummary>,
}

/// Rounds a value to 2 decimal places for presentation.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Window start for the monthly trend: first of the month before the current
/// one, minus 150 days. Intentionally approximate - "about six months back,
/// inclusive" - matching the observed reporting behavior rather than exact
/// calendar arithmetic.
fn six_month_window_start(today: NaiveDate) -> NaiveDate {
    let current_month_start = month_start(today);
    let previous_month_end = current_month_start
        .pred_opt()
        .unwrap_or(current_month_start);
    month_start(previous_month_end) - Duration::days(150)
}

/// Computes the today / trailing-7-days / month-to-date scalars.
pub async fn point_summaries(
    db: &DatabaseConnection,
    user_id: i64,
    today: NaiveDate,
) -> Result<PointSummaries> {
    let week_start = today - Duration::days(6);
    let month_to_date_start = month_start(today);

    let today_pl = store::entries::sum_net_base_in_range(db, user_id, today, today).await?;
    let week_pl = store::entries::sum_net_base_in_range(db, user_id, week_start, today).await?;
    let month_pl =
        store::entries::sum_net_base_in_range(db, user_id, month_to_date_start, today).await?;

    Ok(PointSummaries {
        today: round2(today_pl),
        week: round2(week_pl),
        month_to_date: round2(month_pl),
    })
}

/// Builds the 30-day daily series ending today, oldest first.
///
/// Days with no entries are gap-filled with explicit 0.0 points so the
/// series always has exactly 30 index-aligned points. The cumulative total
/// accumulates unrounded day values; only the emitted numbers are rounded.
pub async fn thirty_day_series(
    db: &DatabaseConnection,
    user_id: i64,
    today: NaiveDate,
) -> Result<DailySeries> {
    let start = today - Duration::days(DAILY_SERIES_DAYS - 1);
    let by_date = store::entries::sum_net_base_by_date(db, user_id, start, today).await?;

    let capacity = usize::try_from(DAILY_SERIES_DAYS).unwrap_or_default();
    let mut labels = Vec::with_capacity(capacity);
    let mut values = Vec::with_capacity(capacity);
    let mut cumulative = Vec::with_capacity(capacity);

    let mut running = 0.0;
    for offset in 0..DAILY_SERIES_DAYS {
        let day = start + Duration::days(offset);
        let value = by_date.get(&day).copied().unwrap_or(0.0);
        labels.push(day.format("%m-%d").to_string());
        values.push(round2(value));
        running += value;
        cumulative.push(round2(running));
    }

    Ok(DailySeries {
        labels,
        values,
        cumulative,
    })
}

/// Builds the roughly-six-month trend. Months with no entries do not appear.
pub async fn six_month_trend(
    db: &DatabaseConnection,
    user_id: i64,
    today: NaiveDate,
) -> Result<MonthlySeries> {
    let since = six_month_window_start(today);
    let months = store::entries::sum_net_base_by_month(db, user_id, since).await?;

    let (labels, values) = months
        .into_iter()
        .map(|(label, value)| (label, round2(value)))
        .unzip();
    Ok(MonthlySeries { labels, values })
}

/// Builds the positive-only category breakdown, sorted by label for stable
/// presentation (the view itself is semantically unordered).
pub async fn category_breakdown(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<CategorySlice>> {
    let breakdown = store::entries::sum_positive_net_base_by_category(db, user_id).await?;

    let mut slices: Vec<CategorySlice> = breakdown
        .into_iter()
        .map(|(label, total)| CategorySlice {
            label,
            total: round2(total),
        })
        .collect();
    slices.sort_by(|a, b| a.label.cmp(&b.label));
    Ok(slices)
}

/// Builds the per-account balance view, name ascending. Accounts with no
/// entries appear with their initial balance unchanged.
pub async fn account_balances(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<AccountSummary>> {
    let accounts = store::accounts::list_accounts(db, user_id).await?;
    let net_by_account = store::entries::sum_net_base_by_account(db, user_id).await?;

    Ok(accounts
        .into_iter()
        .map(|account| {
            let net = net_by_account.get(&account.id).copied().unwrap_or(0.0);
            AccountSummary {
                id: account.id,
                name: account.name,
                initial_balance: round2(account.initial_balance),
                net_contribution: round2(net),
                current_balance: round2(account.initial_balance + net),
            }
        })
        .collect())
}

/// Computes every reporting view in one call, for the dashboard.
pub async fn dashboard(
    db: &DatabaseConnection,
    user_id: i64,
    today: NaiveDate,
) -> Result<Dashboard> {
    Ok(Dashboard {
        summaries: point_summaries(db, user_id, today).await?,
        daily: thirty_day_series(db, user_id, today).await?,
        monthly: six_month_trend(db, user_id, today).await?,
        categories: category_breakdown(db, user_id).await?,
        accounts: account_balances(db, user_id).await?,
    })
}

/// [`dashboard`] anchored at the current UTC date.
pub async fn dashboard_for_today(db: &DatabaseConnection, user_id: i64) -> Result<Dashboard> {
    dashboard(db, user_id, Utc::now().date_naive()).await
}
