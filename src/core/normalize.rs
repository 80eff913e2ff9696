//! Net-base normalization - the single place where currency conversion and
//! sign policy are decided.
//!
//! Every entry stores a derived `net_base`: its signed value in the base
//! currency (a fixed, CNY-equivalent unit system-wide). The function here is
//! pure and never fails; malformed numeric input is absorbed by lenient
//! defaults rather than rejected.

use crate::entities::Direction;

/// Currency code of the fixed system-wide base currency.
pub const BASE_CURRENCY: &str = "CNY";

/// Converts a raw entry into its signed base-currency net value.
///
/// `amount` and `fee` are absolute magnitudes in the entry's own currency;
/// callers take the absolute value of user input before calling. `rate_to_base`
/// is how many base units one unit of the entry currency is worth; a rate of
/// exactly 0.0 is treated as missing and substituted with 1.0. Explicit
/// negative rates pass through unmodified - a known sharp edge inherited from
/// the lenient input policy, deliberately not "fixed" here.
///
/// The fee is always a cost: it reduces the net credited on income entries
/// and deepens the net cost on expense entries.
#[must_use]
pub fn compute_net_base(direction: Direction, amount: f64, fee: f64, rate_to_base: f64) -> f64 {
    let rate = if rate_to_base == 0.0 { 1.0 } else { rate_to_base };
    let amount_base = amount * rate;
    let fee_base = fee * rate;
    match direction {
        Direction::Income => amount_base - fee_base,
        Direction::Expense => -amount_base - fee_base,
    }
}
