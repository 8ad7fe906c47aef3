use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::Days;

/// Accrual convention: 360-day year.
pub const DAYS_IN_YEAR: Decimal = dec!(360);

/// Annualization convention for XIRR: 365-day year.
pub const XIRR_DAYS_IN_YEAR: Decimal = dec!(365);

/// Whole days from `from` to `to`. Negative when `to` precedes `from`.
///
/// `NaiveDate` has no time-of-day, so the difference is exact — no
/// daylight-saving or timezone drift can leak into day counts.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> Days {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn counts_whole_days() {
        assert_eq!(days_between(date("2026-01-12"), date("2026-01-16")), 4);
        assert_eq!(days_between(date("2026-01-16"), date("2026-01-12")), -4);
        assert_eq!(days_between(date("2026-01-19"), date("2026-01-19")), 0);
    }

    #[test]
    fn spans_month_and_year_boundaries() {
        assert_eq!(days_between(date("2025-12-31"), date("2026-01-01")), 1);
        assert_eq!(days_between(date("2026-01-01"), date("2027-01-01")), 365);
        // 2028 is a leap year
        assert_eq!(days_between(date("2028-01-01"), date("2029-01-01")), 366);
    }
}
