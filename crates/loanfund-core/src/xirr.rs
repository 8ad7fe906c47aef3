//! Newton-Raphson XIRR over irregularly dated cash flows.
//!
//! The first flow's date is the time origin; exponents are annualized on a
//! 365-day year. A failed search is `None`, never an error: callers treat it
//! as "IRR could not be determined".

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::daycount::{days_between, XIRR_DAYS_IN_YEAR};
use crate::types::{CashFlow, Rate};

const MAX_ITERATIONS: u32 = 100;
const TOLERANCE: Decimal = dec!(0.000001);
const DEFAULT_GUESS: Decimal = dec!(0.1);

/// Divergence guards, so `(1+r)^t` stays representable.
const MIN_RATE: Decimal = dec!(-0.99);
const MAX_RATE: Decimal = dec!(100);

/// Solve for the rate where the present value of `cash_flows` is zero,
/// starting from a guess of 0.1. The result is a decimal fraction
/// (0.268 = 26.8% p.a.).
pub fn xirr(cash_flows: &[CashFlow]) -> Option<Rate> {
    xirr_with_guess(cash_flows, DEFAULT_GUESS)
}

/// As [`xirr`], with an explicit starting guess.
///
/// Sign-mixing is not validated: a series without at least one outflow and
/// one inflow may diverge or converge to a degenerate rate.
pub fn xirr_with_guess(cash_flows: &[CashFlow], guess: Rate) -> Option<Rate> {
    if cash_flows.is_empty() {
        return None;
    }

    let mut x0 = guess;

    for _ in 0..MAX_ITERATIONS {
        let (f_value, f_prime_value) = present_value_and_derivative(x0, cash_flows)?;

        if f_prime_value.abs() < TOLERANCE {
            // Stationary point, the iteration cannot make progress.
            return None;
        }

        let x1 = x0 - f_value / f_prime_value;
        if x1 <= MIN_RATE || x1 >= MAX_RATE {
            // Diverging; pin to the bound and keep iterating rather than
            // letting the step-size test mistake the clamp for convergence.
            x0 = x1.clamp(MIN_RATE, MAX_RATE);
            continue;
        }

        if (x1 - x0).abs() < TOLERANCE {
            return Some(x1);
        }

        x0 = x1;
    }

    None
}

/// `f(r) = Σ amount_i / (1+r)^(days_i/365)` and its derivative, both in one
/// pass. `None` when the discount base `1+r` is non-positive.
fn present_value_and_derivative(rate: Rate, cash_flows: &[CashFlow]) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }

    let origin = cash_flows[0].date;
    let mut f = Decimal::ZERO;
    let mut f_prime = Decimal::ZERO;

    for cf in cash_flows {
        let years = Decimal::from(days_between(origin, cf.date)) / XIRR_DAYS_IN_YEAR;
        let discount = one_plus_r.checked_powd(-years)?;
        let discount_prime = one_plus_r.checked_powd(-years - Decimal::ONE)?;
        f += cf.amount * discount;
        f_prime -= years * cf.amount * discount_prime;
    }

    Some((f, f_prime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn flow(d: &str, amount: Decimal) -> CashFlow {
        CashFlow {
            date: date(d),
            amount,
        }
    }

    #[test]
    fn recovers_rate_from_one_year_round_trip() {
        // -1000 today, +1100 in 365 days: exactly 10%
        let flows = vec![
            flow("2026-01-01", dec!(-1000)),
            flow("2027-01-01", dec!(1100)),
        ];
        let rate = xirr(&flows).unwrap();
        assert!((rate - dec!(0.1)).abs() < dec!(0.0001), "got {rate}");
    }

    #[test]
    fn half_year_doubles_the_annualized_rate() {
        // +5% over ~half a year annualizes above 10%
        let flows = vec![
            flow("2026-01-01", dec!(-1000)),
            flow("2026-07-02", dec!(1050)),
        ];
        let rate = xirr(&flows).unwrap();
        assert!(rate > dec!(0.10) && rate < dec!(0.11), "got {rate}");
    }

    #[test]
    fn empty_series_has_no_result() {
        assert_eq!(xirr(&[]), None);
    }

    #[test]
    fn all_positive_series_has_no_root() {
        let flows = vec![
            flow("2026-01-01", dec!(1000)),
            flow("2026-06-01", dec!(1000)),
        ];
        // f(r) > 0 for every admissible rate; the search must give up
        assert_eq!(xirr(&flows), None);
    }

    #[test]
    fn loss_making_series_solves_negative() {
        let flows = vec![
            flow("2026-01-01", dec!(-1000)),
            flow("2027-01-01", dec!(900)),
        ];
        let rate = xirr(&flows).unwrap();
        assert!((rate - dec!(-0.1)).abs() < dec!(0.0001), "got {rate}");
    }

    #[test]
    fn guess_does_not_change_the_root() {
        let flows = vec![
            flow("2026-01-01", dec!(-1000)),
            flow("2026-04-01", dec!(350)),
            flow("2026-07-01", dec!(350)),
            flow("2026-10-01", dec!(350)),
        ];
        let a = xirr_with_guess(&flows, dec!(0.05)).unwrap();
        let b = xirr_with_guess(&flows, dec!(0.3)).unwrap();
        assert!((a - b).abs() < dec!(0.0001));
    }
}
