//! Carrying cost of undeployed capital.
//!
//! Raised capital that is not yet lent out still costs the fund its
//! cost-of-capital rate. This engine replays capital-availability events in
//! date order — raises add, loan deployments subtract — and accrues a daily
//! cost on every positive-balance window from fund inception through the
//! as-of date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::daycount::{days_between, DAYS_IN_YEAR};
use crate::types::{validate_fund, Fund, Loan, Money};
use crate::LoanFundResult;

struct CapitalEvent {
    date: NaiveDate,
    change: Money,
}

/// Total accrued cost on undeployed capital from fund inception through
/// `as_of`. Events after `as_of` are ignored; windows with a zero or negative
/// running balance accrue nothing.
///
/// Reconciliation of `total_raised` against explicit raises: each recorded
/// raise is an event at its own date, and any positive remainder
/// `total_raised − Σ raises` is an implicit raise at inception. Capital
/// granted implicitly at inception counts from the day after inception, so
/// the first accrual window from inception is one day shorter in that case;
/// explicitly dated raises accrue from their own dates unadjusted.
pub fn undeployed_capital_cost(
    fund: &Fund,
    loans: &[Loan],
    as_of: NaiveDate,
) -> LoanFundResult<Money> {
    validate_fund(fund)?;

    let inception = fund.created_at;
    let mut events: Vec<CapitalEvent> = Vec::with_capacity(fund.capital_raises.len() + loans.len());
    let mut implicit_inception_raise = false;

    if fund.capital_raises.is_empty() {
        events.push(CapitalEvent {
            date: inception,
            change: fund.total_raised,
        });
        implicit_inception_raise = true;
    } else {
        let mut explicit = Decimal::ZERO;
        for raise in &fund.capital_raises {
            events.push(CapitalEvent {
                date: raise.date,
                change: raise.amount,
            });
            explicit += raise.amount;
        }
        let remainder = fund.total_raised - explicit;
        if remainder > Decimal::ZERO {
            events.push(CapitalEvent {
                date: inception,
                change: remainder,
            });
            implicit_inception_raise = true;
        }
    }

    for loan in loans.iter().filter(|l| l.fund_id == fund.id) {
        events.push(CapitalEvent {
            date: loan.start_date,
            change: -loan.principal,
        });
    }

    events.sort_by_key(|e| e.date);

    let daily_rate = fund.cost_of_capital_rate / dec!(100) / DAYS_IN_YEAR;
    let mut running_available = Decimal::ZERO;
    let mut last_date = inception;
    let mut accumulated = Decimal::ZERO;

    for event in &events {
        if event.date > as_of {
            break;
        }

        let mut period_days = days_between(last_date, event.date).max(0);
        if implicit_inception_raise && last_date == inception && period_days > 0 {
            period_days -= 1;
        }

        if period_days > 0 && running_available > Decimal::ZERO {
            accumulated += running_available * daily_rate * Decimal::from(period_days);
        }

        running_available += event.change;
        last_date = event.date;
    }

    // Final window up to the as-of date, never inception-adjusted.
    let final_days = days_between(last_date, as_of).max(0);
    if final_days > 0 && running_available > Decimal::ZERO {
        accumulated += running_available * daily_rate * Decimal::from(final_days);
    }

    Ok(accumulated)
}
