//! Amortization schedule generation.
//!
//! Two conventions: BULLET (single repayment of principal + simple interest
//! at maturity) and MONTHLY (reducing-balance EMI on flat 30-day periods).

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanFundError;
use crate::types::{Days, Installment, InstallmentStatus, Money, Rate, RepaymentType};
use crate::LoanFundResult;

/// Installment periods are flat 30-day windows, not calendar months.
const DAYS_PER_PERIOD: i64 = 30;
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Generate a repayment schedule.
///
/// MONTHLY schedules are equated installments (EMI) on a reducing balance:
/// per period, interest accrues on the outstanding balance at
/// `annual_rate / 12`, and the principal component is the EMI remainder. The
/// final installment is corrected so the principal components sum to the
/// original principal exactly, absorbing any drift.
pub fn generate_schedule(
    principal: Money,
    annual_rate_pct: Rate,
    start_date: NaiveDate,
    duration_days: Days,
    repayment_type: RepaymentType,
) -> LoanFundResult<Vec<Installment>> {
    if principal <= Decimal::ZERO {
        return Err(LoanFundError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if duration_days <= 0 {
        return Err(LoanFundError::InvalidInput {
            field: "durationDays".into(),
            reason: "Duration must be at least one day".into(),
        });
    }

    match repayment_type {
        RepaymentType::Bullet => Ok(bullet_schedule(
            principal,
            annual_rate_pct,
            start_date,
            duration_days,
        )),
        RepaymentType::Monthly => Ok(emi_schedule(
            principal,
            annual_rate_pct,
            start_date,
            duration_days,
        )),
    }
}

fn bullet_schedule(
    principal: Money,
    annual_rate_pct: Rate,
    start_date: NaiveDate,
    duration_days: Days,
) -> Vec<Installment> {
    let interest = crate::interest::simple_interest(principal, annual_rate_pct, duration_days);
    vec![Installment {
        due_date: start_date + Duration::days(duration_days),
        amount: principal + interest,
        principal_component: principal,
        interest_component: interest,
        status: InstallmentStatus::Pending,
    }]
}

fn emi_schedule(
    principal: Money,
    annual_rate_pct: Rate,
    start_date: NaiveDate,
    duration_days: Days,
) -> Vec<Installment> {
    let months = (duration_days / DAYS_PER_PERIOD).max(1);
    let monthly_rate = annual_rate_pct / dec!(100) / MONTHS_PER_YEAR;
    let n = Decimal::from(months);

    // EMI = P·r·(1+r)^n / ((1+r)^n − 1); flat P/n when the rate is zero.
    let emi = if monthly_rate.is_zero() {
        principal / n
    } else {
        let factor = (Decimal::ONE + monthly_rate).powd(n);
        principal * monthly_rate * factor / (factor - Decimal::ONE)
    };

    let mut schedule = Vec::with_capacity(months as usize);
    let mut outstanding = principal;

    for i in 1..=months {
        let due_date = start_date + Duration::days(i * DAYS_PER_PERIOD);
        let interest_component = outstanding * monthly_rate;

        let principal_component = if i == months {
            // Final installment repays the outstanding balance exactly.
            outstanding
        } else {
            emi - interest_component
        };
        let amount = principal_component + interest_component;

        outstanding -= principal_component;

        schedule.push(Installment {
            due_date,
            amount,
            principal_component,
            interest_component,
            status: InstallmentStatus::Pending,
        });
    }

    schedule
}
