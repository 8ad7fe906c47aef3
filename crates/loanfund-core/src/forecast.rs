//! Forward cash-flow projection.
//!
//! Collects expected repayment events from open loans over a forward
//! horizon, groups them per calendar date, and walks the dates accumulating
//! the fund's available capital.

use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanFundError;
use crate::interest::simple_interest;
use crate::types::{
    validate_fund, validate_loan, Fund, InstallmentStatus, Loan, LoanStatus, Money,
};
use crate::LoanFundResult;

/// One expected repayment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowEvent {
    pub date: NaiveDate,
    pub amount: Money,
    pub loan_id: String,
    pub borrower_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,
    pub description: String,
}

/// Available capital after all repayments expected on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowProjection {
    pub date: NaiveDate,
    pub expected_repayments: Money,
    pub cumulative_available: Money,
    pub events: Vec<CashFlowEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    /// Repayments due within 30 days of today, inclusive and cumulative.
    pub next_30_days: Money,
    /// Repayments due within 90 days of today, inclusive and cumulative.
    pub next_90_days: Money,
    pub peak_available: Money,
    pub lowest_available: Money,
    pub peak_date: NaiveDate,
    pub lowest_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowForecast {
    pub projections: Vec<CashFlowProjection>,
    pub summary: CashFlowSummary,
}

/// Project expected repayments for `fund` over the next `horizon_months`
/// calendar months from `today`.
///
/// Defaulted and closed loans contribute nothing. Loans with stored
/// installments contribute their unpaid installments due in the window; a
/// loan without installments contributes a single bullet maturity event.
pub fn compute_cash_flow_forecast(
    fund: &Fund,
    loans: &[Loan],
    horizon_months: u32,
    today: NaiveDate,
) -> LoanFundResult<CashFlowForecast> {
    validate_fund(fund)?;
    for loan in loans {
        validate_loan(loan)?;
    }

    let horizon_end = today
        .checked_add_months(Months::new(horizon_months))
        .ok_or_else(|| LoanFundError::DateError("Forecast horizon overflows the calendar".into()))?;

    let fund_loans: Vec<&Loan> = loans.iter().filter(|l| l.fund_id == fund.id).collect();
    let events = repayment_events(&fund_loans, today, horizon_end);

    let deployed: Money = fund_loans
        .iter()
        .filter(|l| matches!(l.status, LoanStatus::Active | LoanStatus::Defaulted))
        .map(|l| l.principal)
        .sum();
    let initial_available = fund.total_raised - deployed;

    let mut by_date: BTreeMap<NaiveDate, Vec<CashFlowEvent>> = BTreeMap::new();
    for event in events {
        by_date.entry(event.date).or_default().push(event);
    }

    let mut projections = Vec::with_capacity(by_date.len() + 1);
    projections.push(CashFlowProjection {
        date: today,
        expected_repayments: Decimal::ZERO,
        cumulative_available: initial_available,
        events: Vec::new(),
    });

    let mut cumulative_available = initial_available;
    for (date, day_events) in by_date {
        let repayments: Money = day_events.iter().map(|e| e.amount).sum();
        cumulative_available += repayments;
        projections.push(CashFlowProjection {
            date,
            expected_repayments: repayments,
            cumulative_available,
            events: day_events,
        });
    }

    let summary = summarize(&projections, initial_available, today);

    Ok(CashFlowForecast {
        projections,
        summary,
    })
}

fn repayment_events(
    fund_loans: &[&Loan],
    today: NaiveDate,
    horizon_end: NaiveDate,
) -> Vec<CashFlowEvent> {
    let mut events = Vec::new();

    for loan in fund_loans {
        if matches!(loan.status, LoanStatus::Defaulted | LoanStatus::Closed) {
            continue;
        }

        if !loan.installments.is_empty() {
            let total = loan.installments.len() as u32;
            for (idx, inst) in loan.installments.iter().enumerate() {
                if inst.status == InstallmentStatus::Paid {
                    continue;
                }
                if inst.due_date < today || inst.due_date > horizon_end {
                    continue;
                }
                let number = idx as u32 + 1;
                events.push(CashFlowEvent {
                    date: inst.due_date,
                    amount: inst.amount,
                    loan_id: loan.id.clone(),
                    borrower_name: loan.borrower_name.clone(),
                    installment_number: Some(number),
                    total_installments: Some(total),
                    description: format!(
                        "{} - Installment {}/{}",
                        loan.borrower_name, number, total
                    ),
                });
            }
        } else {
            let maturity = loan.start_date + Duration::days(loan.duration_days);
            if maturity < today || maturity > horizon_end {
                continue;
            }
            let amount = loan.principal
                + simple_interest(loan.principal, loan.interest_rate, loan.duration_days);
            events.push(CashFlowEvent {
                date: maturity,
                amount,
                loan_id: loan.id.clone(),
                borrower_name: loan.borrower_name.clone(),
                installment_number: None,
                total_installments: None,
                description: format!("{} - Bullet Repayment", loan.borrower_name),
            });
        }
    }

    events.sort_by_key(|e| e.date);
    events
}

fn summarize(
    projections: &[CashFlowProjection],
    initial_available: Money,
    today: NaiveDate,
) -> CashFlowSummary {
    let in_30 = today + Duration::days(30);
    let in_90 = today + Duration::days(90);

    let mut summary = CashFlowSummary {
        next_30_days: Decimal::ZERO,
        next_90_days: Decimal::ZERO,
        peak_available: initial_available,
        lowest_available: initial_available,
        peak_date: today,
        lowest_date: today,
    };

    for proj in projections {
        if proj.date <= in_30 {
            summary.next_30_days += proj.expected_repayments;
        }
        if proj.date <= in_90 {
            summary.next_90_days += proj.expected_repayments;
        }

        if proj.cumulative_available > summary.peak_available {
            summary.peak_available = proj.cumulative_available;
            summary.peak_date = proj.date;
        }
        if proj.cumulative_available < summary.lowest_available {
            summary.lowest_available = proj.cumulative_available;
            summary.lowest_date = proj.date;
        }
    }

    summary
}
