//! Fund-level portfolio rollup.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::daycount::DAYS_IN_YEAR;
use crate::interest::{allocated_cost_of_capital, simple_interest, variable_costs};
use crate::types::{validate_fund, validate_loan, Fund, Loan, LoanStatus, Money, Rate};
use crate::undeployed::undeployed_capital_cost;
use crate::LoanFundResult;

const HUNDRED: Decimal = dec!(100);

/// Cost of carrying the full raised amount, at several reporting cadences.
/// Informational only — the per-loan expense rollup allocates cost of capital
/// by deployment instead.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalCostMetrics {
    pub annual: Money,
    pub monthly: Money,
    pub weekly: Money,
    pub daily: Money,
}

/// Aggregated metrics for one fund over its loans. Regenerated on every call
/// from the current records; never persisted by the engine.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundMetrics {
    pub total_raised: Money,
    /// Principal tied up in ACTIVE and DEFAULTED loans.
    pub deployed_capital: Money,
    pub available_capital: Money,
    /// Principal of DEFAULTED loans.
    pub npl_volume: Money,
    /// npl_volume / total_raised, as a percentage. Zero when nothing raised.
    pub npl_ratio: Rate,
    /// Interest income on non-defaulted principal plus processing fees.
    pub projected_income: Money,
    /// Deal-basis: allocated cost of capital + variable costs + written-off
    /// principal. Excludes the undeployed-capital cost.
    pub total_expenses: Money,
    pub net_yield: Money,
    pub total_processing_fees: Money,
    pub total_allocated_cost_of_capital: Money,
    /// Variable (upfront) costs across deployed loans.
    pub total_upfront_costs_deployed: Money,
    /// Carrying cost of idle capital from inception to the as-of date.
    pub accumulated_undeployed_cost: Money,
    pub global_cost: GlobalCostMetrics,
}

/// Roll up a fund's loans into [`FundMetrics`] as of `as_of`.
///
/// Loans belonging to other funds are ignored. Sums are order-independent:
/// reordering the loan slice cannot change any output.
pub fn compute_fund_metrics(
    fund: &Fund,
    loans: &[Loan],
    as_of: NaiveDate,
) -> LoanFundResult<FundMetrics> {
    validate_fund(fund)?;
    for loan in loans {
        validate_loan(loan)?;
    }

    let fund_loans: Vec<&Loan> = loans.iter().filter(|l| l.fund_id == fund.id).collect();

    let deployed_capital: Money = fund_loans
        .iter()
        .filter(|l| matches!(l.status, LoanStatus::Active | LoanStatus::Defaulted))
        .map(|l| l.principal)
        .sum();
    let available_capital = fund.total_raised - deployed_capital;

    let npl_volume: Money = fund_loans
        .iter()
        .filter(|l| l.status == LoanStatus::Defaulted)
        .map(|l| l.principal)
        .sum();
    let npl_ratio = if fund.total_raised > Decimal::ZERO {
        npl_volume / fund.total_raised * HUNDRED
    } else {
        Decimal::ZERO
    };

    let annual_global_cost = fund.total_raised * fund.cost_of_capital_rate / HUNDRED;
    let daily_global_cost = annual_global_cost / DAYS_IN_YEAR;
    let global_cost = GlobalCostMetrics {
        annual: annual_global_cost,
        monthly: annual_global_cost / dec!(12),
        weekly: daily_global_cost * dec!(7),
        daily: daily_global_cost,
    };

    let mut projected_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut total_processing_fees = Decimal::ZERO;
    let mut total_allocated_coc = Decimal::ZERO;
    let mut total_upfront_costs = Decimal::ZERO;

    for loan in &fund_loans {
        let defaulted = loan.defaulted_amount.unwrap_or(Decimal::ZERO);
        // Only the non-written-off share earns interest; a full default
        // earns nothing.
        let active_principal = loan.principal - defaulted;

        // Costs were paid on the original principal when the loan was made.
        let allocated_coc = allocated_cost_of_capital(
            loan.principal,
            fund.cost_of_capital_rate,
            loan.duration_days,
        );
        let upfront = variable_costs(loan.principal, &loan.variable_costs);

        let interest_income =
            simple_interest(active_principal, loan.interest_rate, loan.duration_days);
        let processing_fee = match loan.processing_fee_rate {
            Some(fee_pct) if loan.status != LoanStatus::Defaulted => {
                loan.principal * fee_pct / HUNDRED
            }
            _ => Decimal::ZERO,
        };

        projected_income += interest_income + processing_fee;
        // The written-off principal itself is booked as a loss.
        total_expenses += allocated_coc + upfront + defaulted;

        total_processing_fees += processing_fee;
        total_allocated_coc += allocated_coc;
        total_upfront_costs += upfront;
    }

    let accumulated_undeployed_cost = undeployed_capital_cost(fund, loans, as_of)?;

    Ok(FundMetrics {
        total_raised: fund.total_raised,
        deployed_capital,
        available_capital,
        npl_volume,
        npl_ratio,
        projected_income,
        total_expenses,
        net_yield: projected_income - total_expenses,
        total_processing_fees,
        total_allocated_cost_of_capital: total_allocated_coc,
        total_upfront_costs_deployed: total_upfront_costs,
        accumulated_undeployed_cost,
        global_cost,
    })
}
