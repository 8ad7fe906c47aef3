//! Loan-level IRR: gross, and net of allocated costs.
//!
//! Cash-flow construction: principal out at the start date, repayments in.
//! The one-time processing fee is intentionally excluded from IRR flows on
//! both sides. Stored installment records, when present, are authoritative
//! over a regenerated schedule so that manual edits are respected.

use rust_decimal::Decimal;

use crate::interest::{allocated_cost_of_capital, variable_costs};
use crate::schedule::generate_schedule;
use crate::types::{validate_loan, CashFlow, Loan, Money, Rate};
use crate::{xirr, LoanFundResult};

/// Gross IRR of a loan as a decimal fraction, `None` when the solver cannot
/// determine one.
pub fn loan_irr(loan: &Loan) -> LoanFundResult<Option<Rate>> {
    validate_loan(loan)?;
    let flows = build_cash_flows(loan, None)?;
    Ok(xirr::xirr(&flows))
}

/// Net IRR: the initial outflow additionally carries the loan's variable
/// costs, and each repayment is reduced by a pro-rata share of the cost of
/// capital allocated over the loan's duration at `fund_cost_rate_pct`.
pub fn loan_net_irr(loan: &Loan, fund_cost_rate_pct: Rate) -> LoanFundResult<Option<Rate>> {
    validate_loan(loan)?;
    let flows = build_cash_flows(loan, Some(fund_cost_rate_pct))?;
    Ok(xirr::xirr(&flows))
}

fn build_cash_flows(loan: &Loan, net_of: Option<Rate>) -> LoanFundResult<Vec<CashFlow>> {
    let mut outflow = -loan.principal;
    if net_of.is_some() {
        outflow -= variable_costs(loan.principal, &loan.variable_costs);
    }

    let inflows: Vec<(chrono::NaiveDate, Money)> = if !loan.installments.is_empty() {
        loan.installments
            .iter()
            .map(|inst| (inst.due_date, inst.amount))
            .collect()
    } else {
        generate_schedule(
            loan.principal,
            loan.interest_rate,
            loan.start_date,
            loan.duration_days,
            loan.repayment_type,
        )?
        .into_iter()
        .map(|inst| (inst.due_date, inst.amount))
        .collect()
    };

    // Schedule generation always yields at least one installment, and the
    // stored branch requires a non-empty list, so the count is never zero.
    let per_installment_cost = match net_of {
        Some(fund_rate) => {
            allocated_cost_of_capital(loan.principal, fund_rate, loan.duration_days)
                / Decimal::from(inflows.len() as u64)
        }
        None => Decimal::ZERO,
    };

    let mut flows = Vec::with_capacity(inflows.len() + 1);
    flows.push(CashFlow {
        date: loan.start_date,
        amount: outflow,
    });
    for (date, amount) in inflows {
        flows.push(CashFlow {
            date,
            amount: amount - per_installment_cost,
        });
    }

    Ok(flows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::types::{CostItem, Installment, InstallmentStatus, LoanStatus, RepaymentType};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn bullet_loan() -> Loan {
        Loan {
            id: "loan-1".into(),
            fund_id: "fund-1".into(),
            borrower_name: "Borrower A".into(),
            principal: dec!(300000),
            interest_rate: dec!(24),
            processing_fee_rate: Some(dec!(2)),
            start_date: date("2026-01-05"),
            duration_days: 90,
            status: LoanStatus::Active,
            repayment_type: RepaymentType::Bullet,
            variable_costs: vec![],
            installments: vec![],
            defaulted_amount: None,
        }
    }

    #[test]
    fn bullet_gross_irr_annualizes_the_period_return() {
        // 300k at 24% for 90 days: +6% over ~quarter, ~26.8% annualized
        let rate = loan_irr(&bullet_loan()).unwrap().unwrap();
        assert!(
            (rate - dec!(0.268)).abs() < dec!(0.005),
            "expected ~26.8%, got {rate}"
        );
    }

    #[test]
    fn processing_fee_does_not_move_the_irr() {
        let mut with_fee = bullet_loan();
        with_fee.processing_fee_rate = Some(dec!(5));
        let mut without_fee = bullet_loan();
        without_fee.processing_fee_rate = None;

        assert_eq!(
            loan_irr(&with_fee).unwrap(),
            loan_irr(&without_fee).unwrap()
        );
    }

    #[test]
    fn monthly_loan_uses_generated_emi_schedule() {
        let mut loan = bullet_loan();
        loan.repayment_type = RepaymentType::Monthly;
        loan.duration_days = 180;

        let rate = loan_irr(&loan).unwrap().unwrap();
        // Reducing-balance repayment keeps the IRR near the nominal 24%
        assert!(
            rate > dec!(0.20) && rate < dec!(0.32),
            "expected IRR near the coupon, got {rate}"
        );
    }

    #[test]
    fn stored_installments_are_authoritative() {
        let mut loan = bullet_loan();
        loan.repayment_type = RepaymentType::Monthly;
        loan.duration_days = 60;
        // A manually edited schedule repaying more than the generated one
        loan.installments = vec![
            Installment {
                due_date: date("2026-02-04"),
                amount: dec!(160000),
                principal_component: dec!(150000),
                interest_component: dec!(10000),
                status: InstallmentStatus::Paid,
            },
            Installment {
                due_date: date("2026-03-06"),
                amount: dec!(160000),
                principal_component: dec!(150000),
                interest_component: dec!(10000),
                status: InstallmentStatus::Pending,
            },
        ];

        let stored = loan_irr(&loan).unwrap().unwrap();
        let mut regenerated = loan.clone();
        regenerated.installments.clear();
        let generated = loan_irr(&regenerated).unwrap().unwrap();

        assert!(
            stored > generated,
            "edited schedule repays more, so its IRR ({stored}) must exceed {generated}"
        );
    }

    #[test]
    fn net_irr_is_below_gross() {
        let mut loan = bullet_loan();
        loan.variable_costs = vec![CostItem {
            name: "Broker".into(),
            percentage: dec!(1),
        }];

        let gross = loan_irr(&loan).unwrap().unwrap();
        let net = loan_net_irr(&loan, dec!(13.5)).unwrap().unwrap();
        assert!(net < gross, "net {net} must be below gross {gross}");
    }

    #[test]
    fn net_irr_without_costs_still_carries_cost_of_capital() {
        let loan = bullet_loan();
        let gross = loan_irr(&loan).unwrap().unwrap();
        let net = loan_net_irr(&loan, dec!(12)).unwrap().unwrap();
        // 12% CoC against a 24% coupon roughly halves the return
        assert!(net < gross && net > Decimal::ZERO, "got net {net}");
    }

    #[test]
    fn invalid_loan_is_an_error_not_a_none() {
        let mut loan = bullet_loan();
        loan.duration_days = -5;
        assert!(loan_irr(&loan).is_err());
    }
}
