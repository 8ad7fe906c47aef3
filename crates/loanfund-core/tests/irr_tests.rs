use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use loanfund_core::loan_irr::{loan_irr, loan_net_irr};
use loanfund_core::types::{CashFlow, CostItem, Loan, LoanStatus, RepaymentType};
use loanfund_core::xirr::{xirr, xirr_with_guess};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn flow(d: &str, amount: Decimal) -> CashFlow {
    CashFlow {
        date: date(d),
        amount,
    }
}

fn loan(principal: Decimal, rate: Decimal, days: i64, repayment: RepaymentType) -> Loan {
    Loan {
        id: "loan-1".into(),
        fund_id: "fund-1".into(),
        borrower_name: "Borrower A".into(),
        principal,
        interest_rate: rate,
        processing_fee_rate: None,
        start_date: date("2026-01-05"),
        duration_days: days,
        status: LoanStatus::Active,
        repayment_type: repayment,
        variable_costs: vec![],
        installments: vec![],
        defaulted_amount: None,
    }
}

// ===========================================================================
// XIRR solver — round trips and failure modes
// ===========================================================================

#[test]
fn test_xirr_round_trip_recovers_the_rate() {
    // -1000 at day 0, 1000·(1+r) at day 365 must recover r within 1e-4
    for r in [dec!(0.05), dec!(0.10), dec!(0.25), dec!(0.50)] {
        let flows = vec![
            flow("2026-01-01", dec!(-1000)),
            flow("2027-01-01", dec!(1000) * (Decimal::ONE + r)),
        ];
        let solved = xirr(&flows).unwrap();
        assert!(
            (solved - r).abs() < dec!(0.0001),
            "expected {r}, got {solved}"
        );
    }
}

#[test]
fn test_xirr_quarterly_repayments() {
    // -300k out, three ~quarterly repayments of 106k: a solid positive IRR
    let flows = vec![
        flow("2026-01-01", dec!(-300000)),
        flow("2026-04-01", dec!(106000)),
        flow("2026-07-01", dec!(106000)),
        flow("2026-10-01", dec!(106000)),
    ];
    let rate = xirr(&flows).unwrap();
    assert!(rate > dec!(0.10) && rate < dec!(0.20), "got {rate}");
}

#[test]
fn test_xirr_no_result_cases() {
    assert_eq!(xirr(&[]), None);

    // No sign change: no root to find
    let inflows_only = vec![flow("2026-01-01", dec!(500)), flow("2026-06-01", dec!(500))];
    assert_eq!(xirr(&inflows_only), None);
}

#[test]
fn test_xirr_single_dated_flow_has_no_rate() {
    // One flow discounts to itself at every rate; the derivative vanishes
    let flows = vec![flow("2026-01-01", dec!(-1000))];
    assert_eq!(xirr(&flows), None);
}

#[test]
fn test_xirr_guess_invariance() {
    let flows = vec![
        flow("2026-01-01", dec!(-5000)),
        flow("2026-12-01", dec!(5600)),
    ];
    let a = xirr_with_guess(&flows, dec!(0.01)).unwrap();
    let b = xirr_with_guess(&flows, dec!(0.5)).unwrap();
    assert!((a - b).abs() < dec!(0.0001));
}

// ===========================================================================
// Loan IRR — gross and net
// ===========================================================================

#[test]
fn test_bullet_loan_irr_user_example() {
    // 300k, 24% p.a., 90 days: 6% over the period, ~26.8% annualized
    let rate = loan_irr(&loan(dec!(300000), dec!(24), 90, RepaymentType::Bullet))
        .unwrap()
        .unwrap();
    assert!(
        (rate - dec!(0.268)).abs() < dec!(0.005),
        "expected ~26.8%, got {rate}"
    );
}

#[test]
fn test_monthly_loan_irr_stays_near_the_coupon() {
    let rate = loan_irr(&loan(dec!(300000), dec!(24), 90, RepaymentType::Monthly))
        .unwrap()
        .unwrap();
    // Reducing-balance EMI over 3 periods of 30 days
    assert!(rate > dec!(0.20) && rate < dec!(0.32), "got {rate}");
}

#[test]
fn test_net_irr_orders_below_gross() {
    let mut l = loan(dec!(300000), dec!(24), 180, RepaymentType::Bullet);
    l.variable_costs = vec![CostItem {
        name: "Broker".into(),
        percentage: dec!(1),
    }];

    let gross = loan_irr(&l).unwrap().unwrap();
    let net = loan_net_irr(&l, dec!(13.5)).unwrap().unwrap();
    assert!(net < gross, "net {net} must be below gross {gross}");
    // 36k interest against 20250 CoC and 3000 broker still clears a profit
    assert!(net > Decimal::ZERO, "got {net}");
}

#[test]
fn test_net_irr_can_go_negative_on_thin_spreads() {
    // Reducing-balance interest on 180 days (~21.4k) is outgunned by cost
    // of capital charged on the full principal (20250) plus the broker fee.
    let mut l = loan(dec!(300000), dec!(24), 180, RepaymentType::Monthly);
    l.variable_costs = vec![CostItem {
        name: "Broker".into(),
        percentage: dec!(1),
    }];

    let net = loan_net_irr(&l, dec!(13.5)).unwrap().unwrap();
    assert!(net < Decimal::ZERO, "got {net}");
}

#[test]
fn test_irr_is_idempotent() {
    let l = loan(dec!(150000), dec!(20), 240, RepaymentType::Monthly);
    let first = loan_irr(&l).unwrap().unwrap();
    let second = loan_irr(&l).unwrap().unwrap();
    assert_eq!(first, second);
}
