//! Interest and cost primitives on the fund's 360-day accrual convention.
//!
//! All rates are whole percentages (14 = 14% p.a.).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::daycount::DAYS_IN_YEAR;
use crate::types::{CostItem, Days, Money, Rate};

const HUNDRED: Decimal = dec!(100);

/// Simple interest: P * (rate/100) * days / 360.
pub fn simple_interest(principal: Money, annual_rate_pct: Rate, days: Days) -> Money {
    principal * (annual_rate_pct / HUNDRED) * Decimal::from(days) / DAYS_IN_YEAR
}

/// Sum of percentage-of-principal cost items.
pub fn variable_costs(principal: Money, costs: &[CostItem]) -> Money {
    let total_pct: Rate = costs.iter().map(|c| c.percentage).sum();
    principal * total_pct / HUNDRED
}

/// Carrying cost of the fund's capital while deployed in a loan: the same
/// simple-interest formula applied to the fund's cost-of-capital rate.
pub fn allocated_cost_of_capital(principal: Money, fund_rate_pct: Rate, days: Days) -> Money {
    simple_interest(principal, fund_rate_pct, days)
}

/// Break-even = principal + allocated cost of capital + variable costs.
pub fn break_even_amount(
    principal: Money,
    fund_rate_pct: Rate,
    days: Days,
    costs: &[CostItem],
) -> Money {
    principal + allocated_cost_of_capital(principal, fund_rate_pct, days)
        + variable_costs(principal, costs)
}

/// Per-loan net yield = interest income − allocated cost of capital −
/// variable costs.
pub fn loan_net_yield(
    principal: Money,
    interest_rate_pct: Rate,
    fund_rate_pct: Rate,
    days: Days,
    costs: &[CostItem],
) -> Money {
    simple_interest(principal, interest_rate_pct, days)
        - allocated_cost_of_capital(principal, fund_rate_pct, days)
        - variable_costs(principal, costs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker_fee(pct: Decimal) -> Vec<CostItem> {
        vec![CostItem {
            name: "Broker".into(),
            percentage: pct,
        }]
    }

    #[test]
    fn simple_interest_known_answer() {
        // 100k at 14% for 90 days on a 360-day year = 3500
        assert_eq!(simple_interest(dec!(100000), dec!(14), 90), dec!(3500));
    }

    #[test]
    fn simple_interest_full_year() {
        // 360 days is a full accrual year
        assert_eq!(simple_interest(dec!(50000), dec!(20), 360), dec!(10000));
    }

    #[test]
    fn zero_days_accrues_nothing() {
        assert_eq!(simple_interest(dec!(100000), dec!(14), 0), Decimal::ZERO);
    }

    #[test]
    fn variable_costs_sum_percentages() {
        let costs = vec![
            CostItem {
                name: "Broker".into(),
                percentage: dec!(1),
            },
            CostItem {
                name: "Legal".into(),
                percentage: dec!(0.5),
            },
        ];
        assert_eq!(variable_costs(dec!(200000), &costs), dec!(3000));
        assert_eq!(variable_costs(dec!(200000), &[]), Decimal::ZERO);
    }

    #[test]
    fn allocated_cost_uses_fund_rate() {
        // 200k at 13.5% for 3 days = 337.50
        assert_eq!(
            allocated_cost_of_capital(dec!(200000), dec!(13.5), 3),
            dec!(337.50)
        );
    }

    #[test]
    fn break_even_stacks_principal_and_costs() {
        // 100k, fund at 12% over 180 days (6000), broker 1% (1000)
        assert_eq!(
            break_even_amount(dec!(100000), dec!(12), 180, &broker_fee(dec!(1))),
            dec!(107000)
        );
    }

    #[test]
    fn net_yield_is_income_less_costs() {
        // Income: 100k at 24% over 180d = 12000
        // CoC: 100k at 12% over 180d = 6000; broker 1% = 1000
        assert_eq!(
            loan_net_yield(dec!(100000), dec!(24), dec!(12), 180, &broker_fee(dec!(1))),
            dec!(5000)
        );
    }
}
