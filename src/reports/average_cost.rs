//! Average-cost calculator: how much BTC to buy at the current price to
//! bring the average cost down to a target.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::LedgerSummary;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("nenhuma compra registrada")]
    EmptyLedger,

    #[error("alvo {target} não é maior que a cotação {price}")]
    TargetNotAbovePrice { target: Decimal, price: Decimal },

    #[error("alvo {target} não é menor que o preço médio {average}")]
    TargetNotBelowAverage { target: Decimal, average: Decimal },

    #[error("valores fora do intervalo calculável")]
    OutOfRange,
}

/// Purchase that brings the average cost to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPurchase {
    pub target: Decimal,
    pub price: Decimal,
    pub btc_needed: Decimal,
    pub investment_needed: Decimal,
}

/// Solve `(cost + q·price) / (btc + q) = target` for `q`.
///
/// Only reachable when `price < target < average`.
pub fn solve_target_average(
    summary: &LedgerSummary,
    price: Decimal,
    target: Decimal,
) -> Result<TargetPurchase, SolverError> {
    if summary.is_empty() {
        return Err(SolverError::EmptyLedger);
    }
    let average = summary.average_cost();
    if target <= price {
        return Err(SolverError::TargetNotAbovePrice { target, price });
    }
    if target >= average {
        return Err(SolverError::TargetNotBelowAverage { target, average });
    }

    let numerator = summary
        .total_btc()
        .checked_mul(target)
        .and_then(|held_at_target| summary.total_cost.checked_sub(held_at_target))
        .ok_or(SolverError::OutOfRange)?;
    let denominator = target.checked_sub(price).ok_or(SolverError::OutOfRange)?;
    let btc_needed = numerator
        .checked_div(denominator)
        .ok_or(SolverError::OutOfRange)?;
    let investment_needed = btc_needed
        .checked_mul(price)
        .ok_or(SolverError::OutOfRange)?;

    Ok(TargetPurchase {
        target,
        price,
        btc_needed,
        investment_needed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn summary(total_sats: i64, total_cost: Decimal) -> LedgerSummary {
        LedgerSummary {
            lot_count: 1,
            total_sats,
            total_cost,
        }
    }

    #[test]
    fn test_reachable_target() {
        // 0.02 BTC for R$ 1000 -> average 50000
        let s = summary(2_000_000, dec!(1000));
        let result = solve_target_average(&s, dec!(40000), dec!(45000)).unwrap();
        assert_eq!(result.btc_needed, dec!(0.02));
        assert_eq!(result.investment_needed, dec!(800));
    }

    #[test]
    fn test_new_average_hits_target() {
        let s = summary(2_000_000, dec!(1000));
        let result = solve_target_average(&s, dec!(40000), dec!(45000)).unwrap();
        let new_average =
            (s.total_cost + result.investment_needed) / (s.total_btc() + result.btc_needed);
        assert_eq!(new_average, dec!(45000));
    }

    #[test]
    fn test_rejects_target_not_above_price() {
        let s = summary(2_000_000, dec!(1000));
        assert_eq!(
            solve_target_average(&s, dec!(40000), dec!(40000)),
            Err(SolverError::TargetNotAbovePrice {
                target: dec!(40000),
                price: dec!(40000)
            })
        );
        assert!(matches!(
            solve_target_average(&s, dec!(40000), dec!(30000)),
            Err(SolverError::TargetNotAbovePrice { .. })
        ));
    }

    #[test]
    fn test_rejects_target_not_below_average() {
        let s = summary(2_000_000, dec!(1000));
        assert!(matches!(
            solve_target_average(&s, dec!(40000), dec!(50000)),
            Err(SolverError::TargetNotBelowAverage { .. })
        ));
        assert!(matches!(
            solve_target_average(&s, dec!(40000), dec!(60000)),
            Err(SolverError::TargetNotBelowAverage { .. })
        ));
    }

    #[test]
    fn test_price_equal_to_target_does_not_divide_by_zero() {
        // price == target would make the denominator zero
        let s = summary(2_000_000, dec!(1000));
        assert!(solve_target_average(&s, dec!(45000), dec!(45000)).is_err());
    }

    #[test]
    fn test_target_a_hair_above_price_is_out_of_range() {
        let s = summary(2_000_000, dec!(1000000000000000));
        let price = dec!(40000);
        let target = dec!(40000.000000000000000000001);
        assert_eq!(
            solve_target_average(&s, price, target),
            Err(SolverError::OutOfRange)
        );
    }

    #[test]
    fn test_rejects_empty_ledger() {
        let s = summary(0, Decimal::ZERO);
        assert_eq!(
            solve_target_average(&s, dec!(1), dec!(2)),
            Err(SolverError::EmptyLedger)
        );
    }
}
