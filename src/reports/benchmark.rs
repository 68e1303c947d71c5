//! Bitcoin vs SELIC: each lot's cost compounded at the daily SELIC rate,
//! net of the regressive income tax, compared with the BTC value today.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::SatstackError;
use crate::ledger::Lot;
use crate::rates::RateTable;
use crate::tax::{income_tax, income_tax_rate};

/// Benchmark outcome for a single lot
#[derive(Debug, Clone, PartialEq)]
pub struct LotBenchmark {
    pub date: NaiveDate,
    pub cost: Decimal,
    pub btc_value: Decimal,
    pub factor: Decimal,
    pub gross_value: Decimal,
    pub gross_gain: Decimal,
    pub held_days: i64,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub net_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Bitcoin,
    Selic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    pub as_of: NaiveDate,
    pub btc_price: Decimal,
    pub lots: Vec<LotBenchmark>,
    pub total_invested: Decimal,
    pub total_btc_value: Decimal,
    pub total_selic_net: Decimal,
    pub btc_profit: Decimal,
    pub selic_profit: Decimal,
    pub btc_return_pct: Decimal,
    pub selic_return_pct: Decimal,
    /// Absolute difference between the two final values
    pub margin: Decimal,
}

impl BenchmarkReport {
    /// Bitcoin wins only when strictly ahead; ties go to SELIC.
    pub fn winner(&self) -> Winner {
        if self.total_btc_value > self.total_selic_net {
            Winner::Bitcoin
        } else {
            Winner::Selic
        }
    }
}

/// `gain / base * 100`, zero when nothing was invested
pub fn percent_of(gain: Decimal, base: Decimal) -> Result<Decimal> {
    if base <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    gain.checked_div(base)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| SatstackError::overflow("percentage").into())
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>, what: &str) -> Result<Decimal> {
    values
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
        .ok_or_else(|| SatstackError::overflow(what).into())
}

fn checked_diff(a: Decimal, b: Decimal, what: &str) -> Result<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| SatstackError::overflow(what).into())
}

/// Compounded SELIC factor over `[from, to)`.
///
/// Days missing from the table (weekends, holidays) add no growth.
pub fn accumulated_factor(rates: &RateTable, from: NaiveDate, to: NaiveDate) -> Result<Decimal> {
    from.iter_days()
        .take_while(|day| *day < to)
        .filter_map(|day| rates.get(day))
        .try_fold(Decimal::ONE, |factor, rate| {
            factor.checked_mul(Decimal::ONE + rate / Decimal::ONE_HUNDRED)
        })
        .ok_or_else(|| SatstackError::overflow("SELIC factor").into())
}

/// Evaluate one lot against the benchmark as of `today`.
pub fn evaluate_lot(
    lot: &Lot,
    rates: &RateTable,
    btc_price: Decimal,
    today: NaiveDate,
) -> Result<LotBenchmark> {
    let factor = accumulated_factor(rates, lot.date, today)?;
    let gross_value = lot
        .cost
        .checked_mul(factor)
        .ok_or_else(|| SatstackError::overflow("SELIC gross value"))?;
    let gross_gain = checked_diff(gross_value, lot.cost, "SELIC gain")?;
    let held_days = (today - lot.date).num_days();
    let tax = income_tax(gross_gain, held_days);
    let btc_value = lot
        .btc()
        .checked_mul(btc_price)
        .ok_or_else(|| SatstackError::overflow("BTC value"))?;

    Ok(LotBenchmark {
        date: lot.date,
        cost: lot.cost,
        btc_value,
        factor,
        gross_value,
        gross_gain,
        held_days,
        tax_rate: income_tax_rate(held_days),
        tax,
        net_value: checked_diff(gross_value, tax, "SELIC net value")?,
    })
}

/// Build the portfolio-wide comparison.
///
/// Fails with [`SatstackError::Overflow`] when a value does not fit in a
/// `Decimal`.
pub fn compare_with_selic(
    lots: &[Lot],
    rates: &RateTable,
    btc_price: Decimal,
    today: NaiveDate,
) -> Result<BenchmarkReport> {
    let evaluated = lots
        .iter()
        .map(|lot| evaluate_lot(lot, rates, btc_price, today))
        .collect::<Result<Vec<LotBenchmark>>>()?;

    let total_invested = checked_sum(evaluated.iter().map(|l| l.cost), "total invested")?;
    let total_btc_value = checked_sum(evaluated.iter().map(|l| l.btc_value), "total BTC value")?;
    let total_selic_net = checked_sum(evaluated.iter().map(|l| l.net_value), "total SELIC value")?;

    let btc_profit = checked_diff(total_btc_value, total_invested, "BTC profit")?;
    let selic_profit = checked_diff(total_selic_net, total_invested, "SELIC profit")?;

    Ok(BenchmarkReport {
        as_of: today,
        btc_price,
        lots: evaluated,
        total_invested,
        total_btc_value,
        total_selic_net,
        btc_profit,
        selic_profit,
        btc_return_pct: percent_of(btc_profit, total_invested)?,
        selic_return_pct: percent_of(selic_profit, total_invested)?,
        margin: checked_diff(total_btc_value, total_selic_net, "margin")?.abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(entries: &[(NaiveDate, Decimal)]) -> RateTable {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_only_table_days_before_today_compound() {
        let rates = table(&[(date(2024, 1, 2), dec!(0.04))]);
        let lot = Lot::new(date(2024, 1, 1), 100_000, dec!(1000));

        let eval = evaluate_lot(&lot, &rates, dec!(300000), date(2024, 1, 3)).unwrap();
        assert_eq!(eval.factor, dec!(1.0004));
        assert_eq!(eval.gross_value, dec!(1000) * dec!(1.0004));
        assert_eq!(eval.gross_gain, dec!(0.4));
        assert_eq!(eval.held_days, 2);
        assert_eq!(eval.tax, dec!(0.09));
        assert_eq!(eval.net_value, dec!(1000.31));
    }

    #[test]
    fn test_today_is_excluded_and_purchase_day_included() {
        let rates = table(&[
            (date(2024, 1, 1), dec!(0.05)),
            (date(2024, 1, 3), dec!(0.05)),
        ]);
        let factor = accumulated_factor(&rates, date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        assert_eq!(factor, dec!(1.0005));
    }

    #[test]
    fn test_same_day_purchase_has_no_growth() {
        let rates = table(&[(date(2024, 1, 1), dec!(0.05))]);
        let lot = Lot::new(date(2024, 1, 1), 100_000, dec!(500));
        let eval = evaluate_lot(&lot, &rates, dec!(300000), date(2024, 1, 1)).unwrap();
        assert_eq!(eval.factor, Decimal::ONE);
        assert_eq!(eval.net_value, dec!(500));
    }

    #[test]
    fn test_compounding_is_multiplicative() {
        let rates = table(&[
            (date(2024, 1, 1), dec!(1)),
            (date(2024, 1, 2), dec!(1)),
        ]);
        let factor = accumulated_factor(&rates, date(2024, 1, 1), date(2024, 1, 10)).unwrap();
        assert_eq!(factor, dec!(1.0201));
    }

    #[test]
    fn test_long_holding_uses_lowest_bracket() {
        let rates = table(&[(date(2022, 1, 3), dec!(10))]);
        let lot = Lot::new(date(2022, 1, 1), 100_000, dec!(1000));
        let eval = evaluate_lot(&lot, &rates, dec!(300000), date(2024, 1, 1)).unwrap();
        assert_eq!(eval.tax_rate, dec!(15));
        assert_eq!(eval.gross_gain, dec!(100));
        assert_eq!(eval.net_value, dec!(1085));
    }

    #[test]
    fn test_portfolio_totals_and_winner() {
        let rates = table(&[(date(2024, 1, 2), dec!(0.04))]);
        let lots = vec![
            Lot::new(date(2024, 1, 1), 100_000, dec!(1000)),
            Lot::new(date(2024, 1, 2), 200_000, dec!(1000)),
        ];
        let report = compare_with_selic(&lots, &rates, dec!(400000), date(2024, 1, 3)).unwrap();

        assert_eq!(report.total_invested, dec!(2000));
        assert_eq!(report.total_btc_value, dec!(1200));
        assert_eq!(report.btc_profit, dec!(-800));
        assert_eq!(report.btc_return_pct, dec!(-40));
        assert_eq!(report.winner(), Winner::Selic);
        assert!(report.selic_profit > Decimal::ZERO);
        assert_eq!(report.margin, report.total_selic_net - dec!(1200));
    }

    #[test]
    fn test_empty_portfolio_has_zero_returns() {
        let report =
            compare_with_selic(&[], &RateTable::default(), dec!(1), date(2024, 1, 3)).unwrap();
        assert_eq!(report.btc_return_pct, Decimal::ZERO);
        assert_eq!(report.selic_return_pct, Decimal::ZERO);
    }

    #[test]
    fn test_huge_cached_rates_report_overflow() {
        let rates = table(&[
            (date(2024, 1, 1), dec!(99999999999999)),
            (date(2024, 1, 2), dec!(99999999999999)),
            (date(2024, 1, 3), dec!(99999999999999)),
            (date(2024, 1, 4), dec!(99999999999999)),
        ]);
        let lots = vec![Lot::new(date(2024, 1, 1), 100_000, dec!(1000))];

        let err = compare_with_selic(&lots, &rates, dec!(300000), date(2024, 1, 5)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SatstackError>(),
            Some(SatstackError::Overflow(_))
        ));
    }

    #[test]
    fn test_huge_btc_price_reports_overflow() {
        let lots = vec![Lot::new(date(2024, 1, 1), 2_100_000_000_000_000, dec!(1000))];
        let result = compare_with_selic(&lots, &RateTable::default(), Decimal::MAX, date(2024, 1, 2));
        assert!(result.is_err());
    }

    #[test]
    fn test_percent_of_tiny_base_reports_overflow() {
        assert!(percent_of(Decimal::MAX, dec!(0.0000001)).is_err());
        assert_eq!(percent_of(dec!(5), Decimal::ZERO).unwrap(), Decimal::ZERO);
    }
}
