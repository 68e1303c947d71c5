use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::benchmark::percent_of;
use crate::error::SatstackError;
use crate::ledger::LedgerSummary;
use crate::pricing::SpotPrice;
use crate::utils::SATS_PER_BTC;

/// Current value of the stack against what was paid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitReport {
    pub summary: LedgerSummary,
    pub price: SpotPrice,
    pub value_brl: Decimal,
    pub value_usd: Option<Decimal>,
    pub profit_brl: Decimal,
    pub profit_pct: Decimal,
    /// BRL per USD implied by the two BTC quotes
    pub implied_usd_brl: Decimal,
    /// Sats bought by one real at the current price
    pub sats_per_brl: i64,
}

pub fn calculate_profit(summary: &LedgerSummary, price: SpotPrice) -> Result<ProfitReport> {
    let btc = summary.total_btc();
    let value_brl = btc
        .checked_mul(price.brl)
        .ok_or_else(|| SatstackError::overflow("BRL value"))?;
    let value_usd = price
        .usd
        .map(|usd| {
            btc.checked_mul(usd)
                .ok_or_else(|| SatstackError::overflow("USD value"))
        })
        .transpose()?;
    let profit_brl = value_brl
        .checked_sub(summary.total_cost)
        .ok_or_else(|| SatstackError::overflow("profit"))?;

    let implied_usd_brl = match price.usd {
        Some(usd) if usd > Decimal::ZERO => price
            .brl
            .checked_div(usd)
            .ok_or_else(|| SatstackError::overflow("implied dollar"))?,
        _ => Decimal::ZERO,
    };

    let sats_per_brl = if price.brl > Decimal::ZERO {
        Decimal::from(SATS_PER_BTC)
            .checked_div(price.brl)
            .and_then(|sats| sats.floor().to_i64())
            .ok_or_else(|| SatstackError::overflow("sats per real"))?
    } else {
        0
    };

    Ok(ProfitReport {
        summary: summary.clone(),
        price,
        value_brl,
        value_usd,
        profit_brl,
        profit_pct: percent_of(profit_brl, summary.total_cost)?,
        implied_usd_brl,
        sats_per_brl,
    })
}
