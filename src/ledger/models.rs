use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SatstackError;
use crate::utils::sats_to_btc;

/// One recorded BTC purchase.
///
/// Field names on disk follow the existing `carteira.json` layout
/// (`data`, `sats`, `custo`, `preco_historico`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    #[serde(rename = "data")]
    pub date: NaiveDate,

    /// Quantity in satoshis
    pub sats: i64,

    /// Amount paid in BRL
    #[serde(rename = "custo", with = "rust_decimal::serde::float")]
    pub cost: Decimal,

    /// Cost per whole BTC at purchase time. Derived from `sats` and `cost`;
    /// zero or missing values are recomputed on load.
    #[serde(
        rename = "preco_historico",
        default,
        with = "rust_decimal::serde::float"
    )]
    pub reference_price: Decimal,
}

impl Lot {
    pub fn new(date: NaiveDate, sats: i64, cost: Decimal) -> Self {
        let mut lot = Self {
            date,
            sats,
            cost,
            reference_price: Decimal::ZERO,
        };
        lot.reference_price = lot.derived_price();
        lot
    }

    /// Purchased quantity in whole BTC
    pub fn btc(&self) -> Decimal {
        sats_to_btc(self.sats)
    }

    /// cost ÷ BTC, or zero for an empty lot
    pub fn derived_price(&self) -> Decimal {
        let btc = self.btc();
        if btc > Decimal::ZERO {
            self.cost.checked_div(btc).unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    /// Restore the cached reference price when the stored one is unusable.
    pub fn normalize(&mut self) {
        if self.reference_price.is_zero() && self.sats > 0 {
            self.reference_price = self.derived_price();
        }
    }
}

/// Aggregate view of the whole ledger, recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    pub lot_count: usize,
    pub total_sats: i64,
    pub total_cost: Decimal,
}

impl LedgerSummary {
    /// Totals over `lots`. Fails when a sum or the average cost does not fit.
    pub fn from_lots(lots: &[Lot]) -> Result<Self> {
        let mut total_sats: i64 = 0;
        let mut total_cost = Decimal::ZERO;
        for lot in lots {
            total_sats = total_sats
                .checked_add(lot.sats)
                .ok_or_else(|| SatstackError::overflow("total sats"))?;
            total_cost = total_cost
                .checked_add(lot.cost)
                .ok_or_else(|| SatstackError::overflow("total cost"))?;
        }

        let btc = sats_to_btc(total_sats);
        if btc > Decimal::ZERO && total_cost.checked_div(btc).is_none() {
            return Err(SatstackError::overflow("average cost").into());
        }

        Ok(Self {
            lot_count: lots.len(),
            total_sats,
            total_cost,
        })
    }

    pub fn total_btc(&self) -> Decimal {
        sats_to_btc(self.total_sats)
    }

    /// Preço médio: total cost ÷ total BTC, zero when nothing is held
    pub fn average_cost(&self) -> Decimal {
        let btc = self.total_btc();
        if btc > Decimal::ZERO {
            self.total_cost.checked_div(btc).unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_sats == 0
    }
}
