// Pricing module - current BTC price (CoinGecko or manual entry)

pub mod coingecko;

use rust_decimal::Decimal;

pub use coingecko::{fetch_spot_price, DEFAULT_PRICE_URL};

/// Current BTC price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotPrice {
    /// Price of one BTC in BRL
    pub brl: Decimal,
    /// Price of one BTC in USD, when known
    pub usd: Option<Decimal>,
}

impl SpotPrice {
    pub fn brl_only(brl: Decimal) -> Self {
        Self { brl, usd: None }
    }
}
