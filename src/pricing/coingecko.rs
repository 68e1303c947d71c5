use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use super::SpotPrice;
use crate::error::SatstackError;
use crate::http::TextFetcher;

/// CoinGecko simple price endpoint for BTC in BRL and USD
pub const DEFAULT_PRICE_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=brl,usd";

/// CoinGecko simple price response: `{"bitcoin": {"brl": .., "usd": ..}}`
#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<BitcoinQuote>,
}

#[derive(Debug, Deserialize)]
struct BitcoinQuote {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    brl: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    usd: Option<Decimal>,
}

/// Fetch the current BTC price from CoinGecko
pub fn fetch_spot_price(fetcher: &dyn TextFetcher, url: &str) -> Result<SpotPrice> {
    info!("Fetching BTC price from CoinGecko");
    let body = fetcher
        .fetch_text(url)
        .context("Failed to query CoinGecko")?;
    parse_simple_price(&body)
}

fn parse_simple_price(body: &str) -> Result<SpotPrice> {
    let response: SimplePriceResponse =
        serde_json::from_str(body).context("Failed to parse CoinGecko response")?;

    let quote = response
        .bitcoin
        .ok_or_else(|| SatstackError::PricingError("no bitcoin quote in response".to_string()))?;
    let brl = quote
        .brl
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| SatstackError::PricingError("no BRL price in response".to_string()))?;

    Ok(SpotPrice {
        brl,
        usd: quote.usd.filter(|p| *p > Decimal::ZERO),
    })
}
