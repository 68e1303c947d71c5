//! Interactive menus
//!
//! Two numbered menus share one `App`: portfolio management (add, list,
//! profit report, delete) and the analysis tools (Bitcoin vs SELIC,
//! average-cost calculator).

pub mod compare;
pub mod input;
pub mod portfolio;
pub mod progress;
pub mod readline;
pub mod screen;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use tracing::warn;

use crate::config::Config;
use crate::http::{HttpFetcher, TextFetcher};
use crate::ledger::LedgerStore;
use crate::pricing::{fetch_spot_price, SpotPrice};
use crate::rates::RateLoader;
use readline::Prompt;
use screen::Activity;

/// Which menu to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Portfolio,
    Compare,
}

/// Everything the menus need, built once from the configuration.
pub struct App {
    pub ledger: LedgerStore,
    pub rates: RateLoader,
    price_fetcher: Option<Box<dyn TextFetcher>>,
    price_url: String,
}

impl App {
    pub fn new(
        ledger: LedgerStore,
        rates: RateLoader,
        price_fetcher: Option<Box<dyn TextFetcher>>,
        price_url: impl Into<String>,
    ) -> Self {
        Self {
            ledger,
            rates,
            price_fetcher,
            price_url: price_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut rates_fetcher: Option<Box<dyn TextFetcher>> = None;
        let mut price_fetcher: Option<Box<dyn TextFetcher>> = None;
        if !config.offline {
            rates_fetcher = Some(Box::new(HttpFetcher::new(
                config.rates_timeout,
                config.accept_invalid_certs,
            )?));
            price_fetcher = Some(Box::new(HttpFetcher::new(config.price_timeout, false)?));
        }

        Ok(Self::new(
            LedgerStore::new(&config.ledger_path),
            RateLoader::new(&config.rates_file, &config.series_url, rates_fetcher),
            price_fetcher,
            &config.price_url,
        ))
    }

    /// Online BTC price, or `None` when offline or the request fails.
    pub fn fetch_price(&self) -> Option<SpotPrice> {
        let fetcher = self.price_fetcher.as_deref()?;
        let activity = Activity::start("Consultando preço do Bitcoin...");
        let result = fetch_spot_price(fetcher, &self.price_url);
        activity.finish();
        match result {
            Ok(price) => Some(price),
            Err(e) => {
                warn!("BTC price fetch failed: {:#}", e);
                print_error(&e);
                None
            }
        }
    }

    pub fn is_online(&self) -> bool {
        self.price_fetcher.is_some()
    }
}

/// Calendar day used as "now" by the reports
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);
}

/// Run a menu until the user exits or input is closed.
pub fn run(menu: Menu, app: &App, prompt: &mut dyn Prompt) {
    match menu {
        Menu::Portfolio => portfolio::run_menu(app, prompt),
        Menu::Compare => compare::run_menu(app, prompt),
    }
}

/// Ask for the BTC price by hand. `with_usd` also asks for the USD quote.
pub fn ask_price(prompt: &mut dyn Prompt, with_usd: bool) -> Option<SpotPrice> {
    let brl = input::read_money(prompt, "Cotação R$: ")?;
    let usd = if with_usd {
        Some(input::read_money(prompt, "Cotação USD: ")?)
    } else {
        None
    };
    Some(SpotPrice { brl, usd })
}
