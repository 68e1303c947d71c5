use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Overrides;

pub mod formatters;

#[derive(Parser, Debug)]
#[command(name = "satstack")]
#[command(
    version,
    about = "Bitcoin DCA tracker with average cost, profit report and SELIC comparison"
)]
#[command(
    long_about = "Record your BTC purchases, follow the average cost and compare the stack against the SELIC rate net of the regressive income tax. Everything runs through numbered interactive menus."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Never touch the network (manual price entry and manual SELIC download)
    #[arg(long, global = true, env = "SATSTACK_OFFLINE", value_parser = clap::builder::BoolishValueParser::new())]
    pub offline: bool,

    /// Ledger JSON file (default: ~/.satstack/carteira.json)
    #[arg(long, global = true, env = "SATSTACK_LEDGER")]
    pub ledger: Option<PathBuf>,

    /// SELIC cache file (default: <cache dir>/satstack/selic.csv)
    #[arg(long = "rates-file", global = true, env = "SATSTACK_RATES_FILE")]
    pub rates_file: Option<PathBuf>,

    /// Configuration file (default: ~/.satstack/config.toml)
    #[arg(long, global = true, env = "SATSTACK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Portfolio management: add, list, profit report, delete (default)
    Portfolio,

    /// Analysis tools: Bitcoin vs SELIC and the average-cost calculator
    Compare,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            ledger_path: self.ledger.clone(),
            rates_file: self.rates_file.clone(),
            offline: self.offline,
        }
    }

    pub fn mode(&self) -> Commands {
        self.command.unwrap_or(Commands::Portfolio)
    }
}
