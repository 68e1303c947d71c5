//! Satstack - Bitcoin DCA tracker
//!
//! Keeps a JSON ledger of BTC purchases, reports average cost and profit, and
//! compares the stack against the SELIC rate net of the regressive income tax.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod ledger;
pub mod pricing;
pub mod rates;
pub mod reports;
pub mod tax;
pub mod ui;
pub mod utils;
