//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::Path;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::ledger::{LedgerSummary, Lot};
use crate::reports::{BenchmarkReport, LotBenchmark, ProfitReport, TargetPurchase, Winner};
use crate::tax::HoldingBracket;
use crate::utils::{
    format_btc, format_currency, format_decimal_br, format_percent, format_usd, sats_to_btc,
};

const CHART_WIDTH: usize = 40;

/// Purchase history table, numbered by position in date order
pub fn format_lot_table(lots: &[Lot]) -> String {
    #[derive(Tabled)]
    struct LotRow {
        #[tabled(rename = "ID")]
        id: usize,
        #[tabled(rename = "Data")]
        date: String,
        #[tabled(rename = "Quantidade (BTC)")]
        btc: String,
        #[tabled(rename = "Gasto (R$)")]
        cost: String,
        #[tabled(rename = "Cotação ref.")]
        reference_price: String,
    }

    let rows: Vec<LotRow> = lots
        .iter()
        .enumerate()
        .map(|(i, lot)| LotRow {
            id: i + 1,
            date: lot.date.format("%d/%m/%y").to_string(),
            btc: format_btc(lot.sats),
            cost: format_decimal_br(lot.cost),
            reference_price: format_currency(lot.reference_price),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(2..), Alignment::right());
    table.to_string()
}

/// Totals shown under the history table
pub fn format_ledger_summary(summary: &LedgerSummary) -> String {
    format!(
        "{:<13} {:.8}\n{:<13} {}\n{:<13} {}\n",
        "TOTAL BTC:".bold(),
        summary.total_btc(),
        "INVESTIDO:".bold(),
        format_currency(summary.total_cost),
        "PREÇO MÉDIO:".bold(),
        format_currency(summary.average_cost()),
    )
}

pub fn format_lot_added(lot: &Lot) -> String {
    format!(
        "\n{} Compra registrada!\n   BTC: {}\n   Gasto: {}\n   (Ref: {})\n\n{} A lista é reordenada automaticamente pela data.\n",
        "✓".green().bold(),
        format_btc(lot.sats),
        format_currency(lot.cost),
        format_currency(lot.reference_price),
        "ℹ".blue().bold(),
    )
}

pub fn format_empty_ledger() -> String {
    format!(
        "{} Nenhuma compra registrada\nAdicione compras primeiro pelo menu: {}\n",
        "ℹ".blue().bold(),
        "satstack portfolio".bold()
    )
}

fn colored_amount(value: Decimal, text: String) -> String {
    if value >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Profit report screen
pub fn format_profit_report(report: &ProfitReport) -> String {
    let rule = "=".repeat(40);
    let thin = "-".repeat(40);
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", rule));
    output.push_str(&format!(
        "Dólar implícito: {}\n",
        format_currency(report.implied_usd_brl)
    ));
    output.push_str(&format!(
        "Poder de compra: 1 BRL = {} sats\n",
        report.sats_per_brl
    ));
    output.push_str(&format!("{}\n", thin));
    output.push_str(&format!(
        "{:<12} {}\n",
        "SALDO BRL:".bold(),
        format_currency(report.value_brl)
    ));
    if let Some(value_usd) = report.value_usd {
        output.push_str(&format!("{:<12} {}\n", "SALDO USD:".bold(), format_usd(value_usd)));
    }
    output.push_str(&format!("{}\n", thin));
    output.push_str(&format!(
        "{:<12} {}\n",
        "Investido:".bold(),
        format_currency(report.summary.total_cost)
    ));
    let result = format!(
        "{} ({})",
        format_currency(report.profit_brl),
        format_percent(report.profit_pct)
    );
    output.push_str(&format!(
        "{:<12} {}\n",
        "Resultado:".bold(),
        colored_amount(report.profit_brl, result)
    ));
    output.push_str(&format!("{}\n", rule));
    output
}

/// Bitcoin vs SELIC comparison screen, with a bar chart of the totals
pub fn format_benchmark_report(report: &BenchmarkReport) -> String {
    #[derive(Tabled)]
    struct MetricRow {
        #[tabled(rename = "Métrica")]
        metric: String,
        #[tabled(rename = "Bitcoin")]
        bitcoin: String,
        #[tabled(rename = "SELIC líquida")]
        selic: String,
    }

    let rows = vec![
        MetricRow {
            metric: "Patrimônio final".to_string(),
            bitcoin: format_currency(report.total_btc_value),
            selic: format_currency(report.total_selic_net),
        },
        MetricRow {
            metric: "Lucro líquido".to_string(),
            bitcoin: colored_amount(report.btc_profit, format_currency(report.btc_profit)),
            selic: colored_amount(report.selic_profit, format_currency(report.selic_profit)),
        },
        MetricRow {
            metric: "Rentabilidade".to_string(),
            bitcoin: format_percent(report.btc_return_pct),
            selic: format_percent(report.selic_return_pct),
        },
    ];

    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "=== BITCOIN vs SELIC ===".bold()));
    output.push_str(&format!(
        "Cotação BTC: {}   (em {})\n",
        format_currency(report.btc_price),
        report.as_of.format("%d/%m/%Y")
    ));

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());
    output.push('\n');

    let line = match report.winner() {
        Winner::Bitcoin => format!("BITCOIN VENCE POR: {}", format_currency(report.margin))
            .green()
            .bold(),
        Winner::Selic => format!("SELIC VENCE POR:   {}", format_currency(report.margin))
            .yellow()
            .bold(),
    };
    output.push_str(&format!("{}\n", line));

    output.push_str(&format!("\n{}\n", "--- Por compra ---".bold()));
    output.push_str(&format_lot_benchmarks(&report.lots));
    output.push('\n');

    output.push_str(&format!("\n{}\n", "--- Patrimônio ---".bold()));
    output.push_str(&format_bar_chart(
        &[
            ("Investido", report.total_invested),
            ("Selic Líq", report.total_selic_net),
            ("Bitcoin", report.total_btc_value),
        ],
        CHART_WIDTH,
    ));
    output
}

/// Per-lot SELIC projection with the IR bracket applied
pub fn format_lot_benchmarks(lots: &[LotBenchmark]) -> String {
    #[derive(Tabled)]
    struct LotBenchmarkRow {
        #[tabled(rename = "Data")]
        date: String,
        #[tabled(rename = "Gasto")]
        cost: String,
        #[tabled(rename = "Bitcoin hoje")]
        btc_value: String,
        #[tabled(rename = "SELIC bruta")]
        gross: String,
        #[tabled(rename = "IR")]
        bracket: String,
        #[tabled(rename = "SELIC líquida")]
        net: String,
    }

    let rows: Vec<LotBenchmarkRow> = lots
        .iter()
        .map(|lot| LotBenchmarkRow {
            date: lot.date.format("%d/%m/%y").to_string(),
            cost: format_currency(lot.cost),
            btc_value: format_currency(lot.btc_value),
            gross: format_currency(lot.gross_value),
            bracket: format!(
                "{} ({})",
                format_percent(lot.tax_rate),
                HoldingBracket::for_days(lot.held_days).label()
            ),
            net: format_currency(lot.net_value),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

/// Horizontal bar chart scaled to the largest value
pub fn format_bar_chart(entries: &[(&str, Decimal)], width: usize) -> String {
    let max = entries
        .iter()
        .map(|(_, v)| *v)
        .fold(Decimal::ZERO, Decimal::max);
    let label_width = entries.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    entries
        .iter()
        .map(|(label, value)| {
            let len = if max > Decimal::ZERO && *value > Decimal::ZERO {
                (*value / max * Decimal::from(width))
                    .round()
                    .to_usize()
                    .unwrap_or(0)
            } else {
                0
            };
            format!(
                "{:<label_width$} │{} {}\n",
                label,
                "█".repeat(len).cyan(),
                format_currency(*value),
                label_width = label_width
            )
        })
        .collect()
}

/// Average-cost calculator result
pub fn format_target_purchase(result: &TargetPurchase) -> String {
    let rule = "=".repeat(40);
    format!(
        "\n{}\nALVO: {}\nComprar: {:.8} BTC ({})\n{}\n",
        rule,
        format_currency(result.target),
        result.btc_needed,
        format_currency(result.investment_needed),
        rule
    )
}

/// Current position shown before asking for the target
pub fn format_position(summary: &LedgerSummary) -> String {
    format!(
        "Atual: {:.8} BTC | Médio: {}",
        sats_to_btc(summary.total_sats),
        format_currency(summary.average_cost())
    )
}

/// Step-by-step instructions for downloading the SELIC series by hand
pub fn format_manual_download(url: &str, target: &Path) -> String {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "selic.csv".to_string());
    let dir = target
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string());
    let rule = "-".repeat(60);

    format!(
        "{}\n   Você pode baixar manualmente.\n\n   1. Copie o link abaixo e cole no seu navegador:\n{}\n{}\n{}\n\n   2. O download do arquivo 'dados.csv' vai começar.\n   3. Renomeie para '{}' e coloque na pasta {}\n   4. Rode este programa novamente.\n",
        "Não foi possível baixar a SELIC automaticamente.".red().bold(),
        rule,
        url,
        rule,
        file_name,
        dir
    )
}
