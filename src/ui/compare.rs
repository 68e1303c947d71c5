//! Analysis menu: Bitcoin vs SELIC and the average-cost calculator.

use colored::Colorize;
use tracing::debug;

use super::input::{pause, read_decimal_once};
use super::readline::Prompt;
use super::screen::{clear_screen, Activity};
use super::{ask_price, print_error, today, App};
use crate::cli::formatters::{
    format_benchmark_report, format_empty_ledger, format_manual_download, format_position,
    format_target_purchase,
};
use crate::ledger::LedgerSummary;
use crate::rates::RateOutcome;
use crate::reports::{compare_with_selic, solve_target_average};

const BACK: &str = "\nEnter para voltar...";

pub fn run_menu(app: &App, prompt: &mut dyn Prompt) {
    loop {
        clear_screen();
        println!("{}", "Ferramentas de Análise BTC".bold());
        println!("1. Bitcoin vs Selic");
        println!("2. Calculadora de Preço Médio");
        println!("3. Sair");

        let Some(choice) = prompt.read_line("\nOpção: ") else {
            break;
        };
        match choice.trim() {
            "1" => compare_selic(app, prompt),
            "2" => average_cost_calculator(app, prompt),
            "3" => break,
            _ => {}
        }
    }
}

fn compare_selic(app: &App, prompt: &mut dyn Prompt) {
    let lots = app.ledger.load();
    if lots.is_empty() {
        print!("{}", format_empty_ledger());
        pause(prompt, BACK);
        return;
    }

    let price = match app.fetch_price() {
        Some(price) => price,
        None => {
            if app.is_online() {
                println!("Falha na conexão. Digite manualmente.");
            }
            match ask_price(prompt, false) {
                Some(price) => price,
                None => return,
            }
        }
    };

    let today = today();
    let first_purchase = lots.first().map(|lot| lot.date);
    let activity = Activity::start("Carregando histórico da SELIC...");
    let outcome = app
        .rates
        .load(first_purchase, today, |event| activity.report(event));
    activity.finish();

    match outcome {
        RateOutcome::NeedsManualDownload { url, target } => {
            print!("{}", format_manual_download(&url, &target));
            pause(prompt, "\nEnter para sair...");
        }
        RateOutcome::Loaded { table, source } => {
            debug!("Comparing {} lots against {:?} SELIC table", lots.len(), source);
            match compare_with_selic(&lots, &table, price.brl, today) {
                Ok(report) => print!("{}", format_benchmark_report(&report)),
                Err(e) => print_error(&e),
            }
            pause(prompt, BACK);
        }
    }
}

fn average_cost_calculator(app: &App, prompt: &mut dyn Prompt) {
    let summary = match LedgerSummary::from_lots(&app.ledger.load()) {
        Ok(summary) => summary,
        Err(e) => {
            print_error(&e);
            pause(prompt, BACK);
            return;
        }
    };
    if summary.is_empty() {
        print!("{}", format_empty_ledger());
        pause(prompt, BACK);
        return;
    }

    println!("\n{}", format_position(&summary));
    let Some(price) = read_decimal_once(prompt, "Cotação AGORA? R$ ") else {
        return;
    };
    let Some(target) = read_decimal_once(prompt, "Alvo de Médio? R$ ") else {
        return;
    };

    match solve_target_average(&summary, price, target) {
        Ok(result) => print!("{}", format_target_purchase(&result)),
        Err(e) => println!("{} Impossível: {}", "✗".red().bold(), e),
    }
    pause(prompt, BACK);
}
