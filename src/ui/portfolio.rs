//! Portfolio management menu: add, history & average cost, profit report,
//! delete.

use anyhow::Result;
use colored::Colorize;

use super::input::{pause, read_date, read_index_once, read_money, read_sats};
use super::readline::Prompt;
use super::screen::clear_screen;
use super::{ask_price, print_error, today, App};
use crate::cli::formatters::{
    format_empty_ledger, format_ledger_summary, format_lot_added, format_lot_table,
    format_profit_report,
};
use crate::ledger::{LedgerSummary, Lot};
use crate::reports::calculate_profit;

const BACK: &str = "\nEnter para voltar...";

pub fn run_menu(app: &App, prompt: &mut dyn Prompt) {
    loop {
        clear_screen();
        println!("{}", "Gerenciador de Portfólio BTC".bold());
        println!("1. Adicionar Compra");
        println!("2. Histórico & Preço Médio");
        println!("3. Relatório Lucro");
        println!("4. Excluir Registro");
        println!("5. Sair");

        let Some(choice) = prompt.read_line("\nOpção: ") else {
            break;
        };
        let result = match choice.trim() {
            "1" => add_purchase(app, prompt),
            "2" => show_history(app, prompt),
            "3" => profit_report(app, prompt),
            "4" => delete_purchase(app, prompt),
            "5" => break,
            _ => Ok(()),
        };
        if let Err(e) = result {
            print_error(&e);
            pause(prompt, BACK);
        }
    }
}

fn add_purchase(app: &App, prompt: &mut dyn Prompt) -> Result<()> {
    println!("\n--- Nova Compra ---");
    let Some(date) = read_date(prompt, "Data (DD MM AAAA) [Enter=Hoje]: ", today()) else {
        return Ok(());
    };
    let Some(sats) = read_sats(prompt, "Quantidade em SATS (ex: 50.000): ") else {
        return Ok(());
    };
    println!("\nDigite o valor GASTO (use vírgula para centavos!)");
    let Some(cost) = read_money(prompt, "Valor em Reais (R$): ") else {
        return Ok(());
    };

    let lot = Lot::new(date, sats, cost);
    app.ledger.add(lot.clone())?;
    print!("{}", format_lot_added(&lot));
    pause(prompt, BACK);
    Ok(())
}

/// Print the history table and totals; returns the totals.
fn print_history(app: &App) -> Result<LedgerSummary> {
    let lots = app.ledger.load();
    if lots.is_empty() {
        print!("{}", format_empty_ledger());
        return LedgerSummary::from_lots(&lots);
    }
    println!("\n{}", format_lot_table(&lots));
    let summary = LedgerSummary::from_lots(&lots)?;
    print!("{}", format_ledger_summary(&summary));
    Ok(summary)
}

fn show_history(app: &App, prompt: &mut dyn Prompt) -> Result<()> {
    print_history(app)?;
    pause(prompt, BACK);
    Ok(())
}

fn profit_report(app: &App, prompt: &mut dyn Prompt) -> Result<()> {
    let summary = print_history(app)?;
    if summary.is_empty() {
        pause(prompt, BACK);
        return Ok(());
    }

    println!("\n--- Cotação Atual ---");
    println!("[1] Online (CoinGecko) | [2] Manual");
    let Some(choice) = prompt.read_line("Opção: ") else {
        return Ok(());
    };

    let online = if choice.trim() == "1" {
        app.fetch_price()
    } else {
        None
    };
    let price = match online {
        Some(price) if price.usd.is_some() => price,
        _ => match ask_price(prompt, true) {
            Some(price) => price,
            None => return Ok(()),
        },
    };

    let report = calculate_profit(&summary, price)?;
    print!("{}", format_profit_report(&report));
    pause(prompt, BACK);
    Ok(())
}

fn delete_purchase(app: &App, prompt: &mut dyn Prompt) -> Result<()> {
    let lots = app.ledger.load();
    if lots.is_empty() {
        print!("{}", format_empty_ledger());
        pause(prompt, BACK);
        return Ok(());
    }
    println!("\n{}", format_lot_table(&lots));

    let Some(position) = read_index_once(prompt, "\nID para excluir (0 cancela): ") else {
        return Ok(());
    };
    if let Some(removed) = app.ledger.remove(position)? {
        println!(
            "{} Removido: {} ({} sats)",
            "✓".green().bold(),
            removed.date.format("%d/%m/%Y"),
            removed.sats
        );
        pause(prompt, BACK);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::StubFetcher;
    use crate::rates::{RateLoader, DEFAULT_SERIES_URL};
    use crate::ledger::LedgerStore;
    use crate::ui::readline::ScriptedPrompt;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn app(dir: &TempDir, price_body: Option<&str>) -> App {
        App::new(
            LedgerStore::new(dir.path().join("carteira.json")),
            RateLoader::new(dir.path().join("selic.csv"), DEFAULT_SERIES_URL, None),
            price_body.map(|b| Box::new(StubFetcher::ok(b)) as Box<dyn crate::http::TextFetcher>),
            "http://price",
        )
    }

    #[test]
    fn test_add_then_delete_through_menu() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, None);
        let mut prompt = ScriptedPrompt::new([
            "1", "05 03 2024", "50.000", "150,00", "", // add
            "1", "01 01 2024", "10.000", "50", "", // add an older one
            "4", "1", "", // delete the 2024-01-01 lot
            "5",
        ]);
        run_menu(&app, &mut prompt);

        let lots = app.ledger.load();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(lots[0].cost, dec!(150));
    }

    #[test]
    fn test_delete_out_of_range_keeps_ledger() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, None);
        app.ledger
            .add(Lot::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1000, dec!(1)))
            .unwrap();
        let mut prompt = ScriptedPrompt::new(["4", "7", "4", "0", "4", "abc", "5"]);
        run_menu(&app, &mut prompt);
        assert_eq!(app.ledger.load().len(), 1);
    }

    #[test]
    fn test_profit_report_online_then_exit() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, Some(r#"{"bitcoin":{"brl":300000,"usd":60000}}"#));
        app.ledger
            .add(Lot::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 100_000, dec!(200)))
            .unwrap();
        let mut prompt = ScriptedPrompt::new(["3", "1", "", "5"]);
        run_menu(&app, &mut prompt);
        // no manual price prompt was needed
        assert!(!prompt.prompts.iter().any(|p| p.contains("Cotação R$")));
    }

    #[test]
    fn test_profit_report_falls_back_to_manual_price() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, Some("not json"));
        app.ledger
            .add(Lot::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 100_000, dec!(200)))
            .unwrap();
        let mut prompt = ScriptedPrompt::new(["3", "1", "300.000", "60.000", "", "5"]);
        run_menu(&app, &mut prompt);
        assert!(prompt.prompts.iter().any(|p| p.contains("Cotação R$")));
        assert!(prompt.prompts.iter().any(|p| p.contains("Cotação USD")));
    }

    #[test]
    fn test_history_overflow_returns_to_menu() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, None);
        for day in [1, 2] {
            app.ledger
                .add(Lot::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), i64::MAX, dec!(1)))
                .unwrap();
        }
        let mut prompt = ScriptedPrompt::new(["2", "", "3", "", "5"]);
        run_menu(&app, &mut prompt);
        // both reports fail, pause, and the menu is shown again
        assert_eq!(prompt.prompts.iter().filter(|p| p.contains("Enter para voltar")).count(), 2);
        assert_eq!(prompt.prompts.last().map(String::as_str), Some("\nOpção: "));
    }

    #[test]
    fn test_eof_leaves_menu() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, None);
        let mut prompt = ScriptedPrompt::new(["1", "05 03 2024"]);
        run_menu(&app, &mut prompt);
        assert!(app.ledger.load().is_empty());
    }
}
