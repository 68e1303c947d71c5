//! Prompt loops for the values typed into the menus.
//!
//! Every helper returns `None` once input is closed so the menus can unwind.

use chrono::NaiveDate;
use colored::Colorize;
use rust_decimal::Decimal;

use super::readline::Prompt;
use crate::utils::{parse_date_input, parse_decimal_br, parse_sats};

fn invalid(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}

/// Purchase date; empty input means `today`. Re-prompts on invalid dates.
pub fn read_date(prompt: &mut dyn Prompt, message: &str, today: NaiveDate) -> Option<NaiveDate> {
    loop {
        let line = prompt.read_line(message)?;
        match parse_date_input(&line, today) {
            Ok(date) => return Some(date),
            Err(_) => invalid("Data inválida."),
        }
    }
}

/// Sats quantity; re-prompts until a positive integer is typed.
pub fn read_sats(prompt: &mut dyn Prompt, message: &str) -> Option<i64> {
    loop {
        let line = prompt.read_line(message)?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_sats(&line) {
            Ok(sats) => return Some(sats),
            Err(e) => invalid(&e.to_string()),
        }
    }
}

/// Monetary amount in Brazilian format; re-prompts until valid.
pub fn read_money(prompt: &mut dyn Prompt, message: &str) -> Option<Decimal> {
    loop {
        let line = prompt.read_line(message)?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_decimal_br(&line) {
            Ok(value) => return Some(value),
            Err(_) => invalid("Valor inválido."),
        }
    }
}

/// Single-shot numeric field: anything invalid aborts the operation.
pub fn read_decimal_once(prompt: &mut dyn Prompt, message: &str) -> Option<Decimal> {
    let line = prompt.read_line(message)?;
    parse_decimal_br(&line).ok()
}

/// Single-shot positive index; invalid input aborts the operation.
pub fn read_index_once(prompt: &mut dyn Prompt, message: &str) -> Option<usize> {
    let line = prompt.read_line(message)?;
    line.trim().parse().ok()
}

/// Wait for Enter. Returns `false` when input is closed.
pub fn pause(prompt: &mut dyn Prompt, message: &str) -> bool {
    prompt.read_line(message).is_some()
}
