//! Terminal helpers: screen clearing and the network spinner.

use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{stdout, IsTerminal};
use std::time::Duration;

use super::progress::ProgressEvent;

/// Whether stdout is an interactive terminal.
pub fn is_interactive() -> bool {
    stdout().is_terminal()
}

/// Clear the screen when attached to a terminal; a no-op when piped.
pub fn clear_screen() {
    if !is_interactive() {
        return;
    }
    let _ = execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0));
}

/// Spinner shown while a blocking request runs. Hidden when not on a terminal.
pub struct Activity {
    bar: ProgressBar,
}

impl Activity {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = if is_interactive() {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        let message = message.into();
        if bar.is_hidden() {
            println!("{}", message);
        }
        bar.set_message(message);
        Self { bar }
    }

    /// Render a progress event: persistent lines are printed above the
    /// spinner, transient ones replace its message.
    pub fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Line {
                text,
                persist: false,
            } => {
                if self.bar.is_hidden() {
                    println!("{}", text);
                }
                self.bar.set_message(text);
            }
            ProgressEvent::Line {
                text,
                persist: true,
            } => self.println(format!("   ✓ {}", text)),
            ProgressEvent::Warning { text } => self.println(format!("   ⚠ {}", text)),
        }
    }

    fn println(&self, line: String) {
        if self.bar.is_hidden() {
            println!("{}", line);
        } else {
            self.bar.println(line);
        }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
