//! Line input: the `Prompt` seam and its rustyline implementation.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tracing::warn;

/// Source of user input lines.
pub trait Prompt {
    /// Show `prompt` and read one line. `None` means input is closed
    /// (EOF) and the caller should go back to / leave the menu.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Thin wrapper over `rustyline::Editor`.
pub struct Readline {
    editor: Editor<(), DefaultHistory>,
}

impl Readline {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::builder().auto_add_history(false).build();
        let editor = Editor::with_config(config)?;
        Ok(Self { editor })
    }
}

impl Prompt for Readline {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Some(line),
                // Ctrl+C re-prompts
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => return None,
                Err(err) => {
                    warn!("readline failed: {}", err);
                    return None;
                }
            }
        }
    }
}

/// Replays a fixed list of answers and records the prompts shown.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub prompts: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompt_replays_then_closes() {
        let mut prompt = ScriptedPrompt::new(["1", "abc"]);
        assert_eq!(prompt.read_line("Opção: "), Some("1".to_string()));
        assert_eq!(prompt.read_line("Valor: "), Some("abc".to_string()));
        assert_eq!(prompt.read_line("Valor: "), None);
        assert_eq!(prompt.prompts, vec!["Opção: ", "Valor: ", "Valor: "]);
    }
}
