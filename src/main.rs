use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use satstack::cli::{Cli, Commands};
use satstack::config::Config;
use satstack::ui::{self, readline::Readline, screen::is_interactive, App, Menu};

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the menus
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color || !is_interactive() {
        colored::control::set_override(false);
    }

    let config = Config::load(&cli.overrides())?;
    debug!("Resolved configuration: {:?}", config);

    let app = App::from_config(&config)?;
    let mut prompt = Readline::new()?;

    let menu = match cli.mode() {
        Commands::Portfolio => Menu::Portfolio,
        Commands::Compare => Menu::Compare,
    };
    ui::run(menu, &app, &mut prompt);

    Ok(())
}
