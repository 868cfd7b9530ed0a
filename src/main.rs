use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;

use promptshelf::tui::PromptTui;
use promptshelf::{init_logging, App, Cli, Clipboard, LogConfig};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Load environment variables from .env file; a missing file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The terminal belongs to the UI, so logging stays off unless asked for
    if LogConfig::requested() {
        init_logging(LogConfig::from_env())?;
    }

    if !std::io::stdout().is_terminal() || !std::io::stdin().is_terminal() {
        bail!("pshelf needs an interactive terminal");
    }

    tracing::info!(suggested_dir = ?cli.dir, "Starting promptshelf");
    PromptTui::new(App::new(cli.dir), Clipboard::new()).run()
}
