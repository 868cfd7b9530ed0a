//! Command-line interface definitions and parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pshelf")]
#[command(version)]
#[command(about = "promptshelf - create, view, edit and copy your saved prompts")]
#[command(after_help = "Prompts live in <DIR>/promptData.json. The directory is asked for on \
every start; --dir only pre-fills the answer.

Set PROMPTSHELF_LOG_LEVEL (and optionally PROMPTSHELF_LOG_DIR) to write a log.")]
pub struct Cli {
    /// Directory suggested when asked where the prompts are kept
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}
