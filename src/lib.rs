//! promptshelf - a terminal manager for named prompts
//!
//! Prompts are short named texts kept in a single `promptData.json` file
//! inside a directory chosen at startup. The crate is layered so everything
//! below the terminal front end can be driven and tested without a terminal.
//!
//! # Quick Start
//!
//! ```no_run
//! use promptshelf::{PromptStore, Storage};
//!
//! let mut store = PromptStore::open(Storage::new("/tmp/prompts"))?;
//! store.create("Greeting", "Hello there", false)?;
//! assert_eq!(store.names(), vec!["Greeting".to_string()]);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`storage`]: reading and atomically rewriting the prompt file
//! - [`store`]: the in-memory prompt mapping, validated and persisted per change
//! - [`app`]: the screen controller and the dialogs it needs from a front end
//! - [`clipboard`]: system clipboard access and the system-prompt wrapper
//! - [`logging`]: opt-in structured logging
//! - [`tui`]: the full-screen terminal front end (feature-gated)

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod error;
pub mod logging;
pub mod storage;
pub mod store;

#[cfg(feature = "tui")]
pub mod tui;

pub use app::{App, Dialogs, NoticeLevel, Screen};
pub use cli::Cli;
pub use clipboard::{wrap_system_prompt, Clipboard, ClipboardSink};
pub use error::{StorageError, StoreError};
pub use logging::{init_logging, log_storage_operation, LogConfig};
pub use storage::{PromptMap, Storage, PROMPT_FILENAME};
pub use store::{Created, PromptStore};
