//! Modal interactions the controller needs from its front end
//!
//! Every call blocks until the user answers. The terminal front end runs a
//! nested draw/read loop for each of them; tests script the answers.

use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Checks a proposed name and returns it in stored form
pub type NameValidator<'a> = dyn Fn(&str) -> Result<String, StoreError> + 'a;

pub trait Dialogs {
    /// Ask a yes/no question. Only an explicit yes returns true.
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    /// Tell the user something. Returns once acknowledged.
    fn notify(&mut self, level: NoticeLevel, title: &str, message: &str);

    /// Ask for the prompt directory. `None` means the user cancelled.
    fn pick_directory(&mut self, suggested: Option<&Path>) -> Option<PathBuf>;

    /// Ask for a new name for `current`
    ///
    /// The dialog stays open until `validate` accepts the input or the user
    /// cancels, and returns the validated name.
    fn ask_new_name(&mut self, current: &str, validate: &NameValidator<'_>) -> Option<String>;
}
