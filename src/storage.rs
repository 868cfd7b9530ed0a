//! Storage layer for the prompt file
//!
//! Every prompt lives in a single JSON object at `<directory>/promptData.json`,
//! prompt name to prompt body. Saves always rewrite the whole file; there are
//! no partial or append writes.

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StorageError;
use crate::logging::log_storage_operation;

/// Prompt name to prompt body, iterated in name order.
pub type PromptMap = BTreeMap<String, String>;

/// File name of the prompt dictionary inside the chosen directory
pub const PROMPT_FILENAME: &str = "promptData.json";

/// Accessor for the prompt file of one directory
///
/// The directory is chosen by the user for the lifetime of the process and is
/// never written anywhere by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the prompt file
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of `promptData.json`
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(PROMPT_FILENAME)
    }

    /// Load the prompt dictionary
    ///
    /// # Errors
    ///
    /// * [`StorageError::NotFound`] if the file does not exist
    /// * [`StorageError::Decode`] if it is not valid JSON
    /// * [`StorageError::Shape`] if it is not an object of strings
    /// * [`StorageError::Io`] for any other read failure
    pub fn load(&self) -> Result<PromptMap, StorageError> {
        let start = Instant::now();
        let result = self.read_map();
        log_storage_operation("load", None, result.is_ok(), Some(elapsed_ms(start)));
        result
    }

    /// Replace the file contents with `prompts`
    ///
    /// Creates the directory if needed. The new contents are written to a
    /// temporary file next to the target and renamed over it, so a failed save
    /// leaves the previous file intact.
    pub fn save(&self, prompts: &PromptMap) -> Result<(), StorageError> {
        let start = Instant::now();
        let result = self.write_map(prompts);
        log_storage_operation("save", None, result.is_ok(), Some(elapsed_ms(start)));
        result
    }

    /// Write an empty dictionary, discarding whatever the file held
    pub fn reinitialize(&self) -> Result<(), StorageError> {
        self.save(&PromptMap::new())
    }

    fn read_map(&self) -> Result<PromptMap, StorageError> {
        let path = self.file_path();
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path))
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };

        let prompts = parse_prompt_map(&raw, &path)?;
        debug!(path = %path.display(), count = prompts.len(), "Loaded prompt file");
        Ok(prompts)
    }

    fn write_map(&self, prompts: &PromptMap) -> Result<(), StorageError> {
        let path = self.file_path();
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        // Replace the file a symlink points at, not the link itself
        let target = match fs::canonicalize(&path) {
            Ok(real) => real,
            Err(e) if e.kind() == io::ErrorKind::NotFound => path.clone(),
            Err(e) => return Err(StorageError::io(&path, e)),
        };
        let target_dir = target.parent().unwrap_or(&self.dir);

        let contents = to_pretty_json(prompts).map_err(|e| StorageError::io(&path, e))?;
        let mut temp_file =
            NamedTempFile::new_in(target_dir).map_err(|e| StorageError::io(&path, e))?;
        if let Ok(existing) = fs::metadata(&target) {
            temp_file
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| StorageError::io(&path, e))?;
        }
        temp_file
            .write_all(&contents)
            .and_then(|_| temp_file.as_file().sync_all())
            .map_err(|e| StorageError::io(&path, e))?;
        temp_file
            .persist(&target)
            .map_err(|e| StorageError::io(&path, e.error))?;

        debug!(path = %path.display(), count = prompts.len(), "Saved prompt file");
        Ok(())
    }
}

/// Decode file contents into a prompt dictionary
fn parse_prompt_map(raw: &[u8], path: &Path) -> Result<PromptMap, StorageError> {
    let value: Value = serde_json::from_slice(raw).map_err(|source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            return Err(StorageError::Shape {
                path: path.to_path_buf(),
                found: describe(&other).to_string(),
            })
        }
    };

    entries
        .into_iter()
        .map(|(name, body)| match body {
            Value::String(body) => Ok((name, body)),
            other => Err(StorageError::Shape {
                path: path.to_path_buf(),
                found: format!("{} for prompt '{}'", describe(&other), name),
            }),
        })
        .collect()
}

/// Four-space indented JSON with a trailing newline
fn to_pretty_json(prompts: &PromptMap) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    prompts.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
