//! In-memory prompt store mirrored to the prompt file
//!
//! Every mutation is persisted before it returns. If the save fails the
//! mapping is put back exactly as it was and the storage error is returned.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{StorageError, StoreError};
use crate::storage::{PromptMap, Storage};

/// Outcome of [`PromptStore::create`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    New,
    Overwritten,
}

/// Prompt name to body mapping bound to one prompt file
#[derive(Debug)]
pub struct PromptStore {
    storage: Storage,
    prompts: PromptMap,
}

impl PromptStore {
    /// Load the store from an existing prompt file
    pub fn open(storage: Storage) -> Result<Self, StorageError> {
        let prompts = storage.load()?;
        Ok(Self { storage, prompts })
    }

    /// Write an empty prompt file and bind to it
    pub fn initialize(storage: Storage) -> Result<Self, StorageError> {
        storage.reinitialize()?;
        Ok(Self {
            storage,
            prompts: PromptMap::new(),
        })
    }

    pub fn directory(&self) -> &Path {
        self.storage.dir()
    }

    pub fn file_path(&self) -> PathBuf {
        self.storage.file_path()
    }

    /// Prompt names in display order
    pub fn names(&self) -> Vec<String> {
        self.prompts.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.prompts.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prompts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Add a prompt, or replace one when `overwrite` is set
    ///
    /// Name and body are trimmed. An existing name without `overwrite` fails
    /// with [`StoreError::Duplicate`] so the caller can ask before replacing.
    pub fn create(&mut self, name: &str, body: &str, overwrite: bool) -> Result<Created, StoreError> {
        let name = normalize_name(name)?;
        let body = normalize_body(body)?;

        if self.contains(&name) && !overwrite {
            return Err(StoreError::Duplicate(name));
        }

        let previous = self.prompts.insert(name.clone(), body);
        if let Err(e) = self.persist() {
            match previous {
                Some(old_body) => self.prompts.insert(name, old_body),
                None => self.prompts.remove(&name),
            };
            return Err(e);
        }

        let created = if previous.is_some() {
            Created::Overwritten
        } else {
            Created::New
        };
        info!(prompt = %name, outcome = ?created, "Prompt saved");
        Ok(created)
    }

    /// Check a rename without applying it
    ///
    /// Returns the trimmed new name. Renaming to the current name is valid.
    pub fn validate_rename(&self, old: &str, new: &str) -> Result<String, StoreError> {
        if !self.contains(old) {
            return Err(StoreError::NotFound(old.to_string()));
        }
        let new = normalize_name(new)?;
        if new != old && self.contains(&new) {
            return Err(StoreError::Duplicate(new));
        }
        Ok(new)
    }

    /// Move the body of `old` under `new`
    ///
    /// Returns the stored name. Renaming to the same name succeeds without
    /// touching the file.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<String, StoreError> {
        let new = self.validate_rename(old, new)?;
        if new == old {
            return Ok(new);
        }

        let Some(body) = self.prompts.remove(old) else {
            return Err(StoreError::NotFound(old.to_string()));
        };
        self.prompts.insert(new.clone(), body);

        if let Err(e) = self.persist() {
            if let Some(body) = self.prompts.remove(&new) {
                self.prompts.insert(old.to_string(), body);
            }
            return Err(e);
        }

        info!(from = %old, to = %new, "Prompt renamed");
        Ok(new)
    }

    /// Replace the body of an existing prompt
    pub fn update_body(&mut self, name: &str, body: &str) -> Result<(), StoreError> {
        if !self.contains(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let body = normalize_body(body)?;

        let previous = self.prompts.insert(name.to_string(), body);
        if let Err(e) = self.persist() {
            if let Some(old_body) = previous {
                self.prompts.insert(name.to_string(), old_body);
            }
            return Err(e);
        }

        info!(prompt = %name, "Prompt body updated");
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let Some(body) = self.prompts.remove(name) else {
            return Err(StoreError::NotFound(name.to_string()));
        };

        if let Err(e) = self.persist() {
            self.prompts.insert(name.to_string(), body);
            return Err(e);
        }

        info!(prompt = %name, "Prompt deleted");
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.storage.save(&self.prompts).map_err(|e| {
            warn!(error = %e, "Failed to persist prompts, rolling back");
            StoreError::from(e)
        })
    }
}

fn normalize_name(name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(name.to_string())
}

fn normalize_body(body: &str) -> Result<String, StoreError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(StoreError::EmptyBody);
    }
    Ok(body.to_string())
}
