//! Screen controller
//!
//! [`App`] owns the whole application state: the prompt store bound to the
//! chosen directory, the list selection and the active [`Screen`]. Every user
//! action is a method taking the [`Dialogs`] collaborator it may need to ask
//! or tell the user something through. Failures never leave this module; they
//! are shown as a notice and the action is abandoned.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::clipboard::{wrap_system_prompt, ClipboardSink};
use crate::error::{StorageError, StoreError};
use crate::storage::{Storage, PROMPT_FILENAME};
use crate::store::PromptStore;

pub mod dialogs;
pub mod editor;
pub mod input;
pub mod screen;

#[cfg(test)]
mod test_flows;

pub use dialogs::{Dialogs, NameValidator, NoticeLevel};
pub use editor::BodyEditor;
pub use input::TextInput;
pub use screen::{CreateField, CreateForm, ListView, Screen, ViewEditState};

/// Application state shared by every screen
#[derive(Debug)]
pub struct App {
    store: Option<PromptStore>,
    list: ListView,
    screen: Screen,
    suggested_dir: Option<PathBuf>,
}

impl App {
    /// `suggested_dir` pre-fills the directory picker until a directory is chosen
    pub fn new(suggested_dir: Option<PathBuf>) -> Self {
        Self {
            store: None,
            list: ListView::default(),
            screen: Screen::List,
            suggested_dir,
        }
    }

    pub fn store(&self) -> Option<&PromptStore> {
        self.store.as_ref()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView {
        &mut self.list
    }

    pub fn directory(&self) -> Option<&Path> {
        self.store.as_ref().map(PromptStore::directory)
    }

    /// Header text for the list screen
    pub fn directory_label(&self) -> String {
        match self.directory() {
            Some(dir) => format!("Directory: {}   File: {}", dir.display(), PROMPT_FILENAME),
            None => "Directory: None Selected".to_string(),
        }
    }

    /// Name of the prompt open in the view/edit screen
    pub fn current_prompt(&self) -> Option<&str> {
        match &self.screen {
            Screen::ViewEdit(view) => Some(view.name()),
            _ => None,
        }
    }

    /// Stored body of the current prompt
    pub fn current_body(&self) -> Option<&str> {
        let name = self.current_prompt()?;
        self.store.as_ref()?.get(name)
    }

    /// Unsaved input exists on the active screen
    pub fn has_unsaved_changes(&self) -> bool {
        match &self.screen {
            Screen::List => false,
            Screen::Create(form) => !form.is_blank(),
            Screen::ViewEdit(view) => view.has_changes(self.current_body().unwrap_or_default()),
        }
    }

    /// Ask for a directory at startup and load its prompt file
    pub fn start(&mut self, ui: &mut dyn Dialogs) {
        ui.notify(
            NoticeLevel::Info,
            "Setup Required",
            "Please select a directory to store your prompts.",
        );
        if !self.select_directory(ui) {
            ui.notify(
                NoticeLevel::Warning,
                "Warning",
                "No directory selected. Cannot load or save prompts.",
            );
        }
    }

    /// Pick a directory and load it
    ///
    /// Returns false only when the picker was cancelled, which keeps the
    /// current directory. A picked directory may still end up unbound if its
    /// file cannot be loaded and the user declines to create one.
    pub fn select_directory(&mut self, ui: &mut dyn Dialogs) -> bool {
        let suggested = self
            .directory()
            .map(Path::to_path_buf)
            .or_else(|| self.suggested_dir.clone());

        match ui.pick_directory(suggested.as_deref()) {
            Some(dir) => {
                self.load_directory(dir, ui);
                true
            }
            None => {
                ui.notify(NoticeLevel::Info, "Info", "Directory selection cancelled.");
                false
            }
        }
    }

    /// Bind to the prompt file in `dir`, offering to create or replace it when
    /// it cannot be loaded
    pub fn load_directory(&mut self, dir: PathBuf, ui: &mut dyn Dialogs) {
        let storage = Storage::new(dir);
        self.store = None;
        self.screen = Screen::List;

        match PromptStore::open(storage.clone()) {
            Ok(store) => {
                info!(dir = %storage.dir().display(), count = store.len(), "Prompt file loaded");
                self.store = Some(store);
            }
            Err(err) => {
                warn!(dir = %storage.dir().display(), error = %err, "Prompt file could not be loaded");
                let question = Self::explain_load_failure(&err, ui);
                if ui.confirm("Create Prompt File?", &question) {
                    self.initialize_storage(storage, ui);
                } else {
                    ui.notify(
                        NoticeLevel::Info,
                        "Info",
                        "Proceeding without loading or creating a prompt file.",
                    );
                }
            }
        }

        self.refresh_list();
    }

    fn explain_load_failure(err: &StorageError, ui: &mut dyn Dialogs) -> String {
        match err {
            StorageError::NotFound(_) => {
                return format!(
                    "File '{}' not found in the selected directory.\n\nDo you want to create it now?",
                    PROMPT_FILENAME
                )
            }
            StorageError::Shape { .. } => ui.notify(NoticeLevel::Warning, "Warning", &err.to_string()),
            StorageError::Decode { .. } | StorageError::Io { .. } => {
                ui.notify(NoticeLevel::Error, "Error", &err.to_string())
            }
        }
        format!(
            "Could not load prompts from '{0}' in the selected directory.\n\nDo you want to create a new (or overwrite the existing) '{0}' file here?",
            PROMPT_FILENAME
        )
    }

    fn initialize_storage(&mut self, storage: Storage, ui: &mut dyn Dialogs) {
        let dir = storage.dir().display().to_string();
        match PromptStore::initialize(storage) {
            Ok(store) => {
                self.store = Some(store);
                ui.notify(
                    NoticeLevel::Info,
                    "File Created",
                    &format!("New file '{}' created successfully in '{}'.", PROMPT_FILENAME, dir),
                );
            }
            Err(e) => ui.notify(
                NoticeLevel::Error,
                "Creation Failed",
                &format!("Failed to create '{}'. Error: {}", PROMPT_FILENAME, e),
            ),
        }
    }

    /// Re-read the sorted names into the list view
    pub fn refresh_list(&mut self) {
        let names = self.store.as_ref().map(PromptStore::names).unwrap_or_default();
        self.list.refresh(names);
    }

    /// List -> Create
    pub fn new_prompt(&mut self, ui: &mut dyn Dialogs) {
        if self.screen != Screen::List {
            return;
        }
        if self.store.is_none() {
            ui.notify(
                NoticeLevel::Warning,
                "Directory Required",
                "Please select a prompt directory before creating new prompts.",
            );
            self.select_directory(ui);
            if self.store.is_none() {
                return;
            }
        }
        self.screen = Screen::Create(CreateForm::new());
    }

    /// Create -> List after storing the new prompt
    pub fn save_new_prompt(&mut self, ui: &mut dyn Dialogs) {
        let Screen::Create(form) = &self.screen else {
            return;
        };
        let name = form.name.text().to_string();
        let body = form.body.text();

        let Some(store) = self.store.as_mut() else {
            ui.notify(NoticeLevel::Error, "Error", "Cannot save prompt. No directory selected.");
            return;
        };

        let result = match store.create(&name, &body, false) {
            Err(StoreError::Duplicate(existing)) => {
                let question = format!("Prompt name '{}' already exists. Overwrite it?", existing);
                if !ui.confirm("Overwrite Confirmation", &question) {
                    return;
                }
                store.create(&name, &body, true)
            }
            other => other,
        };

        match result {
            Ok(_) => {
                self.screen = Screen::List;
                self.refresh_list();
                self.list.select(name.trim());
            }
            Err(e) => self.report(ui, &e),
        }
    }

    /// Create -> List, discarding the form
    pub fn cancel_create(&mut self, ui: &mut dyn Dialogs) {
        let Screen::Create(form) = &self.screen else {
            return;
        };
        if !form.is_blank()
            && !ui.confirm(
                "Confirmation",
                "Are you sure you want to cancel? Unsaved changes will be lost.",
            )
        {
            return;
        }
        self.screen = Screen::List;
    }

    /// List -> ViewEdit for the selected row
    pub fn open_selected(&mut self, ui: &mut dyn Dialogs) {
        if self.screen != Screen::List {
            return;
        }
        let Some(name) = self.list.selected().map(str::to_string) else {
            ui.notify(
                NoticeLevel::Info,
                "Information",
                "Please select a prompt from the list to view/edit.",
            );
            return;
        };
        self.open_prompt(&name, ui);
    }

    /// List -> ViewEdit for `name`, read-only
    pub fn open_prompt(&mut self, name: &str, ui: &mut dyn Dialogs) {
        match self.store.as_ref().and_then(|store| store.get(name)) {
            Some(body) => {
                self.screen = Screen::ViewEdit(ViewEditState::new(name, body));
            }
            None => {
                ui.notify(
                    NoticeLevel::Error,
                    "Error",
                    &format!("Prompt '{}' not found or directory not loaded.", name),
                );
                self.refresh_list();
            }
        }
    }

    /// Switch the body between read-only and editable
    ///
    /// Leaving edit mode this way throws the draft away and shows the stored
    /// body again, after confirmation if the draft was changed.
    pub fn toggle_edit(&mut self, ui: &mut dyn Dialogs) {
        if self.current_prompt().is_none() {
            return;
        }
        let Some(stored) = self.current_body().map(str::to_string) else {
            self.lost_current_prompt(ui);
            return;
        };
        let Screen::ViewEdit(view) = &mut self.screen else {
            return;
        };

        if !view.editing() {
            view.begin_edit();
            return;
        }
        if view.has_changes(&stored)
            && !ui.confirm("Confirmation", "Discard your unsaved changes to the body?")
        {
            return;
        }
        view.end_edit(&stored);
    }

    /// Persist the draft body and go back to read-only
    pub fn save_body(&mut self, ui: &mut dyn Dialogs) {
        let Screen::ViewEdit(view) = &self.screen else {
            return;
        };
        if !view.editing() {
            return;
        }
        let name = view.name().to_string();
        let draft = view.body().text();

        let Some(store) = self.store.as_mut() else {
            ui.notify(NoticeLevel::Error, "Error", "Cannot save changes. No directory selected.");
            return;
        };

        match store.update_body(&name, &draft) {
            Ok(()) => {
                let stored = store.get(&name).unwrap_or_default().to_string();
                if let Screen::ViewEdit(view) = &mut self.screen {
                    view.end_edit(&stored);
                }
                ui.notify(
                    NoticeLevel::Info,
                    "Success",
                    &format!("Prompt '{}' body updated.", name),
                );
            }
            Err(e) => self.report(ui, &e),
        }
    }

    /// ViewEdit -> List
    pub fn return_to_list(&mut self, ui: &mut dyn Dialogs) {
        let Screen::ViewEdit(view) = &self.screen else {
            return;
        };
        if view.has_changes(self.current_body().unwrap_or_default())
            && !ui.confirm(
                "Confirmation",
                "You have unsaved changes to the body. Return to list and discard changes?",
            )
        {
            return;
        }

        let name = view.name().to_string();
        self.screen = Screen::List;
        self.refresh_list();
        self.list.select(&name);
    }

    /// Rename the current prompt through the rename dialog
    pub fn rename_current(&mut self, ui: &mut dyn Dialogs) {
        let Screen::ViewEdit(view) = &self.screen else {
            return;
        };
        if view.editing() {
            ui.notify(
                NoticeLevel::Info,
                "Info",
                "Please save or cancel body edits before renaming.",
            );
            return;
        }
        let old = view.name().to_string();

        let Some(store) = self.store.as_mut() else {
            ui.notify(NoticeLevel::Error, "Error", "Cannot rename prompt. No directory selected.");
            return;
        };
        if !store.contains(&old) {
            self.lost_current_prompt(ui);
            return;
        }

        let answer = {
            let store = &*store;
            let validate = |candidate: &str| store.validate_rename(&old, candidate);
            ui.ask_new_name(&old, &validate)
        };
        let Some(new) = answer else {
            return;
        };
        if new == old {
            return;
        }

        match store.rename(&old, &new) {
            Ok(new) => {
                let was_selected = self.list.selected() == Some(old.as_str());
                if let Screen::ViewEdit(view) = &mut self.screen {
                    view.set_name(new.clone());
                }
                self.refresh_list();
                if was_selected {
                    self.list.select(&new);
                }
                ui.notify(
                    NoticeLevel::Info,
                    "Success",
                    &format!("Prompt renamed to '{}'.", new),
                );
            }
            Err(e) => self.report(ui, &e),
        }
    }

    /// Copy the current prompt, wrapped as a system prompt
    pub fn copy_current(&mut self, ui: &mut dyn Dialogs, clipboard: &mut dyn ClipboardSink) {
        if let Screen::ViewEdit(view) = &self.screen {
            if view.editing() {
                ui.notify(
                    NoticeLevel::Info,
                    "Info",
                    "Please save or cancel body edits before copying.",
                );
                return;
            }
        }
        let Some(body) = self.current_body() else {
            ui.notify(NoticeLevel::Error, "Error", "No prompt selected or prompt not found.");
            return;
        };

        match clipboard.set_text(&wrap_system_prompt(body)) {
            Ok(()) => ui.notify(NoticeLevel::Info, "Copied", "Prompt copied to clipboard!"),
            Err(e) => {
                warn!(error = %e, "Clipboard copy failed");
                ui.notify(NoticeLevel::Error, "Clipboard Error", &e.to_string())
            }
        }
    }

    /// Delete the selected row after confirmation
    pub fn delete_selected(&mut self, ui: &mut dyn Dialogs) {
        if self.screen != Screen::List {
            return;
        }
        let Some(name) = self.list.selected().map(str::to_string) else {
            ui.notify(
                NoticeLevel::Info,
                "Information",
                "Please select a prompt from the list to delete.",
            );
            return;
        };

        let Some(store) = self.store.as_mut() else {
            ui.notify(NoticeLevel::Error, "Error", "Cannot delete prompt. No directory selected.");
            return;
        };
        if !store.contains(&name) {
            ui.notify(
                NoticeLevel::Error,
                "Error",
                "Cannot delete - prompt no longer exists or selection changed.",
            );
            self.refresh_list();
            return;
        }
        if !ui.confirm(
            "Confirmation",
            &format!("Are you sure you want to delete the prompt '{}'?", name),
        ) {
            return;
        }

        match store.delete(&name) {
            Ok(()) => {
                self.refresh_list();
                ui.notify(NoticeLevel::Info, "Deleted", &format!("Deleted '{}'.", name));
            }
            Err(e) => self.report(ui, &e),
        }
    }

    /// Ask before quitting over unsaved input
    pub fn confirm_quit(&self, ui: &mut dyn Dialogs) -> bool {
        !self.has_unsaved_changes()
            || ui.confirm("Quit", "You have unsaved changes. Quit and discard them?")
    }

    /// The current prompt vanished from the store; fall back to the list
    fn lost_current_prompt(&mut self, ui: &mut dyn Dialogs) {
        ui.notify(NoticeLevel::Error, "Error", "The current prompt no longer exists.");
        self.screen = Screen::List;
        self.refresh_list();
    }

    fn report(&self, ui: &mut dyn Dialogs, err: &StoreError) {
        warn!(error = %err, "Prompt operation failed");
        ui.notify(NoticeLevel::Error, err.title(), &err.to_string());
    }
}
