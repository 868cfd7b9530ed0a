//! Screen states and the prompt list selection

use super::editor::BodyEditor;
use super::input::TextInput;

/// The active screen. Exactly one is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    Create(CreateForm),
    ViewEdit(ViewEditState),
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::List => "Saved Prompts",
            Screen::Create(_) => "Create New Prompt",
            Screen::ViewEdit(_) => "View / Edit Prompt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateField {
    Name,
    Body,
}

/// Fields of the create screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub name: TextInput,
    pub body: BodyEditor,
    pub focus: CreateField,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateForm {
    pub fn new() -> Self {
        let mut body = BodyEditor::new();
        body.set_active(false);
        Self {
            name: TextInput::new(),
            body,
            focus: CreateField::Name,
        }
    }

    /// Nothing worth keeping has been typed
    pub fn is_blank(&self) -> bool {
        self.name.is_blank() && self.body.is_blank()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            CreateField::Name => CreateField::Body,
            CreateField::Body => CreateField::Name,
        };
        self.body.set_active(self.focus == CreateField::Body);
    }
}

/// The view/edit screen for one prompt
///
/// Holds the prompt by name only. The stored body is looked up again whenever
/// it is needed, so a rename or delete can never leave a stale copy behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEditState {
    name: String,
    body: BodyEditor,
    editing: bool,
    pub scroll: u16,
}

impl ViewEditState {
    pub fn new(name: impl Into<String>, stored_body: &str) -> Self {
        Self {
            name: name.into(),
            body: BodyEditor::with_text(stored_body),
            editing: false,
            scroll: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Text shown in the body field, the draft while editing
    pub fn body(&self) -> &BodyEditor {
        &self.body
    }

    /// Body editor, only handed out while editing
    pub fn body_mut(&mut self) -> Option<&mut BodyEditor> {
        self.editing.then_some(&mut self.body)
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    /// The draft differs from what is stored
    pub fn has_changes(&self, stored_body: &str) -> bool {
        self.editing && self.body.text().trim() != stored_body
    }

    pub(crate) fn begin_edit(&mut self) {
        self.editing = true;
    }

    /// Leave edit mode showing `stored_body`
    pub(crate) fn end_edit(&mut self, stored_body: &str) {
        self.body.set_text(stored_body);
        self.editing = false;
    }
}

/// Sorted prompt names plus the highlighted row
///
/// The selection is kept by name and dropped by any refresh that no longer
/// contains it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    names: Vec<String>,
    selected: Option<String>,
}

impl ListView {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.names.iter().position(|n| n == selected)
    }

    /// View/Edit and Delete are only offered with a selection
    pub fn actions_enabled(&self) -> bool {
        self.selected.is_some()
    }

    pub fn refresh(&mut self, names: Vec<String>) {
        self.names = names;
        if let Some(selected) = &self.selected {
            if !self.names.contains(selected) {
                self.selected = None;
            }
        }
    }

    /// Select `name` if it is listed
    pub fn select(&mut self, name: &str) {
        if self.names.iter().any(|n| n == name) {
            self.selected = Some(name.to_string());
        }
    }

    pub fn select_index(&mut self, index: usize) {
        if let Some(name) = self.names.get(index) {
            self.selected = Some(name.clone());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn select_next(&mut self) {
        let next = match self.selected_index() {
            Some(i) => (i + 1).min(self.names.len().saturating_sub(1)),
            None => 0,
        };
        self.select_index(next);
    }

    pub fn select_previous(&mut self) {
        let previous = match self.selected_index() {
            Some(i) => i.saturating_sub(1),
            None => self.names.len().saturating_sub(1),
        };
        self.select_index(previous);
    }

    pub fn select_first(&mut self) {
        self.select_index(0);
    }

    pub fn select_last(&mut self) {
        if !self.names.is_empty() {
            self.select_index(self.names.len() - 1);
        }
    }
}
