//! Multi-line body editor backed by `tui-textarea`

use ratatui::style::{Modifier, Style};
use tui_textarea::{CursorMove, TextArea};

/// Prompt body being typed or edited
///
/// Two editors compare equal when they hold the same lines; cursor and
/// viewport are not part of the value.
#[derive(Debug, Clone)]
pub struct BodyEditor {
    area: TextArea<'static>,
    active: bool,
}

impl Default for BodyEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BodyEditor {
    fn eq(&self, other: &Self) -> bool {
        self.area.lines() == other.area.lines()
    }
}

impl Eq for BodyEditor {}

impl BodyEditor {
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Editor holding `text` with the cursor after its last char
    pub fn with_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }

        let mut area = TextArea::new(lines);
        area.set_cursor_line_style(Style::default());
        area.move_cursor(CursorMove::Bottom);
        area.move_cursor(CursorMove::End);

        let mut editor = Self { area, active: true };
        editor.set_active(true);
        editor
    }

    /// Lines joined with `\n`
    pub fn text(&self) -> String {
        self.area.lines().join("\n")
    }

    pub fn set_text(&mut self, text: &str) {
        let active = self.active;
        *self = Self::with_text(text);
        self.set_active(active);
    }

    /// Insert at the cursor; pasted text may span lines
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.area.insert_str(normalized);
    }

    /// True if every line is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.area.lines().iter().all(|line| line.trim().is_empty())
    }

    /// Only the focused editor shows its cursor
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        let style = if active {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.area.set_cursor_style(style);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.area
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.area
    }
}
