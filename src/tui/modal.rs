//! Blocking dialogs drawn over the last rendered frame
//!
//! Each dialog runs its own draw/read loop until the user answers, then hands
//! control back to the action that asked. The screen underneath is frozen
//! as the buffer captured after the last full draw.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, buffer::Buffer, layout::Rect, Frame, Terminal};
use std::{
    io,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, warn};

use super::render;
use crate::app::{Dialogs, NameValidator, NoticeLevel, TextInput};

/// Something typed while a dialog or screen has focus
pub(super) enum Input {
    Key(KeyEvent),
    Paste(String),
}

/// Key presses and pastes; `None` for events that only need a redraw
pub(super) fn input_from(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Input::Key(key)),
        Event::Paste(text) => Some(Input::Paste(text)),
        _ => None,
    }
}

/// Wait for the next key press or paste
///
/// `None` means some other event arrived (resize, focus, mouse) and the
/// caller only needs to redraw.
fn read_input() -> io::Result<Option<Input>> {
    Ok(input_from(event::read()?))
}

pub(super) fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Apply a line editing key to `input`
///
/// Returns false when the key is not an editing key.
pub(super) fn edit_text(input: &mut TextInput, key: &KeyEvent) -> bool {
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(c) if plain => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }
    true
}

/// Pasted text for a single-line field
pub(super) fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Turn typed directory text into an existing absolute directory
fn resolve_directory(raw: &str) -> Result<PathBuf, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Please enter a directory.".to_string());
    }
    let expanded = shellexpand::full(raw).map_err(|e| e.to_string())?;
    let path = std::path::absolute(Path::new(expanded.as_ref()))
        .map_err(|e| format!("Invalid path '{}': {}", raw, e))?;
    if !path.is_dir() {
        return Err(format!("'{}' is not an existing directory.", path.display()));
    }
    Ok(path)
}

/// [`Dialogs`] on a live terminal
pub struct TerminalDialogs<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    backdrop: &'a Buffer,
    status: &'a mut Option<(String, Instant)>,
}

impl<'a, B: Backend> TerminalDialogs<'a, B> {
    pub fn new(
        terminal: &'a mut Terminal<B>,
        backdrop: &'a Buffer,
        status: &'a mut Option<(String, Instant)>,
    ) -> Self {
        Self {
            terminal,
            backdrop,
            status,
        }
    }

    /// Draw `overlay` on the backdrop and wait for input
    fn show(&mut self, overlay: impl Fn(&mut Frame)) -> io::Result<Option<Input>> {
        let backdrop = self.backdrop;
        let status = (*self.status).as_ref().map(|(message, _)| message.as_str());
        self.terminal.draw(|f| {
            paint_backdrop(f, backdrop, status);
            overlay(f);
        })?;
        read_input()
    }

    /// Next key press, or `None` if the terminal failed
    fn next_key(&mut self, overlay: impl Fn(&mut Frame)) -> Option<KeyEvent> {
        loop {
            match self.show(&overlay) {
                Ok(Some(Input::Key(key))) => return Some(key),
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "Dialog input failed");
                    return None;
                }
            }
        }
    }

    /// Single-line entry that stays open until `accept` takes the text
    fn prompt_text<T>(
        &mut self,
        title: &str,
        label: &str,
        initial: &str,
        accept: impl Fn(&str) -> Result<T, String>,
    ) -> Option<T> {
        let mut input = TextInput::with_text(initial);
        let mut error: Option<String> = None;

        loop {
            let shown = self.show(|f| {
                render::draw_text_prompt(f, title, label, &input, error.as_deref())
            });
            match shown {
                Ok(Some(Input::Key(key))) => {
                    if key.code == KeyCode::Esc || is_ctrl(&key, 'c') {
                        return None;
                    }
                    if key.code == KeyCode::Enter {
                        match accept(input.text()) {
                            Ok(value) => return Some(value),
                            Err(message) => error = Some(message),
                        }
                    } else if edit_text(&mut input, &key) {
                        error = None;
                    }
                }
                Ok(Some(Input::Paste(text))) => input.insert_str(&single_line(&text)),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Dialog input failed");
                    return None;
                }
            }
        }
    }
}

fn paint_backdrop(f: &mut Frame, backdrop: &Buffer, status: Option<&str>) {
    let area = f.area();
    if backdrop.area == area {
        f.buffer_mut().merge(backdrop);
    }
    if let Some(message) = status {
        if area.height > 0 {
            let line = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            render::draw_status_line(f, line, message);
        }
    }
}

impl<B: Backend> Dialogs for TerminalDialogs<'_, B> {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let answer = self
            .next_key(|f| render::draw_confirm(f, title, message))
            .is_some_and(|key| {
                matches!(
                    key.code,
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter
                )
            });
        debug!(title, answer, "Confirmation answered");
        answer
    }

    fn notify(&mut self, level: NoticeLevel, title: &str, message: &str) {
        debug!(?level, title, message, "Notice");
        match level {
            NoticeLevel::Info => *self.status = Some((message.to_string(), Instant::now())),
            NoticeLevel::Warning | NoticeLevel::Error => {
                self.next_key(|f| render::draw_notice(f, level, title, message));
            }
        }
    }

    fn pick_directory(&mut self, suggested: Option<&Path>) -> Option<PathBuf> {
        let initial = suggested
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .or_else(dirs::home_dir)
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();

        self.prompt_text(
            "Select Prompt Directory",
            "Directory to store your prompts (~ and $VARS expand):",
            &initial,
            resolve_directory,
        )
    }

    fn ask_new_name(&mut self, current: &str, validate: &NameValidator<'_>) -> Option<String> {
        self.prompt_text(
            "Rename Prompt",
            &format!("Enter new name for '{}':", current),
            current,
            |candidate| validate(candidate).map_err(|e| e.to_string()),
        )
    }
}
