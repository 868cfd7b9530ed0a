use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::{Margin, Rect},
    widgets::ListState,
    Terminal,
};
use tui_textarea::CursorMove;
use std::{
    io,
    time::{Duration, Instant},
};
use tracing::debug;

use crate::app::{App, CreateField, Screen};
use crate::clipboard::ClipboardSink;

pub mod modal;
pub mod render;

pub use modal::TerminalDialogs;

use modal::{edit_text, is_ctrl, single_line, Input};

const STATUS_TIMEOUT: Duration = Duration::from_secs(3);
const TICK: Duration = Duration::from_millis(250);
const DOUBLE_CLICK: Duration = Duration::from_millis(500);
const PAGE: u16 = 10;

/// Full-screen terminal front end
pub struct PromptTui {
    app: App,
    clipboard: Box<dyn ClipboardSink>,
    list_state: ListState,
    status_message: Option<(String, Instant)>,
    /// Last full frame, drawn under modal dialogs
    backdrop: Buffer,
    areas: render::DrawnAreas,
    last_click: Option<(usize, Instant)>,
}

impl PromptTui {
    pub fn new(app: App, clipboard: impl ClipboardSink + 'static) -> Self {
        Self {
            app,
            clipboard: Box::new(clipboard),
            list_state: ListState::default(),
            status_message: None,
            backdrop: Buffer::empty(Rect::default()),
            areas: render::DrawnAreas::default(),
            last_click: None,
        }
    }

    pub fn run(mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw terminal mode")?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Run app
        let res = self.run_app(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        res
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.draw(terminal)?;
        {
            let (app, mut ui, _) = self.parts(terminal);
            app.start(&mut ui);
        }

        loop {
            self.expire_status();
            self.draw(terminal)?;

            if !event::poll(TICK)? {
                continue;
            }
            let quit = match event::read()? {
                event::Event::Mouse(mouse) => {
                    self.handle_mouse(terminal, mouse);
                    false
                }
                other => match modal::input_from(other) {
                    Some(Input::Key(key)) => self.handle_key(terminal, key),
                    Some(Input::Paste(text)) => {
                        self.handle_paste(&text);
                        false
                    }
                    None => false,
                },
            };
            if quit {
                debug!("Quitting");
                return Ok(());
            }
        }
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.list_state.select(self.app.list().selected_index());

        let app = &self.app;
        let list_state = &mut self.list_state;
        let status = self.status_message.as_ref().map(|(message, _)| message.as_str());
        let mut areas = render::DrawnAreas::default();

        let frame = terminal.draw(|f| {
            areas = render::draw(f, app, status, list_state);
        })?;
        self.backdrop = frame.buffer.clone();
        self.areas = areas;
        Ok(())
    }

    fn expire_status(&mut self) {
        if let Some((_, shown_at)) = &self.status_message {
            if shown_at.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    /// Controller, dialogs and clipboard borrowed side by side
    fn parts<'a, B: Backend>(
        &'a mut self,
        terminal: &'a mut Terminal<B>,
    ) -> (&'a mut App, TerminalDialogs<'a, B>, &'a mut dyn ClipboardSink) {
        let ui = TerminalDialogs::new(terminal, &self.backdrop, &mut self.status_message);
        (&mut self.app, ui, self.clipboard.as_mut())
    }

    /// Returns true when the application should exit
    fn handle_key<B: Backend>(&mut self, terminal: &mut Terminal<B>, key: KeyEvent) -> bool {
        let viewport = self.areas.body;
        let (app, mut ui, clipboard) = self.parts(terminal);

        if is_ctrl(&key, 'c') {
            return app.confirm_quit(&mut ui);
        }

        match app.screen() {
            Screen::List => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return app.confirm_quit(&mut ui),
                KeyCode::Down | KeyCode::Char('j') => app.list_mut().select_next(),
                KeyCode::Up | KeyCode::Char('k') => app.list_mut().select_previous(),
                KeyCode::Home | KeyCode::Char('g') => app.list_mut().select_first(),
                KeyCode::End | KeyCode::Char('G') => app.list_mut().select_last(),
                KeyCode::Enter | KeyCode::Char('v') => app.open_selected(&mut ui),
                KeyCode::Char('n') => app.new_prompt(&mut ui),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(&mut ui),
                KeyCode::Char('o') => {
                    app.select_directory(&mut ui);
                }
                _ => {}
            },
            Screen::Create(_) => {
                if key.code == KeyCode::Esc {
                    app.cancel_create(&mut ui);
                } else if is_ctrl(&key, 's') {
                    app.save_new_prompt(&mut ui);
                } else if let Screen::Create(form) = app.screen_mut() {
                    match (key.code, form.focus) {
                        (KeyCode::Tab | KeyCode::BackTab, _) => form.toggle_focus(),
                        (KeyCode::Enter, CreateField::Name) => form.toggle_focus(),
                        (_, CreateField::Name) => {
                            edit_text(&mut form.name, &key);
                        }
                        (_, CreateField::Body) => {
                            form.body.textarea_mut().input(key);
                        }
                    }
                }
            }
            Screen::ViewEdit(view) if view.editing() => {
                if key.code == KeyCode::Esc {
                    app.toggle_edit(&mut ui);
                } else if is_ctrl(&key, 's') {
                    app.save_body(&mut ui);
                } else if is_ctrl(&key, 'b') {
                    app.return_to_list(&mut ui);
                } else if let Screen::ViewEdit(view) = app.screen_mut() {
                    if let Some(body) = view.body_mut() {
                        body.textarea_mut().input(key);
                    }
                }
            }
            Screen::ViewEdit(_) => match key.code {
                KeyCode::Char('e') => app.toggle_edit(&mut ui),
                KeyCode::Char('r') => app.rename_current(&mut ui),
                KeyCode::Char('c') | KeyCode::Char('y') => app.copy_current(&mut ui, clipboard),
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('b') | KeyCode::Backspace => {
                    app.return_to_list(&mut ui)
                }
                KeyCode::Down | KeyCode::Char('j') => scroll_view(app, 1, viewport),
                KeyCode::Up | KeyCode::Char('k') => scroll_view(app, -1, viewport),
                KeyCode::PageDown => scroll_view(app, PAGE as i32, viewport),
                KeyCode::PageUp => scroll_view(app, -(PAGE as i32), viewport),
                KeyCode::Home => scroll_view(app, i32::MIN, viewport),
                KeyCode::End => scroll_view(app, i32::MAX, viewport),
                _ => {}
            },
        }
        false
    }

    fn handle_mouse<B: Backend>(&mut self, terminal: &mut Terminal<B>, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(index) = self.row_at(mouse.column, mouse.row) else {
                    return;
                };
                let double = self.last_click.is_some_and(|(last, at)| {
                    last == index && at.elapsed() <= DOUBLE_CLICK
                });
                self.app.list_mut().select_index(index);

                if double {
                    self.last_click = None;
                    let (app, mut ui, _) = self.parts(terminal);
                    app.open_selected(&mut ui);
                } else {
                    self.last_click = Some((index, Instant::now()));
                }
            }
            MouseEventKind::ScrollDown => self.scroll(1),
            MouseEventKind::ScrollUp => self.scroll(-1),
            _ => {}
        }
    }

    /// List row under a click on the list screen
    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        if *self.app.screen() != Screen::List {
            return None;
        }
        let rows = self.areas.list.inner(Margin::new(1, 1));
        if !rows.contains((column, row).into()) {
            return None;
        }
        let index = self.list_state.offset() + (row - rows.y) as usize;
        (index < self.app.list().names().len()).then_some(index)
    }

    fn scroll(&mut self, delta: i32) {
        let viewport = self.areas.body;
        match self.app.screen_mut() {
            Screen::List if delta > 0 => self.app.list_mut().select_next(),
            Screen::List => self.app.list_mut().select_previous(),
            Screen::ViewEdit(view) => match view.body_mut() {
                Some(body) if delta > 0 => body.textarea_mut().move_cursor(CursorMove::Down),
                Some(body) => body.textarea_mut().move_cursor(CursorMove::Up),
                None => scroll_view(&mut self.app, delta, viewport),
            },
            Screen::Create(_) => {}
        }
    }

    fn handle_paste(&mut self, text: &str) {
        match self.app.screen_mut() {
            Screen::Create(form) => match form.focus {
                CreateField::Name => form.name.insert_str(&single_line(text)),
                CreateField::Body => form.body.insert_str(text),
            },
            Screen::ViewEdit(view) => {
                if let Some(body) = view.body_mut() {
                    body.insert_str(text);
                }
            }
            Screen::List => {}
        }
    }
}

/// Move the read-only body by `delta` rows
///
/// `viewport` is the inside of the body block from the last draw. The last
/// wrapped row may scroll up to the bottom of the viewport but no further.
fn scroll_view(app: &mut App, delta: i32, viewport: Rect) {
    if let Screen::ViewEdit(view) = app.screen_mut() {
        let rows = render::wrapped_rows(&view.body().text(), viewport.width);
        let max = rows
            .saturating_sub(viewport.height as usize)
            .min(u16::MAX as usize) as i32;
        let target = (view.scroll as i32).saturating_add(delta);
        view.scroll = target.clamp(0, max) as u16;
    }
}
