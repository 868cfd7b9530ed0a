//! Drawing for the three screens, the status bar and the modal overlays

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{
    App, BodyEditor, CreateField, CreateForm, NoticeLevel, Screen, TextInput, ViewEditState,
};

const BORDER: Color = Color::Rgb(60, 66, 78);
const FOCUS: Color = Color::Rgb(120, 160, 255);
const HIGHLIGHT_BG: Color = Color::Rgb(45, 50, 59);
const TEXT: Color = Color::Rgb(200, 205, 215);
const MUTED: Color = Color::Rgb(110, 118, 130);

/// Areas of the last frame that mouse clicks and scrolling are mapped onto
///
/// Both are empty when the matching screen is not shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawnAreas {
    /// Prompt list including its border
    pub list: Rect,
    /// Inside of the read-only body
    pub body: Rect,
}

/// Draw the active screen and status bar
pub fn draw(
    f: &mut Frame,
    app: &App,
    status: Option<&str>,
    list_state: &mut ListState,
) -> DrawnAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let mut areas = DrawnAreas::default();
    match app.screen() {
        Screen::List => areas.list = draw_list_screen(f, chunks[0], app, list_state),
        Screen::Create(form) => draw_create_screen(f, chunks[0], form),
        Screen::ViewEdit(view) => areas.body = draw_view_edit_screen(f, chunks[0], view),
    }

    draw_status_bar(f, chunks[1], app, status);
    areas
}

/// Rows `text` takes up when wrapped to `width` columns in the body view
pub fn wrapped_rows(text: &str, width: u16) -> usize {
    if width == 0 {
        return 0;
    }
    Paragraph::new(text).wrap(Wrap { trim: false }).line_count(width)
}

fn titled_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { FOCUS } else { BORDER };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
}

fn draw_list_screen(f: &mut Frame, area: Rect, app: &App, list_state: &mut ListState) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)].as_ref())
        .split(area);

    let header = Paragraph::new(app.directory_label()).style(Style::default().fg(MUTED));
    f.render_widget(header, chunks[0]);

    let names = app.list().names();
    let title = format!(" {} • {} prompts ", app.screen().title(), names.len());
    let block = titled_block(title, true);

    if names.is_empty() {
        let hint = if app.store().is_some() {
            "No prompts yet. Press [n] to create one."
        } else {
            "No prompt file loaded. Press [o] to select a directory."
        };
        let empty = Paragraph::new(hint)
            .block(block)
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[1]);
        return chunks[1];
    }

    let items: Vec<ListItem> = names
        .iter()
        .map(|name| ListItem::new(Line::from(Span::styled(name.clone(), Style::default().fg(TEXT)))))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(HIGHLIGHT_BG)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, chunks[1], list_state);
    chunks[1]
}

fn draw_create_screen(f: &mut Frame, area: Rect, form: &CreateForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(area);

    let name_focused = form.focus == CreateField::Name;
    let name_block = titled_block(" Name ".to_string(), name_focused);
    let body_block = titled_block(" Body ".to_string(), !name_focused);

    draw_text_input(f, chunks[0], name_block, &form.name, name_focused);
    draw_body_editor(f, chunks[1], body_block, &form.body);
}

/// Returns the inside of the read-only body, or an empty rect while editing
fn draw_view_edit_screen(f: &mut Frame, area: Rect, view: &ViewEditState) -> Rect {
    let mode = if view.editing() { "Editing" } else { "Viewing" };
    let title = format!(" {}: {} ", mode, view.name());
    let block = titled_block(title, view.editing());

    if view.editing() {
        draw_body_editor(f, area, block, view.body());
        return Rect::default();
    }

    let inner = block.inner(area);
    let body = Paragraph::new(view.body().text())
        .block(block)
        .style(Style::default().fg(TEXT))
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0));
    f.render_widget(body, area);
    inner
}

fn draw_body_editor(f: &mut Frame, area: Rect, block: Block<'_>, editor: &BodyEditor) {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(editor.textarea(), inner);
}

/// One line of text, scrolled sideways to keep the cursor in view
fn draw_text_input(f: &mut Frame, area: Rect, block: Block<'_>, input: &TextInput, focused: bool) {
    let inner = block.inner(area);
    let column = input.cursor_column();
    let left = column.saturating_sub(inner.width.saturating_sub(1) as usize);

    let paragraph = Paragraph::new(input.text())
        .block(block)
        .style(Style::default().fg(TEXT))
        .scroll((0, left as u16));
    f.render_widget(paragraph, area);

    if focused && inner.width > 0 && inner.height > 0 {
        f.set_cursor_position(Position::new(inner.x + (column - left) as u16, inner.y));
    }
}

fn key_hint(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::LightCyan).add_modifier(Modifier::BOLD),
            Style::default().fg(TEXT),
        )
    } else {
        (Style::default().fg(MUTED), Style::default().fg(MUTED))
    };
    vec![
        Span::styled(format!(" [{}]", key), key_style),
        Span::styled(format!(" {} ", label), label_style),
    ]
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App, status: Option<&str>) {
    if let Some(message) = status {
        draw_status_line(f, area, message);
        return;
    }

    let hints: Vec<(&str, &str, bool)> = match app.screen() {
        Screen::List => {
            let selected = app.list().actions_enabled();
            vec![
                ("↑↓", "Select", true),
                ("Enter", "View/Edit", selected),
                ("d", "Delete", selected),
                ("n", "New Prompt", true),
                ("o", "Select Directory", true),
                ("q", "Quit", true),
            ]
        }
        Screen::Create(_) => vec![
            ("Tab", "Switch Field", true),
            ("Ctrl+S", "Save", true),
            ("Esc", "Cancel", true),
        ],
        Screen::ViewEdit(view) if view.editing() => vec![
            ("Ctrl+S", "Save Body Changes", true),
            ("Esc", "Stop Editing", true),
            ("Ctrl+B", "Return to List", true),
        ],
        Screen::ViewEdit(_) => vec![
            ("e", "Edit Body", true),
            ("r", "Rename Prompt", true),
            ("c", "Copy Prompt", true),
            ("Esc", "Return to List", true),
        ],
    };

    let spans: Vec<Span> = hints
        .into_iter()
        .flat_map(|(key, label, enabled)| key_hint(key, label, enabled))
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Transient message in place of the key hints
pub fn draw_status_line(f: &mut Frame, area: Rect, message: &str) {
    let line = Paragraph::new(format!(" {}", message))
        .style(Style::default().fg(Color::LightGreen).bg(HIGHLIGHT_BG));
    f.render_widget(line, area);
}

fn modal_block(title: &str, accent: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(30, 33, 40)))
}

fn message_lines(message: &str) -> Vec<Line<'static>> {
    message
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White))))
        .collect()
}

/// Yes/no question
pub fn draw_confirm(f: &mut Frame, title: &str, message: &str) {
    let area = centered_rect(60, 35, f.area());
    f.render_widget(Clear, area);

    let mut lines = message_lines(message);
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            "[Enter or y]",
            Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Yes  ", Style::default().fg(Color::White)),
        Span::styled(
            "[Any other key]",
            Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" No", Style::default().fg(Color::White)),
    ]));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(modal_block(title, Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Warning or error that waits for a key
pub fn draw_notice(f: &mut Frame, level: NoticeLevel, title: &str, message: &str) {
    let area = centered_rect(60, 35, f.area());
    f.render_widget(Clear, area);

    let accent = match level {
        NoticeLevel::Info => Color::LightCyan,
        NoticeLevel::Warning => Color::LightYellow,
        NoticeLevel::Error => Color::LightRed,
    };

    let mut lines = message_lines(message);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to continue",
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(modal_block(title, accent))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Single-line text entry with an optional validation error
pub fn draw_text_prompt(
    f: &mut Frame,
    title: &str,
    label: &str,
    input: &TextInput,
    error: Option<&str>,
) {
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);

    let block = modal_block(title, Color::White);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(inner);

    f.render_widget(
        Paragraph::new(label.to_string()).style(Style::default().fg(Color::White)),
        chunks[0],
    );
    draw_text_input(f, chunks[1], titled_block(String::new(), true), input, true);

    if let Some(error) = error {
        let error = Paragraph::new(error.to_string())
            .style(Style::default().fg(Color::LightRed))
            .wrap(Wrap { trim: true });
        f.render_widget(error, chunks[2]);
    }

    let hints: Vec<Span> = key_hint("Enter", "Save", true)
        .into_iter()
        .chain(key_hint("Esc", "Cancel", true))
        .collect();
    f.render_widget(Paragraph::new(Line::from(hints)), chunks[3]);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
