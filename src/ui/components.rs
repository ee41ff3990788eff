//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{ALL_ACTIONS, KeyAction, format_action};
use crate::app::{AppState, InputMode, LoadState};

/// Render the bottom status bar with mode, counts and load state.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form(_) if app.store.form.is_edit() => "EDIT",
        InputMode::Form(_) => "ADD",
        InputMode::Modal => "MODAL",
    };
    let load = match &app.load_state {
        LoadState::Idle => String::new(),
        LoadState::Loading => "  loading...".to_string(),
        LoadState::Loaded(n) => format!("  fetched:{n}"),
        LoadState::Failed(_) => "  fetch failed (see log)".to_string(),
    };
    let pages = match (app.pager.as_ref(), app.total_pages()) {
        (Some(p), Some(total)) => format!("  page:{}/{}  rows/page:{}", p.current_page(), total, p.rows_per_page()),
        _ => String::new(),
    };
    let msg = format!(
        "mode: {mode}  records:{}  shown:{}{}{}",
        app.store.records.len(),
        app.filtered().len(),
        pages,
        load
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a blocking informational modal (validation alerts).
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let max_w = area.width.saturating_sub(6).max(30);
    let min_w = 40u16.min(max_w);
    let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(min_w, height, area);
    let body = format!("{message}\n\nPress Enter or Esc");
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Info")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, id: u64, selected: usize) {
    let rect = centered_rect(46, 7, area);
    let name = app.store.get(id).map(|r| r.name.as_str()).unwrap_or("");
    let yes = if selected == 0 { "[Yes]" } else { " Yes " };
    let no = if selected == 1 { "[No]" } else { " No  " };
    let body = format!("Delete '{name}' (id {id})?\n\n  {yes}    {no}");
    let p = Paragraph::new(body).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn action_label(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::StartSearch => "Search by name",
        KeyAction::FocusForm => "Add new row",
        KeyAction::EditSelection => "Edit selected",
        KeyAction::DeleteSelection => "Delete selected",
        KeyAction::ClearForm => "Clear form",
        KeyAction::SubmitForm => "Submit form",
        KeyAction::OpenHelp => "Help",
        KeyAction::MoveUp => "Move up",
        KeyAction::MoveDown => "Move down",
        KeyAction::PreviousPage => "Previous page",
        KeyAction::NextPage => "Next page",
        KeyAction::Ignore => format_action(a),
    }
}

/// Render the help modal listing the current keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let mut lines = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for action in ALL_ACTIONS.into_iter().filter(|a| *a != KeyAction::Ignore) {
        if app.pager.is_none() && matches!(action, KeyAction::PreviousPage | KeyAction::NextPage) {
            continue;
        }
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>18} │ ", action_label(action))),
            Span::styled(keys.join(", "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    if app.pager.is_some() {
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>18} │ ", "Go to page")),
            Span::styled("1-9", Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("Form: Tab switches field, Enter submits, Esc leaves."));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
