pub mod components;
pub mod form;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let pager_height = if app.pager.is_some() { 3 } else { 0 };
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(pager_height),
            Constraint::Length(1),
        ])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[1]);

    let prompt = match app.input_mode {
        InputMode::Search => format!("Search by name: {}_", app.search_query),
        _ if !app.search_query.is_empty() => format!("Search by name: {}", app.search_query),
        _ => "/: search  a: add  e: edit  d: delete  ?: help  q: quit".to_string(),
    };
    let p = Paragraph::new(prompt)
        .block(
            Block::default()
                .title(app.variant.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    table::render_records_table(f, body[0], app);
    form::render_form(f, body[1], app);
    if app.pager.is_some() {
        table::render_pagination(f, root[2], app);
    }
    components::render_status_bar(f, root[3], app);

    let area = f.area();
    match &app.modal {
        Some(ModalState::Info { message }) => components::render_info_modal(f, area, app, message),
        Some(ModalState::DeleteConfirm { id, selected }) => {
            components::render_delete_modal(f, area, app, *id, *selected)
        }
        Some(ModalState::Help) => components::render_help_modal(f, area, app),
        None => {}
    }
}
