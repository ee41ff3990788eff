use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};
use crate::table::FormField;

pub fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.store.form;
    let focused = match app.input_mode {
        InputMode::Form(field) => Some(field),
        _ => None,
    };

    let field_line = |label: &'static str, field: FormField| {
        let active = focused == Some(field);
        let marker = if active { "▶ " } else { "  " };
        let cursor = if active { "_" } else { "" };
        let value_style = if active {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Line::from(vec![
            Span::raw(format!("{marker}{label}: ")),
            Span::styled(format!("{}{}", form.field(field), cursor), value_style),
        ])
    };

    let (title, action) = match form.id {
        Some(id) => (format!("Edit #{id}"), "Update"),
        None => ("Add".to_string(), "Add"),
    };

    let lines = vec![
        field_line("Name", FormField::Name),
        field_line("Age ", FormField::Age),
        Line::raw(""),
        Line::from(Span::styled(
            format!("[{action}]  (Enter / s)"),
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Tab: switch field  Esc: leave  c: clear",
            Style::default().fg(app.theme.muted),
        )),
    ];

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
