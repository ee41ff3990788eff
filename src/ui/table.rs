use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{AppState, LoadState};

pub fn render_records_table(f: &mut Frame, area: Rect, app: &AppState) {
    let visible = app.visible();

    let rows = visible.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.id.to_string()),
            Cell::from(r.name.clone()),
            Cell::from(r.age.to_string()),
        ])
    });

    let widths = [Constraint::Length(6), Constraint::Percentage(70), Constraint::Length(6)];
    let header = Row::new(vec!["ID", "Name", "Age"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = match &app.load_state {
        LoadState::Loading => "Records (loading...)".to_string(),
        _ => format!("Records ({} of {})", app.filtered().len(), app.store.records.len()),
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.text))
        .row_highlight_style(
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected_index.min(visible.len() - 1)));
    }
    f.render_stateful_widget(table, area, &mut state);
}

/// Previous / page numbers / Next strip for the paged variant.
pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    let (Some(pager), Some(total)) = (app.pager.as_ref(), app.total_pages()) else {
        return;
    };
    let enabled = Style::default().fg(app.theme.text);
    let disabled = Style::default().fg(app.theme.muted).add_modifier(Modifier::DIM);

    let mut spans = vec![Span::styled(
        "< Previous",
        if pager.can_go_previous() { enabled } else { disabled },
    )];
    for button in pager.page_buttons(total) {
        spans.push(Span::raw(" "));
        let style = if button.current {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            enabled
        };
        spans.push(Span::styled(format!(" {} ", button.number), style));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        "Next >",
        if pager.can_go_next(total) { enabled } else { disabled },
    ));

    let p = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
        Block::default()
            .title(format!("Page {} of {}", pager.current_page(), total))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
