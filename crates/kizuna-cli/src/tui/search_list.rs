use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::App;

/// Render the type-ahead search view.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(5),    // Suggestion table
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    render_query(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_help(frame, chunks[2]);
}

fn render_query(frame: &mut Frame, app: &App, area: Rect) {
    let query = Paragraph::new(format!("> {}_", app.query))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Search {} titles", app.dataset.catalog.len())),
        );
    frame.render_widget(query, area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Title").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Type"),
        Cell::from("Episodes"),
        Cell::from("Rating"),
    ])
    .height(1);

    // area.height - 2 for borders - 1 for header
    let viewport_height = (area.height.saturating_sub(3)) as usize;

    let rows: Vec<Row> = app
        .suggestions
        .iter()
        .enumerate()
        .skip(app.list_offset)
        .take(viewport_height)
        .filter_map(|(i, suggestion)| {
            let item = app.item(suggestion.value)?;
            let style = if i == app.selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Some(
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(item.name().to_string()),
                    Cell::from(item.kind().to_string()),
                    Cell::from(format!("{}", item.episodes())),
                    Cell::from(format!("{:.2}", item.rating())),
                ])
                .style(style),
            )
        })
        .collect();

    let title = if app.suggestions.is_empty() {
        "No matches".to_string()
    } else {
        format!("Matches ({})", app.suggestions.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(60),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  Type to search  \u{2191}/\u{2193} Move  Enter Open  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
