use kizuna_core::{Item, ItemIndex};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::App;

/// Render one item's record and its graph neighbors.
pub fn render(frame: &mut Frame, app: &App, handle: ItemIndex) {
    let area = frame.area();

    let Some(item) = app.item(handle) else {
        let msg = Paragraph::new("Title not found").style(Style::default().fg(Color::Red));
        frame.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title header
            Constraint::Length(7), // Record
            Constraint::Min(5),    // Neighbors
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    render_header(frame, item, chunks[0]);
    render_record(frame, item, chunks[1]);
    render_neighbors(frame, app, handle, chunks[2]);
    render_help(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, item: &Item, area: Rect) {
    let header = Paragraph::new(format!("{}  (#{})", item.name(), item.id()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<12}"), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

fn render_record(frame: &mut Frame, item: &Item, area: Rect) {
    let lines = vec![
        field("Categories", item.categories().join(", ")),
        field("Type", item.kind().to_string()),
        field("Episodes", item.episodes().to_string()),
        field("Rating", format!("{:.2}", item.rating())),
        field("Members", item.popularity().to_string()),
    ];
    let record = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(record, area);
}

fn render_neighbors(frame: &mut Frame, app: &App, handle: ItemIndex, area: Rect) {
    let neighbors = app.neighbors(handle);

    let lines: Vec<Line<'_>> = if neighbors.is_empty() {
        vec![Line::from(Span::styled(
            "  No titles are similar enough at this threshold.",
            Style::default().fg(Color::Yellow),
        ))]
    } else {
        neighbors
            .iter()
            .enumerate()
            .map(|(i, (neighbor, weight))| {
                let style = if i == app.selected_neighbor {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(
                        format!("  {:.3}  ", 1.0 - weight),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(neighbor.name().to_string()),
                ])
                .style(style)
            })
            .collect()
    };

    // Keep the selected neighbor in view.
    let visible = usize::from(area.height.saturating_sub(2));
    let scroll = app.selected_neighbor.saturating_sub(visible.saturating_sub(1));
    let neighbors = Paragraph::new(lines)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Similar titles ({})", neighbors.len())),
        );
    frame.render_widget(neighbors, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  \u{2191}/k Prev  \u{2193}/j Next  Enter Open  b Back  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
