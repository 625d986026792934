//! Topic configuration view
//!
//! Lists the configuration entries of the selected topic. While another
//! topic is loading the previous topic's data stays on screen, marked as
//! such in the title.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub(crate) fn render_topic_config(f: &mut Frame, app: &mut App, area: Rect) {
    let requested = app.topic_info.topic().unwrap_or_default().to_string();

    let Some((shown_topic, info)) = app.topic_info.data() else {
        let paragraph = Paragraph::new(format!("Loading topic information for '{}'...", requested))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Topic"));
        f.render_widget(paragraph, area);
        return;
    };
    let shown_topic = shown_topic.to_string();
    let entries = info.config_entries();
    let summary = info.summary_fields();

    let summary_height = (summary.len() as u16).min(6) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(summary_height), Constraint::Min(0)])
        .split(area);

    let mut title = format!("Topic: {}", shown_topic);
    if app.topic_info.is_previous_data() {
        if app.topic_info.is_loading() {
            title.push_str(&format!(" (loading '{}'...)", requested));
        } else {
            title.push_str(&format!(" (loading '{}' failed, showing previous)", requested));
        }
    } else if app.topic_info.is_loading() {
        title.push_str(" (refreshing...)");
    }

    let summary_lines: Vec<Line> = summary
        .iter()
        .take(6)
        .map(|(name, value)| {
            Line::from(vec![
                Span::styled(format!("{}: ", name), Style::default().fg(Color::Gray)),
                Span::raw(value.clone()),
            ])
        })
        .collect();
    let summary_block = Paragraph::new(summary_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(summary_block, chunks[0]);

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.key.clone()),
                Cell::from(entry.value.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();

    let header = Row::new(vec!["Key", "Value"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, [Constraint::Percentage(40), Constraint::Percentage(60)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Configuration ({} entries)", entries.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.config_table_state);
}
