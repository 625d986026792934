//! Search dashboard rendering
//!
//! Shows the search inputs with the Start/Pause button, the job stats row,
//! and below it either skeleton rows, the paginated results, or the
//! "Record is not found" notice, as decided by [`crate::search::SearchView`].

use crate::app::{App, SearchFocus};
use crate::models::SearchItem;
use crate::search::SearchField;
use crate::utils::formatting::{
    format_local_datetime, format_time_of_day, split_highlight, truncate, value_inline, value_pretty,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use throbber_widgets_tui::Throbber;

/// Brand accent of the console
const ACCENT: Color = Color::Rgb(242, 122, 26);

/// Maximum characters of a value shown in the collapsed row
const COLLAPSED_VALUE_CHARS: usize = 120;

pub(crate) fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let view = app.search.view();
    let stats_height = if view.has_response { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),            // Inputs
            Constraint::Length(stats_height), // Stats row
            Constraint::Min(0),               // Results
        ])
        .split(area);

    render_inputs(f, app, chunks[0]);
    if view.has_response {
        render_stats(f, app, chunks[1]);
    }

    if view.show_skeleton {
        render_skeleton(f, chunks[2]);
    } else if view.show_results {
        render_results(f, app, chunks[2]);
    } else if view.show_not_found {
        let notice = Paragraph::new("Record is not found")
            .block(Block::default().borders(Borders::ALL));
        let height = chunks[2].height.min(3);
        f.render_widget(notice, Rect { height, ..chunks[2] });
    }
}

fn input_span(label: &str, value: &str, focused: bool) -> Vec<Span<'static>> {
    let value_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    };
    vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
        Span::styled(format!("[{}]", value), value_style),
        Span::raw("  "),
    ]
}

fn render_inputs(f: &mut Frame, app: &App, area: Rect) {
    let params = app.search.parameters();
    let view = app.search.view();

    let mut spans = input_span(
        "Topic Name",
        &params.topic_name,
        app.focus == SearchFocus::Field(SearchField::TopicName),
    );
    spans.extend(input_span(
        "Value",
        &params.value,
        app.focus == SearchFocus::Field(SearchField::Value),
    ));

    let mut button = vec![Span::styled(
        format!(" {} ", view.button_label),
        Style::default()
            .fg(Color::White)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
    )];
    if app.search.is_fetching() {
        button.insert(0, Throbber::default().to_symbol_span(&app.throbber));
    }
    spans.extend(button);

    let recent = if app.config.recent_topics.is_empty() {
        Line::from(Span::styled(
            "Enter starts or pauses the search",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            format!("Recent topics: {}", app.config.recent_topics.join(", ")),
            Style::default().fg(Color::DarkGray),
        ))
    };

    let paragraph = Paragraph::new(vec![Line::from(spans), recent])
        .block(Block::default().borders(Borders::ALL).title("Search"));
    f.render_widget(paragraph, area);
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let Some(resp) = app.search.response() else {
        return;
    };
    let view = app.search.view();
    let label = Style::default().fg(Color::Gray);
    let divider = Span::styled(" │ ", Style::default().fg(Color::DarkGray));

    let mut spans = vec![Span::styled("Status ", label)];
    if view.show_spinner {
        spans.push(Throbber::default().to_symbol_span(&app.throbber));
    }
    let status_color = if resp.status.is_finished() {
        Color::Green
    } else {
        Color::Cyan
    };
    spans.push(Span::styled(
        resp.status.to_string(),
        Style::default().fg(status_color).add_modifier(Modifier::BOLD),
    ));

    spans.push(divider.clone());
    spans.push(Span::styled("Created Date ", label));
    spans.push(Span::raw(format_local_datetime(resp.created_date)));

    if let Some(completed) = &view.completed_label {
        spans.push(divider.clone());
        spans.push(Span::styled("Completed Time ", label));
        spans.push(Span::raw(completed.clone()));
    }

    if let Some(error) = &view.error {
        spans.push(divider.clone());
        spans.push(Span::styled("Error ", label));
        spans.push(Span::styled(error.clone(), Style::default().fg(Color::Red)));
    }

    spans.push(divider);
    spans.push(Span::styled("[Ctrl+D] delete", Style::default().fg(Color::Red)));

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_skeleton(f: &mut Frame, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let bar = Line::from(Span::styled(
        "░".repeat(width),
        Style::default().fg(Color::DarkGray),
    ));
    let lines = vec![bar.clone(), Line::from(""), bar.clone(), Line::from(""), bar];
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn highlighted(text: &str, keyword: &str, base: Style) -> Vec<Span<'static>> {
    split_highlight(text, keyword)
        .into_iter()
        .map(|(segment, matched)| {
            let style = if matched {
                base.bg(Color::Yellow).fg(Color::Black)
            } else {
                base
            };
            Span::styled(segment.to_string(), style)
        })
        .collect()
}

fn item_header(item: &SearchItem, keyword: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if let Some(partition) = item.partition {
        spans.push(Span::styled(
            format!("[P{}] ", partition),
            Style::default().fg(Color::Green),
        ));
    }
    if let Some(offset) = item.offset {
        spans.push(Span::styled(
            format!("@{} ", offset),
            Style::default().fg(Color::Magenta),
        ));
    }
    if let Some(ts) = item.timestamp {
        spans.push(Span::styled(
            format!("{} ", format_time_of_day(ts)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(key) = &item.key {
        spans.push(Span::styled("Key: ", Style::default().fg(Color::Yellow)));
        spans.extend(highlighted(&value_inline(key), keyword, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" | "));
    }
    if let Some(value) = &item.value {
        let text = truncate(&value_inline(value), COLLAPSED_VALUE_CHARS);
        spans.extend(highlighted(&text, keyword, Style::default()));
    }
    spans
}

fn item_details(item: &SearchItem, keyword: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(value) = &item.value {
        for line in value_pretty(value).lines() {
            let mut spans = vec![Span::raw("    ")];
            spans.extend(highlighted(line, keyword, Style::default().fg(Color::White)));
            lines.push(Line::from(spans));
        }
    }
    for (name, value) in &item.extra {
        lines.push(Line::from(vec![
            Span::styled(format!("    {}: ", name), Style::default().fg(Color::Gray)),
            Span::raw(value_inline(value)),
        ]));
    }
    lines
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let Some(resp) = app.search.response() else {
        return;
    };
    let keyword = app.search.parameters().value.as_str();
    let total = resp.data.len();
    let range = app.paginator.range(total);
    let results_focused = app.focus == SearchFocus::Results;

    let mut lines = Vec::new();
    for (row, idx) in range.clone().enumerate() {
        let item = &resp.data[idx];
        let expanded = app.expanded.contains(&idx);
        let marker = if expanded { "▾ " } else { "▸ " };

        let mut spans = vec![Span::raw(marker)];
        spans.extend(item_header(item, keyword));
        let mut line = Line::from(spans);
        if results_focused && row == app.selected_result {
            line = line.style(Style::default().bg(Color::DarkGray));
        }
        lines.push(line);

        if expanded {
            lines.extend(item_details(item, keyword));
        }
    }

    let title = format!(
        "Results ({} records) - page {}/{}",
        total,
        app.paginator.page().min(app.paginator.page_count(total) - 1) + 1,
        app.paginator.page_count(total)
    );
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}
