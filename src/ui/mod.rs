//! User interface rendering module
//!
//! All TUI rendering with ratatui. Each submodule renders one view or
//! overlay:
//! - `search_view` - Search dashboard
//! - `topic_view` - Topic configuration table
//! - `dialogs` - Configuration edit modal
//! - `status` - Status bar, error panel and toasts
//! - `helpers` - Layout helpers

mod dialogs;
mod helpers;
mod search_view;
mod status;
mod topic_view;

use crate::app::{App, AppMode};
use crate::search::PollState;
use dialogs::render_edit_dialog;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use search_view::render_search;
use status::{render_error_panel, render_status_bar, render_toasts};
use topic_view::render_topic_config;

/// Main UI rendering function
///
/// Lays out the header, the view for the current mode and the status bar,
/// then draws overlays (edit modal, toasts) on top.
pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    let (polling, polling_color) = match app.search.state() {
        PollState::Polling => ("polling", Color::Green),
        PollState::Disabled => ("paused", Color::DarkGray),
    };
    let view_name = match app.mode {
        AppMode::Search => "Search".to_string(),
        AppMode::TopicConfig | AppMode::EditConfig => format!(
            "Topic {}",
            app.topic_info.topic().unwrap_or_default()
        ),
    };
    let header = Line::from(vec![
        Span::styled(
            format!("KB API: {} | Cluster: {} | ", app.api_url, app.cluster.kafka_id),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("Search: {}", polling), Style::default().fg(polling_color)),
        Span::styled(format!(" | {}", view_name), Style::default().fg(Color::Cyan)),
    ]);
    f.render_widget(
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let main_area = if app.show_errors && !app.notifications.errors().is_empty() {
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[1]);

        render_error_panel(f, app, main_chunks[1]);
        main_chunks[0]
    } else {
        chunks[1]
    };

    match app.mode {
        AppMode::Search => render_search(f, app, main_area),
        AppMode::TopicConfig => render_topic_config(f, app, main_area),
        AppMode::EditConfig => {
            render_topic_config(f, app, main_area);
            render_edit_dialog(f, app);
        }
    }

    render_status_bar(f, app, chunks[2]);
    render_toasts(f, app);
}
