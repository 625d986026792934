//! Status bar, error panel and toasts
//!
//! Handles the rendering of the status bar (showing keyboard shortcuts),
//! the error log panel and the notification toasts.

use crate::app::{App, AppMode, SearchFocus};
use crate::notify::ToastLevel;
use crate::ui::helpers::toast_slot;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Width of a toast in columns
const TOAST_WIDTH: u16 = 40;

/// Height of a toast in rows
const TOAST_HEIGHT: u16 = 4;

/// Renders the status bar with context-appropriate keyboard shortcuts
///
/// # Arguments
/// - `f` - The Frame to render into
/// - `app` - The application state
/// - `area` - The screen area to render in
pub(crate) fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let shortcuts_text = match app.mode {
        AppMode::Search => match app.focus {
            SearchFocus::Field(_) => {
                "[Tab] Next  [Enter/Ctrl+S] Start/Pause  [Ctrl+O] Topic config  [Ctrl+D] Delete  [Ctrl+Q] Quit"
            }
            SearchFocus::Results => {
                "[↑↓] Nav  [Space] Expand  [←→] Page  [Tab] Inputs  [Ctrl+S] Start/Pause  [Ctrl+Q] Quit"
            }
        },
        AppMode::TopicConfig => "[↑↓] Nav  [e/Enter] Edit  [r] Refresh  [Esc] Back  [q] Quit",
        AppMode::EditConfig => "[Enter] Edit  [Esc] Cancel",
    };

    let status_bar = Paragraph::new(shortcuts_text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        );

    f.render_widget(status_bar, area);
}

/// Renders the error log panel
///
/// Displays the most recent errors (up to 20), newest first.
pub(crate) fn render_error_panel(f: &mut Frame, app: &App, area: Rect) {
    let errors = app.notifications.errors();
    let title = format!("Errors ({}) - Ctrl+E to hide", errors.len());

    let items: Vec<ListItem> = errors
        .iter()
        .rev()
        .take(20)
        .map(|(timestamp, error)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", timestamp.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(error.as_str(), Style::default().fg(Color::Red)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Red)),
    );

    f.render_widget(list, area);
}

/// Renders active toasts stacked from the top-right corner
pub(crate) fn render_toasts(f: &mut Frame, app: &App) {
    let screen = f.area();
    for (index, toast) in app.notifications.toasts().iter().rev().enumerate() {
        let Some(area) = toast_slot(TOAST_WIDTH, TOAST_HEIGHT, index as u16, screen) else {
            break;
        };
        let color = match toast.level {
            ToastLevel::Info => Color::Green,
            ToastLevel::Error => Color::Red,
        };

        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(toast.description.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(toast.title.as_str())
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(paragraph, area);
    }
}
