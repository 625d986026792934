//! Modal dialogs
//!
//! The configuration edit modal: titled with the config key, prefilled
//! with the current value, showing a saving indicator while the submit is
//! pending and the last submit error inline.

use crate::app::App;
use crate::ui::helpers::centered_popup;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use throbber_widgets_tui::Throbber;

/// Renders the configuration edit modal
///
/// # Arguments
/// - `f` - The Frame to render into
/// - `app` - The application state holding the edit session
pub(crate) fn render_edit_dialog(f: &mut Frame, app: &App) {
    let Some(session) = app.editor.session() else {
        return;
    };

    let area = centered_popup(60, 9, f.area());
    f.render_widget(Clear, area);

    let mut text = vec![
        Line::from(Span::styled(
            format!("Topic: {}", session.topic),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                session.input.as_str(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    if session.saving {
        text.push(Line::from(vec![
            Throbber::default().to_symbol_span(&app.throbber),
            Span::styled("Saving...", Style::default().fg(Color::Cyan)),
        ]));
    } else if let Some(error) = &session.error {
        text.push(Line::from(Span::styled(
            format!("✗ {}", error),
            Style::default().fg(Color::Red),
        )));
    } else {
        text.push(Line::from(Span::styled(
            "Press Enter to edit, Esc to cancel",
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(session.key.as_str())
            .border_style(Style::default().fg(Color::Rgb(242, 122, 26))),
    );

    f.render_widget(paragraph, area);
}
