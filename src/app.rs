//! Application state and input handling
//!
//! [`App`] ties the controllers together for the terminal UI: it routes key
//! events to the search dashboard, the topic configuration view and the
//! edit modal, turns controller events into notifications, and advances
//! polling on every tick of the event loop. Key handling never waits on the
//! network: requests run in the background and their outcomes are applied
//! in [`App::on_tick`].

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;
use tracing::info;

use crate::config::Config;
use crate::config_edit::ConfigEditor;
use crate::error::ApiResult;
use crate::models::ClusterContext;
use crate::notify::Notifications;
use crate::search::{SearchController, SearchEvent, SearchField};
use crate::topic_info::{TopicInfoEvent, TopicInfoQuery};
use crate::traits::KbApi;
use crate::utils::pagination::Paginator;

/// Current view of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Search dashboard
    Search,
    /// Configuration table of a topic
    TopicConfig,
    /// Edit modal over the configuration table
    EditConfig,
}

/// Focused element of the search dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Field(SearchField),
    Results,
}

pub struct App {
    pub(crate) mode: AppMode,
    pub(crate) api_url: String,
    pub(crate) cluster: ClusterContext,
    pub(crate) config: Config,
    pub(crate) search: SearchController,
    pub(crate) focus: SearchFocus,
    pub(crate) paginator: Paginator,
    /// Selected row within the current page
    pub(crate) selected_result: usize,
    /// Expanded results, by index into the full result list
    pub(crate) expanded: HashSet<usize>,
    pub(crate) topic_info: TopicInfoQuery,
    pub(crate) config_table_state: TableState,
    pub(crate) editor: ConfigEditor,
    pub(crate) notifications: Notifications,
    pub(crate) throbber: ThrobberState,
    pub(crate) show_errors: bool,
}

impl App {
    pub fn new(api: Arc<dyn KbApi>, api_url: String, cluster: ClusterContext, config: Config) -> Self {
        let search = SearchController::new(
            Arc::clone(&api),
            cluster.clone(),
            Duration::from_millis(config.poll_interval_ms),
        );
        let topic_info = TopicInfoQuery::new(Arc::clone(&api), cluster.clone());
        let editor = ConfigEditor::new(api, cluster.clone());
        let mut config_table_state = TableState::default();
        config_table_state.select(Some(0));

        App {
            mode: AppMode::Search,
            api_url,
            cluster,
            paginator: Paginator::new(config.page_size),
            notifications: Notifications::new(Duration::from_millis(config.toast_duration_ms)),
            config,
            search,
            focus: SearchFocus::Field(SearchField::TopicName),
            selected_result: 0,
            expanded: HashSet::new(),
            topic_info,
            config_table_state,
            editor,
            throbber: ThrobberState::default(),
            show_errors: false,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchController {
        &mut self.search
    }

    pub fn editor(&self) -> &ConfigEditor {
        &self.editor
    }

    pub fn topic_info(&self) -> &TopicInfoQuery {
        &self.topic_info
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Advances polling and applies finished background requests
    pub fn on_tick(&mut self, now: Instant) {
        self.search.tick(now);
        let events = self.search.process_updates();
        self.apply_search_events(events);

        let topic_info = &mut self.topic_info;
        if let Some(result) = self.editor.process_updates(|| topic_info.invalidate()) {
            self.apply_edit_result(result);
        }
        let events = self.topic_info.process_updates();
        self.apply_topic_events(events);

        self.notifications.expire(now);
        if self.search.view().show_spinner
            || self.search.is_fetching()
            || self.editor.is_saving()
            || self.topic_info.is_loading()
        {
            self.throbber.calc_next();
        }
    }

    /// Turns controller events into notifications and view resets
    pub fn apply_search_events(&mut self, events: Vec<SearchEvent>) {
        for event in events {
            match event {
                SearchEvent::Updated => {
                    let total = self.result_count();
                    self.paginator.clamp(total);
                    self.expanded.retain(|idx| *idx < total);
                    self.clamp_selection();
                }
                SearchEvent::AutoPaused => {
                    info!(topic = %self.search.parameters().topic_name, "search job finished");
                }
                SearchEvent::Failed(message) => self.notifications.error("Error", message),
                SearchEvent::Invalidated => {
                    self.paginator.reset();
                    self.expanded.clear();
                    self.selected_result = 0;
                    self.notifications.info("Deleted", "Search job removed");
                }
                SearchEvent::DeleteFailed(message) => self.notifications.error("Error", message),
            }
        }
    }

    fn result_count(&self) -> usize {
        self.search.response().map_or(0, |r| r.data.len())
    }

    fn page_len(&self) -> usize {
        self.paginator.range(self.result_count()).len()
    }

    fn clamp_selection(&mut self) {
        self.selected_result = self.selected_result.min(self.page_len().saturating_sub(1));
    }

    /// Turns topic fetch outcomes into notifications
    pub fn apply_topic_events(&mut self, events: Vec<TopicInfoEvent>) {
        for event in events {
            if let TopicInfoEvent::Failed(topic, message) = event {
                self.notifications
                    .error("Error", format!("Topic {}: {}", topic, message));
            }
        }
    }

    /// Reacts to a finished config submit
    ///
    /// On success the modal is already closed and the topic marked for
    /// refetch; the refetch is started here.
    pub fn apply_edit_result(&mut self, result: ApiResult<()>) {
        match result {
            Ok(()) => {
                if self.mode == AppMode::EditConfig {
                    self.mode = AppMode::TopicConfig;
                }
                self.notifications.info("Updated", "Topic configuration saved");
                self.topic_info.refresh_if_pending();
            }
            Err(e) => self.notifications.error("Error", e.message()),
        }
    }

    /// Switches to the configuration view of `topic`
    pub fn open_topic(&mut self, topic: &str) {
        let topic = topic.trim();
        if topic.is_empty() {
            self.notifications.error("Error", "Enter a topic name first");
            return;
        }
        self.mode = AppMode::TopicConfig;
        self.config.add_recent_topic(topic);
        self.config_table_state.select(Some(0));
        self.topic_info.load(topic);
    }

    /// Handles a key press
    ///
    /// Returns true when the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => return Ok(true),
                KeyCode::Char('e') => {
                    self.show_errors = !self.show_errors;
                    return Ok(false);
                }
                _ => {}
            }
        }

        match self.mode {
            AppMode::Search => self.handle_search_key(key),
            AppMode::TopicConfig => self.handle_topic_config_key(key),
            AppMode::EditConfig => {
                self.handle_edit_key(key);
                Ok(false)
            }
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => {
                    self.search.toggle();
                }
                KeyCode::Char('d') => {
                    if self.search.response().is_some() {
                        self.search.delete();
                    }
                }
                KeyCode::Char('o') => {
                    let topic = self.search.parameters().topic_name.clone();
                    self.open_topic(&topic);
                }
                _ => {}
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = match self.focus {
                    SearchFocus::Field(SearchField::TopicName) => {
                        SearchFocus::Field(SearchField::Value)
                    }
                    SearchFocus::Field(SearchField::Value) => SearchFocus::Results,
                    SearchFocus::Results => SearchFocus::Field(SearchField::TopicName),
                };
            }
            KeyCode::Esc => self.notifications.dismiss_latest(),
            KeyCode::PageDown => self.next_page(),
            KeyCode::PageUp => self.prev_page(),
            _ => match self.focus {
                SearchFocus::Field(field) => self.handle_field_key(field, key.code),
                SearchFocus::Results => self.handle_results_key(key.code),
            },
        }
        Ok(false)
    }

    fn handle_field_key(&mut self, field: SearchField, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                self.search.toggle();
            }
            KeyCode::Backspace => {
                self.search.field_mut(field).pop();
            }
            KeyCode::Char(c) => self.search.field_mut(field).push(c),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected_result = self.selected_result.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_result + 1 < self.page_len() {
                    self.selected_result += 1;
                }
            }
            KeyCode::Left => self.prev_page(),
            KeyCode::Right => self.next_page(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.page_len() == 0 {
                    return;
                }
                let idx = self.paginator.range(self.result_count()).start + self.selected_result;
                if !self.expanded.remove(&idx) {
                    self.expanded.insert(idx);
                }
            }
            _ => {}
        }
    }

    fn next_page(&mut self) {
        self.paginator.next(self.result_count());
        self.selected_result = 0;
    }

    fn prev_page(&mut self) {
        self.paginator.prev();
        self.selected_result = 0;
    }

    fn handle_topic_config_key(&mut self, key: KeyEvent) -> Result<bool> {
        let entries = self
            .topic_info
            .data()
            .map(|(_, info)| info.config_entries())
            .unwrap_or_default();

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc | KeyCode::Char('b') => self.mode = AppMode::Search,
            KeyCode::Char('r') => {
                self.topic_info.refetch();
            }
            KeyCode::Up => {
                let selected = self.config_table_state.selected().unwrap_or(0);
                self.config_table_state.select(Some(selected.saturating_sub(1)));
            }
            KeyCode::Down => {
                let selected = self.config_table_state.selected().unwrap_or(0);
                if selected + 1 < entries.len() {
                    self.config_table_state.select(Some(selected + 1));
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                let selected = self.config_table_state.selected().unwrap_or(0);
                let topic = self.topic_info.data().map(|(t, _)| t.to_string());
                if let (Some(entry), Some(topic)) = (entries.get(selected), topic) {
                    self.editor.open(&topic, &entry.key, entry.value.as_deref());
                    self.mode = AppMode::EditConfig;
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                // Closing while saving drops the pending outcome
                self.editor.close();
                self.mode = AppMode::TopicConfig;
            }
            KeyCode::Enter => {
                self.editor.submit();
            }
            KeyCode::Backspace => {
                if let Some(input) = self.editor.input_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.editor.input_mut() {
                    input.push(c);
                }
            }
            _ => {}
        }
    }
}
