//! Search job polling controller
//!
//! Drives the search dashboard. While polling is enabled the controller
//! re-issues the status request for the current [`SearchParameters`] on a
//! fixed interval, and stops on its own once the job reports `Finished` or
//! a request fails.
//!
//! # State machine
//!
//! ```text
//!              toggle
//!   Disabled ─────────▶ Polling
//!      ▲                  │
//!      └──────────────────┘
//!   toggle | finished | error
//! ```
//!
//! Requests run as tokio tasks and report back over a channel that the UI
//! loop drains with [`SearchController::process_updates`]. At most one poll
//! is outstanding: while it runs, interval ticks wait for it instead of
//! piling up new requests. If the parameters changed since it was sent, the
//! next tick aborts it and dispatches a replacement under a new generation;
//! results from older generations are discarded. Pausing never aborts a
//! request that is already running.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::error::ApiResult;
use crate::models::{ClusterContext, SearchParameters, SearchResponse};
use crate::traits::KbApi;

/// Label of the toggle button while polling is disabled
pub const SEARCH_START_BUTTON_TEXT: &str = "Start";

/// Label of the toggle button while polling
pub const SEARCH_PAUSE_BUTTON_TEXT: &str = "Pause";

/// Polling state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Disabled,
    Polling,
}

impl PollState {
    /// Label of the start/pause button in this state
    pub fn button_label(self) -> &'static str {
        match self {
            PollState::Polling => SEARCH_PAUSE_BUTTON_TEXT,
            PollState::Disabled => SEARCH_START_BUTTON_TEXT,
        }
    }
}

/// Which search parameter an edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    TopicName,
    Value,
}

/// Messages sent from background request tasks
enum SearchUpdate {
    Fetched {
        generation: u64,
        result: ApiResult<SearchResponse>,
    },
    Deleted(ApiResult<()>),
}

/// Outcomes reported to the caller by [`SearchController::process_updates`]
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A poll returned a new response
    Updated,
    /// The job finished and polling stopped on its own
    AutoPaused,
    /// A poll failed; polling stopped. Carries the error message.
    Failed(String),
    /// The job was deleted and the cached response dropped
    Invalidated,
    /// Deleting the job failed
    DeleteFailed(String),
}

pub struct SearchController {
    api: Arc<dyn KbApi>,
    cluster: ClusterContext,
    parameters: SearchParameters,
    state: PollState,
    interval: Duration,
    last_dispatch: Option<Instant>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    fetching: bool,
    /// Parameters of the outstanding poll
    dispatched: Option<SearchParameters>,
    response: Option<SearchResponse>,
    tx: mpsc::UnboundedSender<SearchUpdate>,
    rx: mpsc::UnboundedReceiver<SearchUpdate>,
}

impl SearchController {
    pub fn new(api: Arc<dyn KbApi>, cluster: ClusterContext, interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            cluster,
            parameters: SearchParameters::default(),
            state: PollState::Disabled,
            interval,
            last_dispatch: None,
            generation: 0,
            in_flight: None,
            fetching: false,
            dispatched: None,
            response: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn is_polling(&self) -> bool {
        self.state == PollState::Polling
    }

    /// Whether a poll dispatched by this controller is still outstanding
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn parameters(&self) -> &SearchParameters {
        &self.parameters
    }

    /// Latest response received, if any
    pub fn response(&self) -> Option<&SearchResponse> {
        self.response.as_ref()
    }

    pub fn cluster(&self) -> &ClusterContext {
        &self.cluster
    }

    /// Replaces the search parameters
    ///
    /// Allowed while polling; the next poll uses the new values.
    pub fn set_parameters(&mut self, parameters: SearchParameters) {
        self.parameters = parameters;
    }

    /// Mutable access to a single parameter
    pub fn field_mut(&mut self, field: SearchField) -> &mut String {
        match field {
            SearchField::TopicName => &mut self.parameters.topic_name,
            SearchField::Value => &mut self.parameters.value,
        }
    }

    /// Label for the start/pause button
    pub fn button_label(&self) -> &'static str {
        self.state.button_label()
    }

    /// Switches between Disabled and Polling
    ///
    /// Enabling schedules a poll on the next tick. Disabling stops further
    /// polls but leaves an in-flight request running.
    pub fn toggle(&mut self) -> PollState {
        self.state = match self.state {
            PollState::Disabled => {
                self.last_dispatch = None;
                PollState::Polling
            }
            PollState::Polling => PollState::Disabled,
        };
        info!(state = ?self.state, topic = %self.parameters.topic_name, "search polling toggled");
        self.state
    }

    /// Dispatches a poll when polling is enabled and the interval elapsed
    ///
    /// A poll still outstanding for the current parameters is waited for;
    /// one sent with outdated parameters is replaced. Returns true if a
    /// request was dispatched.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != PollState::Polling {
            return false;
        }
        if self.fetching && self.dispatched.as_ref() == Some(&self.parameters) {
            return false;
        }
        let due = self
            .last_dispatch
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.dispatch(now);
        }
        due
    }

    fn dispatch(&mut self, now: Instant) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!(generation = self.generation, "replacing in-flight search poll");
            }
            handle.abort();
        }

        self.generation += 1;
        self.last_dispatch = Some(now);
        self.fetching = true;
        self.dispatched = Some(self.parameters.clone());

        let generation = self.generation;
        let api = Arc::clone(&self.api);
        let cluster = self.cluster.clone();
        let params = self.parameters.clone();
        let tx = self.tx.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let result = api.search(&cluster, &params).await;
            let _ = tx.send(SearchUpdate::Fetched { generation, result });
        }));
    }

    /// Requests deletion of the job for the current parameters
    ///
    /// Fire-and-forget: the outcome arrives later as
    /// [`SearchEvent::Invalidated`] or [`SearchEvent::DeleteFailed`]. The
    /// polling state is not touched.
    pub fn delete(&self) {
        let api = Arc::clone(&self.api);
        let cluster = self.cluster.clone();
        let params = self.parameters.clone();
        let tx = self.tx.clone();

        info!(topic = %params.topic_name, value = %params.value, "deleting search job");
        tokio::spawn(async move {
            let result = api.delete_search(&cluster, &params).await;
            let _ = tx.send(SearchUpdate::Deleted(result));
        });
    }

    /// Applies every pending update without blocking
    pub fn process_updates(&mut self) -> Vec<SearchEvent> {
        let mut events = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            self.apply(update, &mut events);
        }
        events
    }

    /// Waits for at least one update, then applies everything pending
    pub async fn next_events(&mut self) -> Vec<SearchEvent> {
        let mut events = Vec::new();
        if let Some(update) = self.rx.recv().await {
            self.apply(update, &mut events);
        }
        events.extend(self.process_updates());
        events
    }

    fn apply(&mut self, update: SearchUpdate, events: &mut Vec<SearchEvent>) {
        match update {
            SearchUpdate::Fetched { generation, result } => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "dropping stale search result");
                    return;
                }
                self.fetching = false;
                self.in_flight = None;
                self.dispatched = None;
                match result {
                    Ok(response) => events.extend(self.on_response(response)),
                    Err(e) => {
                        let message = e.message();
                        warn!(error = %e, "search poll failed");
                        self.state = PollState::Disabled;
                        events.push(SearchEvent::Failed(message));
                    }
                }
            }
            SearchUpdate::Deleted(Ok(())) => {
                self.response = None;
                events.push(SearchEvent::Invalidated);
            }
            SearchUpdate::Deleted(Err(e)) => {
                warn!(error = %e, "search delete failed");
                events.push(SearchEvent::DeleteFailed(e.message()));
            }
        }
    }

    fn on_response(&mut self, response: SearchResponse) -> Vec<SearchEvent> {
        let finished = response.status.is_finished();
        self.response = Some(response);

        let mut events = vec![SearchEvent::Updated];
        if finished && self.state == PollState::Polling {
            info!(topic = %self.parameters.topic_name, "search finished, pausing");
            events.push(SearchEvent::AutoPaused);
        }
        if finished {
            self.state = PollState::Disabled;
        }
        events
    }

    /// Derives what the dashboard should show from the current state
    pub fn view(&self) -> SearchView {
        SearchView::derive(self.response.as_ref(), self.state)
    }
}

/// Display decisions for the search dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub button_label: &'static str,
    /// Whether the stats row is shown at all
    pub has_response: bool,
    pub show_spinner: bool,
    pub completed_label: Option<String>,
    pub error: Option<String>,
    pub show_skeleton: bool,
    pub show_results: bool,
    pub show_not_found: bool,
}

impl SearchView {
    pub fn derive(response: Option<&SearchResponse>, state: PollState) -> Self {
        let polling = state == PollState::Polling;
        let button_label = state.button_label();

        let Some(resp) = response else {
            return Self {
                button_label,
                has_response: false,
                show_spinner: false,
                completed_label: None,
                error: None,
                show_skeleton: false,
                show_results: false,
                show_not_found: false,
            };
        };

        let finished = resp.status.is_finished();
        let empty = resp.data.is_empty();

        Self {
            button_label,
            has_response: true,
            show_spinner: !finished && polling,
            completed_label: resp.completed_time.map(|ms| format!("{} ms", ms)),
            error: resp.error.clone(),
            show_skeleton: !finished && empty && polling,
            show_results: !empty,
            show_not_found: finished && empty && !polling,
        }
    }
}
