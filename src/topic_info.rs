//! Topic information query
//!
//! Caches `get-topic-info` results per topic. Cached entries never go
//! stale on their own: revisiting a topic reuses the cache and only an
//! explicit [`TopicInfoQuery::refetch`] hits the server again. While a new
//! topic loads, or when a refetch fails, the previously shown data stays
//! visible.
//!
//! Fetches run as tokio tasks; their results are applied by
//! [`TopicInfoQuery::process_updates`].

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::models::{ClusterContext, TopicInfo};
use crate::traits::KbApi;

/// Number of topics kept in the cache
const TOPIC_CACHE_SIZE: usize = 32;

struct TopicUpdate {
    topic: String,
    result: ApiResult<TopicInfo>,
}

/// Outcome of a background fetch
#[derive(Debug, Clone, PartialEq)]
pub enum TopicInfoEvent {
    Loaded(String),
    /// Carries the topic and the error message
    Failed(String, String),
}

pub struct TopicInfoQuery {
    api: Arc<dyn KbApi>,
    cluster: ClusterContext,
    cache: LruCache<String, TopicInfo>,
    /// Topic the view currently asks for
    topic: Option<String>,
    /// Data on screen; may belong to the previous topic until the new one loads
    shown: Option<(String, TopicInfo)>,
    refetch_pending: bool,
    in_flight: usize,
    tx: mpsc::UnboundedSender<TopicUpdate>,
    rx: mpsc::UnboundedReceiver<TopicUpdate>,
}

impl TopicInfoQuery {
    pub fn new(api: Arc<dyn KbApi>, cluster: ClusterContext) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            cluster,
            cache: LruCache::new(NonZeroUsize::new(TOPIC_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN)),
            topic: None,
            shown: None,
            refetch_pending: false,
            in_flight: 0,
            tx,
            rx,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Data to display along with the topic it belongs to
    pub fn data(&self) -> Option<(&str, &TopicInfo)> {
        self.shown.as_ref().map(|(t, info)| (t.as_str(), info))
    }

    /// True when the shown data belongs to a different topic than requested
    pub fn is_previous_data(&self) -> bool {
        match (&self.topic, &self.shown) {
            (Some(topic), Some((shown, _))) => topic != shown,
            _ => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Marks the current topic for refetch on the next [`Self::refresh_if_pending`]
    pub fn invalidate(&mut self) {
        self.refetch_pending = true;
    }

    pub fn is_refetch_pending(&self) -> bool {
        self.refetch_pending
    }

    /// Switches to `topic`, fetching only if it is not cached
    ///
    /// Returns true if a request was dispatched.
    pub fn load(&mut self, topic: &str) -> bool {
        self.topic = Some(topic.to_string());
        if let Some(info) = self.cache.get(topic) {
            debug!(topic, "topic info cache hit");
            self.shown = Some((topic.to_string(), info.clone()));
            return false;
        }
        self.fetch(topic.to_string());
        true
    }

    /// Fetches the current topic again, bypassing the cache
    ///
    /// Returns true if a request was dispatched.
    pub fn refetch(&mut self) -> bool {
        self.refetch_pending = false;
        let Some(topic) = self.topic.clone() else {
            return false;
        };
        self.fetch(topic);
        true
    }

    /// Runs a refetch if one was requested through [`Self::invalidate`]
    pub fn refresh_if_pending(&mut self) -> bool {
        self.refetch_pending && self.refetch()
    }

    fn fetch(&mut self, topic: String) {
        self.in_flight += 1;
        let api = Arc::clone(&self.api);
        let cluster = self.cluster.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.topic_info(&cluster, &topic).await;
            let _ = tx.send(TopicUpdate { topic, result });
        });
    }

    /// Applies every finished fetch without blocking
    pub fn process_updates(&mut self) -> Vec<TopicInfoEvent> {
        let mut events = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            events.push(self.apply(update));
        }
        events
    }

    /// Waits for at least one fetch to finish, then applies everything pending
    pub async fn next_events(&mut self) -> Vec<TopicInfoEvent> {
        let mut events = Vec::new();
        if let Some(update) = self.rx.recv().await {
            events.push(self.apply(update));
        }
        events.extend(self.process_updates());
        events
    }

    fn apply(&mut self, update: TopicUpdate) -> TopicInfoEvent {
        self.in_flight = self.in_flight.saturating_sub(1);
        let TopicUpdate { topic, result } = update;
        match result {
            Ok(info) => {
                self.cache.put(topic.clone(), info.clone());
                if self.topic.as_deref() == Some(topic.as_str()) {
                    self.shown = Some((topic.clone(), info));
                }
                TopicInfoEvent::Loaded(topic)
            }
            Err(e) => {
                warn!(topic = %topic, error = %e, "topic info fetch failed");
                TopicInfoEvent::Failed(topic, e.message())
            }
        }
    }
}
