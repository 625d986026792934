//! Scripted KB API used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kbtui::models::SearchItem;
use kbtui::{
    ApiError, ApiResult, App, ClusterContext, KbApi, SearchParameters, SearchResponse, SearchStatus,
    TopicConfigEdit, TopicInfo,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory KB API with scripted search responses
///
/// Topic configs live in a map that `update_topic_config` writes to, so a
/// refetch after an edit observes the new value.
#[derive(Default)]
pub struct ScriptedApi {
    search_script: Mutex<VecDeque<ApiResult<SearchResponse>>>,
    pub search_calls: Mutex<Vec<(ClusterContext, SearchParameters)>>,
    pub delete_calls: Mutex<Vec<SearchParameters>>,
    pub fail_delete: AtomicBool,
    topics: Mutex<HashMap<String, Value>>,
    pub topic_info_calls: AtomicUsize,
    pub update_calls: Mutex<Vec<(String, TopicConfigEdit)>>,
    pub fail_updates: AtomicBool,
    search_delay: Duration,
    update_delay: Duration,
}

impl ScriptedApi {
    pub fn with_search(script: Vec<ApiResult<SearchResponse>>) -> Self {
        let api = Self::default();
        *api.search_script.lock().unwrap() = script.into();
        api
    }

    pub fn with_topic(self, topic: &str, configs: Value) -> Self {
        self.topics
            .lock()
            .unwrap()
            .insert(topic.to_string(), json!({ "name": topic, "partitionCount": 3, "configs": configs }));
        self
    }

    /// Every search request takes `delay` to answer
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    /// Every config update takes `delay` to answer
    pub fn with_update_delay(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    pub fn search_call_count(&self) -> usize {
        self.search_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl KbApi for ScriptedApi {
    async fn topic_info(&self, _cluster: &ClusterContext, topic: &str) -> ApiResult<TopicInfo> {
        self.topic_info_calls.fetch_add(1, Ordering::SeqCst);
        self.topics
            .lock()
            .unwrap()
            .get(topic)
            .cloned()
            .map(TopicInfo)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: format!("Topic {} not found", topic),
            })
    }

    async fn search(
        &self,
        cluster: &ClusterContext,
        params: &SearchParameters,
    ) -> ApiResult<SearchResponse> {
        self.search_calls
            .lock()
            .unwrap()
            .push((cluster.clone(), params.clone()));
        let scripted = self.search_script.lock().unwrap().pop_front();
        tokio::time::sleep(self.search_delay).await;
        scripted.unwrap_or_else(|| Ok(running(vec![])))
    }

    async fn delete_search(
        &self,
        _cluster: &ClusterContext,
        params: &SearchParameters,
    ) -> ApiResult<()> {
        self.delete_calls.lock().unwrap().push(params.clone());
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "delete failed".to_string(),
            });
        }
        Ok(())
    }

    async fn update_topic_config(
        &self,
        _cluster: &ClusterContext,
        topic: &str,
        edit: &TopicConfigEdit,
    ) -> ApiResult<()> {
        self.update_calls
            .lock()
            .unwrap()
            .push((topic.to_string(), edit.clone()));
        tokio::time::sleep(self.update_delay).await;
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 400,
                body: "Invalid value".to_string(),
            });
        }
        let mut topics = self.topics.lock().unwrap();
        let doc = topics
            .entry(topic.to_string())
            .or_insert_with(|| json!({ "name": topic, "configs": {} }));
        doc["configs"][edit.key.as_str()] = Value::String(edit.value.clone());
        Ok(())
    }
}

pub fn running(data: Vec<SearchItem>) -> SearchResponse {
    SearchResponse {
        status: SearchStatus::Running,
        created_date: 1_700_000_000_000,
        completed_time: None,
        error: None,
        data,
    }
}

pub fn finished(data: Vec<SearchItem>, completed_time: u64) -> SearchResponse {
    SearchResponse {
        status: SearchStatus::Finished,
        created_date: 1_700_000_000_000,
        completed_time: Some(completed_time),
        error: None,
        data,
    }
}

pub fn item(partition: i32, offset: i64, value: &str) -> SearchItem {
    SearchItem {
        partition: Some(partition),
        offset: Some(offset),
        key: Some(json!(format!("key-{}", offset))),
        value: Some(json!(value)),
        timestamp: Some(1_700_000_000_000),
        ..SearchItem::default()
    }
}

/// Fails the test instead of hanging when a background request never reports back
pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("timed out waiting for background request")
}

/// Ticks `app` like the event loop does until `done` holds
pub async fn settle(app: &mut App, done: impl Fn(&App) -> bool) {
    within(async {
        loop {
            app.on_tick(Instant::now());
            if done(app) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
}
