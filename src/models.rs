//! KB API data model
//!
//! Request and response types exchanged with the KB API, plus the
//! [`ClusterContext`] that identifies the cluster every request targets.

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The active cluster selection
///
/// Sent as the `kafka_id` header on every request. Controllers receive it
/// explicitly instead of reading shared session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterContext {
    pub kafka_id: String,
}

impl ClusterContext {
    pub fn new(kafka_id: impl Into<String>) -> Self {
        Self {
            kafka_id: kafka_id.into(),
        }
    }
}

/// Filter criteria for a search job
///
/// A job is identified by its parameters: polling and deleting with the
/// same parameters address the same server-side job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    pub topic_name: String,
    pub value: String,
}

impl SearchParameters {
    pub fn new(topic_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            topic_name: topic_name.into(),
            value: value.into(),
        }
    }
}

/// Status of a server-side search job
///
/// Statuses other than `Running` and `Finished` are kept verbatim so they
/// can be displayed as the server reported them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SearchStatus {
    Running,
    Finished,
    Other(String),
}

impl SearchStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, SearchStatus::Finished)
    }

    pub fn as_str(&self) -> &str {
        match self {
            SearchStatus::Running => "Running",
            SearchStatus::Finished => "Finished",
            SearchStatus::Other(s) => s,
        }
    }
}

impl From<String> for SearchStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Running" => SearchStatus::Running,
            "Finished" => SearchStatus::Finished,
            _ => SearchStatus::Other(s),
        }
    }
}

impl From<SearchStatus> for String {
    fn from(status: SearchStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a search job as reported by the server
///
/// `data` is only final once `status` is `Finished`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub status: SearchStatus,
    /// Job creation time in epoch milliseconds
    #[serde(deserialize_with = "deserialize_epoch_millis")]
    pub created_date: i64,
    /// Job duration in milliseconds, present once the job completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Vec<SearchItem>,
}

/// A single search hit
///
/// Fields the console knows about are typed; anything else the server
/// sends is kept in `extra` and shown in the expanded view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a topic configuration update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfigEdit {
    pub key: String,
    pub value: String,
}

/// One configuration entry of a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: Option<String>,
}

/// Topic metadata returned by `get-topic-info`
///
/// The document is treated as opaque reference data. Configuration entries
/// are extracted from a `configs`, `config` or `configEntries` member that is
/// either an object of `key -> value` or an array of `{name|key, value}`
/// records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicInfo(pub Value);

impl TopicInfo {
    pub fn config_entries(&self) -> Vec<ConfigEntry> {
        let Some(configs) = ["configs", "config", "configEntries"]
            .iter()
            .find_map(|field| self.0.get(*field))
        else {
            return Vec::new();
        };

        let mut entries: Vec<ConfigEntry> = match configs {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| ConfigEntry {
                    key: key.clone(),
                    value: scalar_to_string(value),
                })
                .collect(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| {
                    let key = item
                        .get("name")
                        .or_else(|| item.get("key"))
                        .and_then(Value::as_str)?;
                    Some(ConfigEntry {
                        key: key.to_string(),
                        value: item.get("value").and_then(scalar_to_string),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Looks up a single configuration value
    pub fn config_value(&self, key: &str) -> Option<String> {
        self.config_entries()
            .into_iter()
            .find(|e| e.key == key)
            .and_then(|e| e.value)
    }

    /// Fields other than the configuration member, for the summary panel
    pub fn summary_fields(&self) -> Vec<(String, String)> {
        let Value::Object(map) = &self.0 else {
            return Vec::new();
        };
        map.iter()
            .filter(|(k, _)| !matches!(k.as_str(), "configs" | "config" | "configEntries"))
            .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        _ => None,
    }
}

/// Accepts epoch milliseconds as a number, a numeric string or an RFC 3339
/// timestamp.
fn deserialize_epoch_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Millis::deserialize(deserializer)? {
        Millis::Int(ms) => Ok(ms),
        Millis::Float(ms) => Ok(ms as i64),
        Millis::Text(s) => {
            let s = s.trim();
            if let Ok(ms) = s.parse::<i64>() {
                return Ok(ms);
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp_millis())
                .map_err(|_| serde::de::Error::custom(format!("invalid createdDate '{}'", s)))
        }
    }
}
