//! Configuration management
//!
//! Loads and saves the console settings: the KB API location, named
//! clusters, polling and timeout settings, and recently opened topics.
//!
//! Configuration files are stored in platform-specific directories:
//! - macOS: `~/Library/Application Support/kbtui/config.yaml`
//! - Linux: `~/.config/kbtui/config.yaml`
//! - Windows: `%APPDATA%\kbtui\config.yaml`

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of recent topics remembered
const RECENT_TOPICS_LIMIT: usize = 10;

/// A named Kafka cluster known to the KB API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    /// Identifier sent as the `kafka_id` header
    pub kafka_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Application configuration
///
/// Persisted as YAML in the user's config directory. Every field has a
/// default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the KB API
    pub api_url: String,
    /// Cluster name (key of `clusters`) or raw kafka id used at startup
    pub default_cluster: Option<String>,
    pub clusters: HashMap<String, ClusterProfile>,
    /// Interval between search status polls
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// How long notifications stay on screen
    pub toast_duration_ms: u64,
    /// Search results per page
    pub page_size: usize,
    /// Most recent first
    pub recent_topics: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            default_cluster: None,
            clusters: HashMap::new(),
            poll_interval_ms: 1000,
            request_timeout_ms: 10_000,
            toast_duration_ms: 2000,
            page_size: 10,
            recent_topics: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or defaults if it does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Saves the configuration to `path`, creating parent directories
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let contents = serde_yaml::to_string(self)?;
        fs::write(path, contents).with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Returns the platform-specific configuration file path
    ///
    /// Falls back to `~/.config/kbtui/config.yaml` if platform detection fails.
    ///
    /// # Errors
    /// Returns an error if the HOME environment variable is not set (fallback case only).
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "kbtui") {
            Ok(proj_dirs.config_dir().join("config.yaml"))
        } else {
            let home = std::env::var("HOME").context("HOME not set")?;
            Ok(PathBuf::from(home).join(".config/kbtui/config.yaml"))
        }
    }

    /// Resolves a cluster name or raw id to the `kafka_id` to send
    ///
    /// Names defined in `clusters` map to their id; anything else is used
    /// as the id itself.
    pub fn resolve_cluster(&self, name_or_id: &str) -> String {
        self.clusters
            .get(name_or_id)
            .map(|c| c.kafka_id.clone())
            .unwrap_or_else(|| name_or_id.to_string())
    }

    /// Records `topic` as the most recently opened topic
    pub fn add_recent_topic(&mut self, topic: &str) {
        if topic.is_empty() {
            return;
        }
        self.recent_topics.retain(|t| t != topic);
        self.recent_topics.insert(0, topic.to_string());
        self.recent_topics.truncate(RECENT_TOPICS_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.toast_duration_ms, 2000);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "api_url: http://kb.internal/api\nclusters:\n  prod:\n    kafka_id: \"42\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "http://kb.internal/api");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.resolve_cluster("prod"), "42");
        assert_eq!(config.resolve_cluster("7"), "7");
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/kbtui/config.yaml");

        let mut config = Config::default();
        config.default_cluster = Some("prod".to_string());
        config.add_recent_topic("orders");
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "poll_interval_ms: [not a number").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_recent_topics_dedup_and_bound() {
        let mut config = Config::default();
        for i in 0..12 {
            config.add_recent_topic(&format!("t{}", i));
        }
        config.add_recent_topic("t5");
        config.add_recent_topic("");

        assert_eq!(config.recent_topics.len(), RECENT_TOPICS_LIMIT);
        assert_eq!(config.recent_topics[0], "t5");
        assert_eq!(config.recent_topics.iter().filter(|t| *t == "t5").count(), 1);
    }
}
