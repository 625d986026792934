//! KB API HTTP client
//!
//! Talks JSON over HTTP to the KB API server. Every request carries the
//! active cluster as a `kafka_id` header.
//!
//! # Endpoints
//!
//! - `GET /get-topic-info?topic={name}`
//! - `GET /search?topicName={t}&value={v}` (creates or polls a job)
//! - `DELETE /search?topicName={t}&value={v}`
//! - `POST /update-topic-config?topic={name}` with a `{key, value}` body

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::{ClusterContext, SearchParameters, SearchResponse, TopicConfigEdit, TopicInfo};
use crate::traits::KbApi;

/// Header naming the target cluster
pub const KAFKA_ID_HEADER: &str = "kafka_id";

/// Client for the KB API
pub struct KbClient {
    client: Client,
    /// Base URL without a trailing slash
    base_url: String,
}

impl KbClient {
    /// Creates a new client
    ///
    /// # Arguments
    /// - `base_url` - Base URL of the KB API (e.g., `http://localhost:8080/api`)
    /// - `timeout` - Per-request timeout
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, cluster: &ClusterContext) -> ApiResult<Response> {
        let response = request
            .header(KAFKA_ID_HEADER, &cluster.kafka_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "KB API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        cluster: &ClusterContext,
    ) -> ApiResult<T> {
        let response = self.send(request, cluster).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl KbApi for KbClient {
    async fn topic_info(&self, cluster: &ClusterContext, topic: &str) -> ApiResult<TopicInfo> {
        debug!(topic, kafka_id = %cluster.kafka_id, "fetching topic info");
        let request = self
            .client
            .get(self.url("get-topic-info"))
            .query(&[("topic", topic)]);
        self.send_json(request, cluster).await
    }

    async fn search(
        &self,
        cluster: &ClusterContext,
        params: &SearchParameters,
    ) -> ApiResult<SearchResponse> {
        debug!(topic = %params.topic_name, value = %params.value, "polling search job");
        let request = self.client.get(self.url("search")).query(params);
        self.send_json(request, cluster).await
    }

    async fn delete_search(
        &self,
        cluster: &ClusterContext,
        params: &SearchParameters,
    ) -> ApiResult<()> {
        debug!(topic = %params.topic_name, value = %params.value, "deleting search job");
        let request = self.client.delete(self.url("search")).query(params);
        self.send(request, cluster).await?;
        Ok(())
    }

    async fn update_topic_config(
        &self,
        cluster: &ClusterContext,
        topic: &str,
        edit: &TopicConfigEdit,
    ) -> ApiResult<()> {
        debug!(topic, key = %edit.key, "updating topic config");
        let request = self
            .client
            .post(self.url("update-topic-config"))
            .query(&[("topic", topic)])
            .json(edit);
        self.send(request, cluster).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = KbClient::new("http://localhost:8080/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(
            client.url("get-topic-info"),
            "http://localhost:8080/api/get-topic-info"
        );
    }
}
