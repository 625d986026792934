//! Common trait definitions
//!
//! [`KbApi`] is the seam between the controllers and the remote KB API.
//! Production code uses [`crate::api::KbClient`]; tests substitute
//! scripted implementations.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{ClusterContext, SearchParameters, SearchResponse, TopicConfigEdit, TopicInfo};

/// Operations offered by the KB API
///
/// Every call is scoped to the cluster in `cluster`, which implementations
/// send as the `kafka_id` header.
#[async_trait]
pub trait KbApi: Send + Sync {
    /// Fetch topic metadata
    async fn topic_info(&self, cluster: &ClusterContext, topic: &str) -> ApiResult<TopicInfo>;

    /// Create or poll the search job identified by `params`
    async fn search(
        &self,
        cluster: &ClusterContext,
        params: &SearchParameters,
    ) -> ApiResult<SearchResponse>;

    /// Delete the search job identified by `params`
    async fn delete_search(
        &self,
        cluster: &ClusterContext,
        params: &SearchParameters,
    ) -> ApiResult<()>;

    /// Write a single configuration key of `topic`
    async fn update_topic_config(
        &self,
        cluster: &ClusterContext,
        topic: &str,
        edit: &TopicConfigEdit,
    ) -> ApiResult<()>;
}
