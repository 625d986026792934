//! kbtui library
//!
//! Core of the terminal console for the KB API: the HTTP client, the search
//! polling controller, the topic configuration editor and the views built
//! on them. Modules are exposed for integration testing.

pub mod api;
pub mod app;
pub mod config;
pub mod config_edit;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod search;
pub mod topic_info;
pub mod traits;
pub mod ui;
pub mod utils;

// Re-export commonly used types for testing
pub use api::KbClient;
pub use app::{App, AppMode};
pub use config::Config;
pub use config_edit::ConfigEditor;
pub use error::{ApiError, ApiResult};
pub use models::{ClusterContext, SearchParameters, SearchResponse, SearchStatus, TopicConfigEdit, TopicInfo};
pub use search::{PollState, SearchController, SearchEvent, SearchView};
pub use topic_info::{TopicInfoEvent, TopicInfoQuery};
pub use traits::KbApi;
