//! Inline topic configuration editor
//!
//! Holds the state of the edit modal for a single configuration key and
//! submits the edited value. The update request runs as a background task;
//! its outcome is picked up with [`ConfigEditor::process_updates`]. On
//! success the caller's refresh callback runs once and the modal closes. On
//! failure the modal stays open with the typed value and an inline error,
//! and the error is returned to the caller.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::ApiResult;
use crate::models::{ClusterContext, TopicConfigEdit};
use crate::traits::KbApi;

/// An open edit modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub topic: String,
    pub key: String,
    pub input: String,
    /// Message of the last failed submit
    pub error: Option<String>,
    /// A submit is waiting for the server
    pub saving: bool,
}

/// Result of a background update, tagged with the submission it answers
struct SaveUpdate {
    submission: u64,
    result: ApiResult<()>,
}

pub struct ConfigEditor {
    api: Arc<dyn KbApi>,
    cluster: ClusterContext,
    session: Option<EditSession>,
    /// Bumped on every submit, open and close; older results are ignored
    submission: u64,
    tx: mpsc::UnboundedSender<SaveUpdate>,
    rx: mpsc::UnboundedReceiver<SaveUpdate>,
}

impl ConfigEditor {
    pub fn new(api: Arc<dyn KbApi>, cluster: ClusterContext) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            cluster,
            session: None,
            submission: 0,
            tx,
            rx,
        }
    }

    /// Opens the editor for `key`, prefilled with the current value
    pub fn open(&mut self, topic: &str, key: &str, current: Option<&str>) {
        self.submission += 1;
        self.session = Some(EditSession {
            topic: topic.to_string(),
            key: key.to_string(),
            input: current.unwrap_or_default().to_string(),
            error: None,
            saving: false,
        });
    }

    /// Dismisses the editor; a pending submit's outcome is discarded
    pub fn close(&mut self) {
        self.submission += 1;
        self.session = None;
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.saving)
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// The input buffer of the open editor, unless a submit is pending
    pub fn input_mut(&mut self) -> Option<&mut String> {
        self.session
            .as_mut()
            .filter(|s| !s.saving)
            .map(|s| &mut s.input)
    }

    /// Sends the edited value in the background
    ///
    /// Returns false when nothing was sent: the editor is closed or a
    /// submit is already pending.
    pub fn submit(&mut self) -> bool {
        let Some(session) = self.session.as_mut().filter(|s| !s.saving) else {
            return false;
        };
        session.saving = true;
        session.error = None;

        self.submission += 1;
        let submission = self.submission;
        let api = Arc::clone(&self.api);
        let cluster = self.cluster.clone();
        let topic = session.topic.clone();
        let edit = TopicConfigEdit {
            key: session.key.clone(),
            value: session.input.clone(),
        };
        let tx = self.tx.clone();

        debug!(topic = %topic, key = %edit.key, "submitting topic config");
        tokio::spawn(async move {
            let result = api.update_topic_config(&cluster, &topic, &edit).await;
            let _ = tx.send(SaveUpdate { submission, result });
        });
        true
    }

    /// Applies a finished submit without blocking
    ///
    /// `on_success` runs exactly once if the server accepted the edit, then
    /// the editor closes. Returns the outcome of the submit, or `None` if
    /// none finished.
    ///
    /// # Errors
    /// A rejected edit comes back as `Some(Err(_))`. The editor stays open
    /// and records the message in [`EditSession::error`].
    pub fn process_updates<F: FnOnce()>(&mut self, on_success: F) -> Option<ApiResult<()>> {
        let mut on_success = Some(on_success);
        let mut outcome = None;
        while let Ok(update) = self.rx.try_recv() {
            if let Some(result) = self.apply(update, &mut on_success) {
                outcome = Some(result);
            }
        }
        outcome
    }

    /// Waits for the pending submit to finish and applies it
    ///
    /// Same contract as [`Self::process_updates`].
    pub async fn next_result<F: FnOnce()>(&mut self, on_success: F) -> Option<ApiResult<()>> {
        let mut on_success = Some(on_success);
        while let Some(update) = self.rx.recv().await {
            if let Some(result) = self.apply(update, &mut on_success) {
                return Some(result);
            }
        }
        None
    }

    fn apply<F: FnOnce()>(
        &mut self,
        update: SaveUpdate,
        on_success: &mut Option<F>,
    ) -> Option<ApiResult<()>> {
        if update.submission != self.submission {
            debug!(submission = update.submission, "dropping result of a dismissed edit");
            return None;
        }
        let session = self.session.as_mut()?;
        session.saving = false;

        match update.result {
            Ok(()) => {
                info!(topic = %session.topic, key = %session.key, "topic config updated");
                if let Some(callback) = on_success.take() {
                    callback();
                }
                self.session = None;
                Some(Ok(()))
            }
            Err(e) => {
                warn!(topic = %session.topic, key = %session.key, error = %e, "topic config update failed");
                session.error = Some(e.message());
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::{SearchParameters, SearchResponse, TopicInfo};
    use async_trait::async_trait;

    /// Accepts or rejects every update
    struct StubApi {
        reject: bool,
    }

    #[async_trait]
    impl KbApi for StubApi {
        async fn topic_info(&self, _: &ClusterContext, _: &str) -> ApiResult<TopicInfo> {
            Ok(TopicInfo(serde_json::Value::Null))
        }
        async fn search(&self, _: &ClusterContext, _: &SearchParameters) -> ApiResult<SearchResponse> {
            Err(ApiError::Decode("unused".to_string()))
        }
        async fn delete_search(&self, _: &ClusterContext, _: &SearchParameters) -> ApiResult<()> {
            Ok(())
        }
        async fn update_topic_config(
            &self,
            _: &ClusterContext,
            _: &str,
            _: &TopicConfigEdit,
        ) -> ApiResult<()> {
            if self.reject {
                return Err(ApiError::Status {
                    status: 400,
                    body: "Invalid value".to_string(),
                });
            }
            Ok(())
        }
    }

    fn editor(reject: bool) -> ConfigEditor {
        ConfigEditor::new(Arc::new(StubApi { reject }), ClusterContext::new("local"))
    }

    #[test]
    fn test_open_prefills_current_value() {
        let mut editor = editor(false);
        editor.open("orders", "retention.ms", Some("1000"));
        let session = editor.session().unwrap();
        assert_eq!(session.key, "retention.ms");
        assert_eq!(session.input, "1000");
        assert!(session.error.is_none());
        assert!(!session.saving);
    }

    #[test]
    fn test_open_without_value_starts_empty() {
        let mut editor = editor(false);
        editor.open("orders", "cleanup.policy", None);
        assert_eq!(editor.session().unwrap().input, "");
    }

    #[test]
    fn test_input_edit_and_close() {
        let mut editor = editor(false);
        assert!(editor.input_mut().is_none());

        editor.open("orders", "retention.ms", Some("1"));
        editor.input_mut().unwrap().push('0');
        assert_eq!(editor.session().unwrap().input, "10");

        editor.close();
        assert!(!editor.is_open());
    }

    #[test]
    fn test_submit_when_closed_sends_nothing() {
        let mut editor = editor(false);
        assert!(!editor.submit());
        assert!(editor.process_updates(|| panic!("no refresh expected")).is_none());
    }

    #[tokio::test]
    async fn test_pending_submit_locks_input() {
        let mut editor = editor(false);
        editor.open("orders", "retention.ms", Some("1"));
        assert!(editor.submit());
        assert!(editor.is_saving());
        assert!(editor.input_mut().is_none());
        assert!(!editor.submit());

        let mut refreshes = 0;
        let outcome = editor.next_result(|| refreshes += 1).await;
        assert!(matches!(outcome, Some(Ok(()))));
        assert_eq!(refreshes, 1);
        assert!(!editor.is_open());
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_input_and_error() {
        let mut editor = editor(true);
        editor.open("orders", "retention.ms", Some("-5"));
        editor.submit();

        let mut refreshes = 0;
        let outcome = editor.next_result(|| refreshes += 1).await;
        assert_eq!(outcome.unwrap().unwrap_err().message(), "Invalid value (400)");
        assert_eq!(refreshes, 0);

        let session = editor.session().unwrap();
        assert_eq!(session.input, "-5");
        assert_eq!(session.error.as_deref(), Some("Invalid value (400)"));
        assert!(!session.saving);
    }

    #[tokio::test]
    async fn test_close_discards_pending_result() {
        let mut editor = editor(false);
        editor.open("orders", "retention.ms", Some("1"));
        editor.submit();
        editor.close();

        tokio::task::yield_now().await;
        let mut refreshes = 0;
        assert!(editor.process_updates(|| refreshes += 1).is_none());
        assert_eq!(refreshes, 0);
    }
}
