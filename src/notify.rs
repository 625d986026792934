//! Transient notifications and the error history
//!
//! Toasts are shown in the top-right corner for a fixed duration and then
//! dropped. Error toasts are also kept in a bounded history that backs the
//! error panel.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Maximum number of errors kept in the history
const ERROR_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub description: String,
    created: Instant,
}

pub struct Notifications {
    toasts: Vec<Toast>,
    errors: VecDeque<(DateTime<Utc>, String)>,
    duration: Duration,
}

impl Notifications {
    pub fn new(duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            errors: VecDeque::with_capacity(ERROR_HISTORY_LIMIT),
            duration,
        }
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(ToastLevel::Info, title.into(), description.into());
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        let description = description.into();
        if self.errors.len() >= ERROR_HISTORY_LIMIT {
            self.errors.pop_front();
        }
        self.errors.push_back((Utc::now(), description.clone()));
        self.push(ToastLevel::Error, title.into(), description);
    }

    fn push(&mut self, level: ToastLevel, title: String, description: String) {
        self.toasts.push(Toast {
            level,
            title,
            description,
            created: Instant::now(),
        });
    }

    /// Drops toasts older than the configured duration
    pub fn expire(&mut self, now: Instant) {
        let duration = self.duration;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created) < duration);
    }

    /// Closes the newest toast
    pub fn dismiss_latest(&mut self) {
        self.toasts.pop();
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn errors(&self) -> &VecDeque<(DateTime<Utc>, String)> {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_goes_to_history_and_toasts() {
        let mut n = Notifications::new(Duration::from_millis(2000));
        n.error("Error", "connection refused");
        n.info("Deleted", "search removed");

        assert_eq!(n.toasts().len(), 2);
        assert_eq!(n.errors().len(), 1);
        assert_eq!(n.errors()[0].1, "connection refused");
    }

    #[test]
    fn test_expire_drops_old_toasts() {
        let mut n = Notifications::new(Duration::from_millis(2000));
        n.info("a", "b");
        n.expire(Instant::now());
        assert_eq!(n.toasts().len(), 1);

        n.expire(Instant::now() + Duration::from_millis(2500));
        assert!(n.toasts().is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut n = Notifications::new(Duration::from_millis(10));
        for i in 0..150 {
            n.error("Error", format!("e{}", i));
        }
        assert_eq!(n.errors().len(), ERROR_HISTORY_LIMIT);
        assert_eq!(n.errors().front().unwrap().1, "e50");
    }
}
