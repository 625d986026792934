//! Display formatting utilities
//!
//! Turns timestamps, durations and JSON values from the KB API into the
//! strings shown in the dashboard, and splits text around the search
//! keyword for highlighting.

use chrono::{Local, TimeZone, Utc};
use serde_json::Value;

/// Formats epoch milliseconds as a local date and time
///
/// Returns "Invalid Date" for timestamps outside chrono's range.
pub fn format_local_datetime(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}

/// Formats epoch milliseconds as a UTC time of day, for compact lists
pub fn format_time_of_day(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Renders a JSON value on a single line
///
/// Strings are shown without quotes; null becomes "null".
pub fn value_inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('\n', " "),
        other => other.to_string(),
    }
}

/// Renders a JSON value for the expanded view
///
/// Strings holding JSON documents are parsed and pretty-printed; other
/// strings are returned unchanged.
pub fn value_pretty(value: &Value) -> String {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => {
                serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| s.clone())
            }
            _ => s.clone(),
        },
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Shortens `text` to at most `max_chars` characters, appending "..."
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Splits `text` into segments, flagging those that match `keyword`
///
/// Matching ignores ASCII case. An empty keyword yields the whole text as
/// one unmatched segment.
pub fn split_highlight<'a>(text: &'a str, keyword: &str) -> Vec<(&'a str, bool)> {
    if keyword.is_empty() || text.is_empty() {
        return vec![(text, false)];
    }

    let haystack = text.to_ascii_lowercase();
    let needle = keyword.to_ascii_lowercase();

    let mut segments = Vec::new();
    let mut cursor = 0;
    for (start, matched) in haystack.match_indices(&needle) {
        if start > cursor {
            segments.push((&text[cursor..start], false));
        }
        let end = start + matched.len();
        segments.push((&text[start..end], true));
        cursor = end;
    }
    if cursor < text.len() {
        segments.push((&text[cursor..], false));
    }
    segments
}
