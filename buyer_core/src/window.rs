use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive `[start_ts, end_ts]` time window in epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWindow {
    pub start_ts: i64,
    pub end_ts: i64,
}

impl ScanWindow {
    pub fn new(start_ts: i64, end_ts: i64) -> Self {
        debug_assert!(start_ts <= end_ts, "window start must not be after its end");
        Self { start_ts, end_ts }
    }

    /// True when `ts` falls inside the window, both bounds included
    pub fn contains(&self, ts: i64) -> bool {
        self.start_ts <= ts && ts <= self.end_ts
    }

    /// True when `ts` is strictly older than the window start
    pub fn is_before_start(&self, ts: i64) -> bool {
        ts < self.start_ts
    }

    /// Same as [`ScanWindow::contains`] but treats a missing timestamp as outside
    pub fn contains_opt(&self, ts: Option<i64>) -> bool {
        ts.is_some_and(|ts| self.contains(ts))
    }

    pub fn start_utc(&self) -> String {
        render_utc(self.start_ts)
    }

    pub fn end_utc(&self) -> String {
        render_utc(self.end_ts)
    }
}

/// Render epoch seconds as RFC 3339 with an explicit `+00:00` offset.
///
/// Timestamps chrono cannot represent fall back to the raw number.
pub fn render_utc(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, false))
        .unwrap_or_else(|| ts.to_string())
}
