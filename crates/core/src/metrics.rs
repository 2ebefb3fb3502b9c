//! Metrics definitions for list synchronization.
//!
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus`.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "connection_pages_fetched_total",
        "Total number of connection pages successfully fetched"
    );
    describe_counter!(
        "connection_fetch_errors_total",
        "Total number of failed connection page fetches"
    );
    describe_histogram!(
        "connection_fetch_duration_seconds",
        "Time taken to fetch a connection page in seconds"
    );
    describe_counter!(
        "load_more_skipped_total",
        "Total number of load-more requests that were no-ops"
    );
    describe_counter!(
        "stale_pages_discarded_total",
        "Total number of pages discarded because the list was unmounted"
    );
    describe_counter!(
        "edges_deduplicated_total",
        "Total number of incoming edges collapsed onto an existing node id"
    );
}

/// Record a successfully fetched page.
///
/// # Arguments
/// * `phase` - "first" or "more"
pub fn record_page_fetched(phase: &'static str) {
    counter!("connection_pages_fetched_total", "phase" => phase).increment(1);
}

/// Record a failed page fetch.
///
/// # Arguments
/// * `phase` - "first" or "more"
pub fn record_fetch_error(phase: &'static str) {
    counter!("connection_fetch_errors_total", "phase" => phase).increment(1);
}

/// Record page fetch duration.
pub fn record_fetch_duration(duration_secs: f64) {
    histogram!("connection_fetch_duration_seconds").record(duration_secs);
}

/// Record a load-more that did nothing.
///
/// # Arguments
/// * `reason` - Why the request was skipped (see [`crate::services::SkipReason`])
pub fn record_load_more_skipped(reason: &'static str) {
    counter!("load_more_skipped_total", "reason" => reason).increment(1);
}

/// Record a page that completed after unmount and was thrown away.
pub fn record_stale_page_discarded() {
    counter!("stale_pages_discarded_total").increment(1);
}

/// Record edges collapsed by de-duplication.
pub fn record_edges_deduplicated(count: u64) {
    if count > 0 {
        counter!("edges_deduplicated_total").increment(count);
    }
}

/// A timer that records fetch duration when dropped.
pub struct FetchTimer {
    start: Instant,
}

impl FetchTimer {
    /// Start a new fetch timer.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for FetchTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FetchTimer {
    fn drop(&mut self) {
        record_fetch_duration(self.start.elapsed().as_secs_f64());
    }
}
