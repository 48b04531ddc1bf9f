//! Basic metrics instrumentation for the contacts API.
//!
//! Provides counters for HTTP traffic, contact writes and sync batches.
//! A snapshot is exposed by the status endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the service and the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    http_requests_total: AtomicU64,
    http_errors_total: AtomicU64,
    http_duration_total_ms: AtomicU64,
    contacts_created_total: AtomicU64,
    contacts_updated_total: AtomicU64,
    contacts_deleted_total: AtomicU64,
    sync_batches_total: AtomicU64,
    sync_added_total: AtomicU64,
    sync_skipped_total: AtomicU64,
    favorite_rejections_total: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an HTTP request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.inner.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.inner
            .http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an HTTP response with a 5xx status.
    pub fn record_http_error(&self) {
        self.inner.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_created(&self) {
        self.inner.contacts_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_updated(&self) {
        self.inner.contacts_updated_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_deleted(&self) {
        self.inner.contacts_deleted_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed sync batch.
    pub fn record_sync_batch(&self, added: usize, skipped: usize) {
        self.inner.sync_batches_total.fetch_add(1, Ordering::Relaxed);
        self.inner
            .sync_added_total
            .fetch_add(added as u64, Ordering::Relaxed);
        self.inner
            .sync_skipped_total
            .fetch_add(skipped as u64, Ordering::Relaxed);
    }

    /// Record a favorite request rejected by the quota.
    pub fn record_favorite_rejection(&self) {
        self.inner
            .favorite_rejections_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get average HTTP request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.inner.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.inner.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        let c = &self.inner;
        MetricsSummary {
            http_requests_total: c.http_requests_total.load(Ordering::Relaxed),
            http_errors_total: c.http_errors_total.load(Ordering::Relaxed),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            contacts_created_total: c.contacts_created_total.load(Ordering::Relaxed),
            contacts_updated_total: c.contacts_updated_total.load(Ordering::Relaxed),
            contacts_deleted_total: c.contacts_deleted_total.load(Ordering::Relaxed),
            sync_batches_total: c.sync_batches_total.load(Ordering::Relaxed),
            sync_added_total: c.sync_added_total.load(Ordering::Relaxed),
            sync_skipped_total: c.sync_skipped_total.load(Ordering::Relaxed),
            favorite_rejections_total: c.favorite_rejections_total.load(Ordering::Relaxed),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_avg_ms: f64,
    pub contacts_created_total: u64,
    pub contacts_updated_total: u64,
    pub contacts_deleted_total: u64,
    pub sync_batches_total: u64,
    pub sync_added_total: u64,
    pub sync_skipped_total: u64,
    pub favorite_rejections_total: u64,
}

/// Helper for timing HTTP requests.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing an HTTP request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
        self.metrics.record_http_error();
    }
}
