//! Thread-safe metrics collection system
//!
//! Atomic counters for request flow and mutex-protected maps for per-kind and
//! per-handler tallies. Served as JSON from `/metrics`.

use crate::protocol::RequestKind;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

const MAX_TIMING_SAMPLES: usize = 1000;

/// Thread-safe metrics collector using atomics and mutexes
pub struct MetricsCollector {
    // Request flow
    requests_received: AtomicU64,
    requests_completed: AtomicU64,
    requests_rejected: AtomicU64,
    errors_handled: AtomicU64,
    errors_unhandled: AtomicU64,

    // Phonetic API
    phonetic_calls: AtomicU64,
    phonetic_failures: AtomicU64,
    phonetic_times: Mutex<Vec<u64>>,

    // Breakdown by request type and by handler
    requests_by_kind: Mutex<HashMap<String, u64>>,
    handler_hits: Mutex<HashMap<String, u64>>,

    processing_times: Mutex<Vec<u64>>, // in milliseconds
    uptime_start: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            requests_received: AtomicU64::new(0),
            requests_completed: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
            errors_handled: AtomicU64::new(0),
            errors_unhandled: AtomicU64::new(0),
            phonetic_calls: AtomicU64::new(0),
            phonetic_failures: AtomicU64::new(0),
            phonetic_times: Mutex::new(Vec::new()),
            requests_by_kind: Mutex::new(HashMap::new()),
            handler_hits: Mutex::new(HashMap::new()),
            processing_times: Mutex::new(Vec::new()),
            uptime_start: AtomicU64::new(current_timestamp()),
        }
    }

    /// Every unrecognized request type shares the "Other" bucket
    pub fn request_received(&self, kind: &RequestKind) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
        let label = match kind {
            RequestKind::Other(_) => "Other",
            known => known.as_str(),
        };
        if let Ok(mut kinds) = self.requests_by_kind.lock() {
            *kinds.entry(label.to_string()).or_insert(0) += 1;
        }
    }

    pub fn request_completed(&self, duration: Duration) {
        self.requests_completed.fetch_add(1, Ordering::Relaxed);
        Self::push_sample(&self.processing_times, duration);
    }

    /// Refused before dispatch (bad body, stale timestamp, wrong application)
    pub fn request_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn handler_matched(&self, handler_name: &str) {
        if let Ok(mut hits) = self.handler_hits.lock() {
            *hits.entry(handler_name.to_string()).or_insert(0) += 1;
        }
    }

    pub fn error_handled(&self) {
        self.errors_handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn error_unhandled(&self) {
        self.errors_unhandled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn phonetic_call(&self, duration: Duration, success: bool) {
        self.phonetic_calls.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.phonetic_failures.fetch_add(1, Ordering::Relaxed);
        }
        Self::push_sample(&self.phonetic_times, duration);
    }

    fn push_sample(samples: &Mutex<Vec<u64>>, duration: Duration) {
        if let Ok(mut times) = samples.lock() {
            times.push(duration.as_millis() as u64);

            if times.len() > MAX_TIMING_SAMPLES {
                times.remove(0);
            }
        }
    }

    /// Average, p50, p95, p99 of a sample buffer
    fn timing_statistics(samples: &Mutex<Vec<u64>>) -> (f64, f64, f64, f64) {
        let Ok(times) = samples.lock() else {
            return (0.0, 0.0, 0.0, 0.0);
        };
        if times.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }

        let mut sorted_times = times.clone();
        sorted_times.sort_unstable();

        let avg = sorted_times.iter().sum::<u64>() as f64 / sorted_times.len() as f64;
        (
            avg,
            percentile(&sorted_times, 50.0),
            percentile(&sorted_times, 95.0),
            percentile(&sorted_times, 99.0),
        )
    }

    fn snapshot_map(map: &Mutex<HashMap<String, u64>>) -> HashMap<String, u64> {
        map.lock().map(|m| m.clone()).unwrap_or_default()
    }

    // Reset all metrics (useful for testing)
    pub fn reset(&self) {
        self.requests_received.store(0, Ordering::Relaxed);
        self.requests_completed.store(0, Ordering::Relaxed);
        self.requests_rejected.store(0, Ordering::Relaxed);
        self.errors_handled.store(0, Ordering::Relaxed);
        self.errors_unhandled.store(0, Ordering::Relaxed);
        self.phonetic_calls.store(0, Ordering::Relaxed);
        self.phonetic_failures.store(0, Ordering::Relaxed);
        self.uptime_start
            .store(current_timestamp(), Ordering::Relaxed);

        for samples in [&self.processing_times, &self.phonetic_times] {
            if let Ok(mut times) = samples.lock() {
                times.clear();
            }
        }
        for map in [&self.requests_by_kind, &self.handler_hits] {
            if let Ok(mut m) = map.lock() {
                m.clear();
            }
        }
    }

    /// Get complete metrics snapshot
    pub fn get_metrics(&self) -> MetricsSnapshot {
        let now = current_timestamp();
        let (avg_processing_time_ms, p50, p95, p99) =
            Self::timing_statistics(&self.processing_times);
        let (avg_phonetic_time_ms, _, phonetic_p95, _) =
            Self::timing_statistics(&self.phonetic_times);

        MetricsSnapshot {
            requests: RequestMetrics {
                received: self.requests_received.load(Ordering::Relaxed),
                completed: self.requests_completed.load(Ordering::Relaxed),
                rejected: self.requests_rejected.load(Ordering::Relaxed),
                errors_handled: self.errors_handled.load(Ordering::Relaxed),
                errors_unhandled: self.errors_unhandled.load(Ordering::Relaxed),
                by_kind: Self::snapshot_map(&self.requests_by_kind),
                by_handler: Self::snapshot_map(&self.handler_hits),
                avg_processing_time_ms,
                processing_time_p50_ms: p50,
                processing_time_p95_ms: p95,
                processing_time_p99_ms: p99,
            },
            phonetic: PhoneticMetrics {
                calls: self.phonetic_calls.load(Ordering::Relaxed),
                failures: self.phonetic_failures.load(Ordering::Relaxed),
                avg_call_time_ms: avg_phonetic_time_ms,
                call_time_p95_ms: phonetic_p95,
            },
            uptime_seconds: now.saturating_sub(self.uptime_start.load(Ordering::Relaxed)),
            timestamp: now,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub requests: RequestMetrics,
    pub phonetic: PhoneticMetrics,
    pub uptime_seconds: u64,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
pub struct RequestMetrics {
    pub received: u64,
    pub completed: u64,
    pub rejected: u64,
    pub errors_handled: u64,
    pub errors_unhandled: u64,
    pub by_kind: HashMap<String, u64>,
    pub by_handler: HashMap<String, u64>,
    pub avg_processing_time_ms: f64,
    pub processing_time_p50_ms: f64,
    pub processing_time_p95_ms: f64,
    pub processing_time_p99_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct PhoneticMetrics {
    pub calls: u64,
    pub failures: u64,
    pub avg_call_time_ms: f64,
    pub call_time_p95_ms: f64,
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn percentile(sorted_data: &[u64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let len = sorted_data.len();
    let index = (percentile / 100.0) * (len - 1) as f64;

    if index.fract() == 0.0 {
        sorted_data[index as usize] as f64
    } else {
        let lower_value = sorted_data[index.floor() as usize] as f64;
        let upper_value = sorted_data[index.ceil() as usize] as f64;

        lower_value + (upper_value - lower_value) * index.fract()
    }
}
