//! Observability and Metrics
//!
//! Counters for header handling, attached to a
//! [`HeaderCodec`](crate::core::codec::HeaderCodec) by the connection layer.
//!
//! Uses atomic counters for thread-safe metrics collection.

use crate::core::header::Header;
use crate::error::{HeaderError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for header operations
#[derive(Debug)]
pub struct HeaderMetrics {
    /// Total decode attempts that reached a verdict
    pub decodes_total: AtomicU64,
    /// Headers accepted
    pub decodes_success: AtomicU64,
    /// Rejected for a wrong signature
    pub invalid_signature: AtomicU64,
    /// Rejected for an unknown protocol mode
    pub invalid_protocol_mode: AtomicU64,
    /// Byte source ended mid-header
    pub truncated_input: AtomicU64,
    /// Byte source failed
    pub io_errors: AtomicU64,
    /// Errors that are not decode outcomes
    pub other_errors: AtomicU64,
    /// Headers encoded
    pub encodes_total: AtomicU64,
    /// Header bytes accepted
    pub bytes_received: AtomicU64,
    /// Header bytes emitted
    pub bytes_sent: AtomicU64,
    start_time: Instant,
}

impl HeaderMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            decodes_total: AtomicU64::new(0),
            decodes_success: AtomicU64::new(0),
            invalid_signature: AtomicU64::new(0),
            invalid_protocol_mode: AtomicU64::new(0),
            truncated_input: AtomicU64::new(0),
            io_errors: AtomicU64::new(0),
            other_errors: AtomicU64::new(0),
            encodes_total: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record the outcome of one decode
    pub fn record_decode(&self, result: &Result<Header>) {
        self.decodes_total.fetch_add(1, Ordering::Relaxed);
        let counter = match result {
            Ok(_) => {
                self.bytes_received
                    .fetch_add(crate::config::HEADER_SIZE as u64, Ordering::Relaxed);
                &self.decodes_success
            }
            Err(HeaderError::InvalidSignature(_)) => &self.invalid_signature,
            Err(HeaderError::InvalidProtocolMode(_)) => &self.invalid_protocol_mode,
            Err(HeaderError::TruncatedInput { .. }) => &self.truncated_input,
            Err(HeaderError::Io(_)) => &self.io_errors,
            Err(_) => &self.other_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an encoded header
    pub fn record_encode(&self, byte_count: u64) {
        self.encodes_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Total rejected headers across all failure kinds
    pub fn decodes_failed(&self) -> u64 {
        self.invalid_signature.load(Ordering::Relaxed)
            + self.invalid_protocol_mode.load(Ordering::Relaxed)
            + self.truncated_input.load(Ordering::Relaxed)
            + self.io_errors.load(Ordering::Relaxed)
            + self.other_errors.load(Ordering::Relaxed)
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            decodes_total: self.decodes_total.load(Ordering::Relaxed),
            decodes_success: self.decodes_success.load(Ordering::Relaxed),
            invalid_signature: self.invalid_signature.load(Ordering::Relaxed),
            invalid_protocol_mode: self.invalid_protocol_mode.load(Ordering::Relaxed),
            truncated_input: self.truncated_input.load(Ordering::Relaxed),
            io_errors: self.io_errors.load(Ordering::Relaxed),
            other_errors: self.other_errors.load(Ordering::Relaxed),
            encodes_total: self.encodes_total.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            decodes_total = snapshot.decodes_total,
            decodes_success = snapshot.decodes_success,
            invalid_signature = snapshot.invalid_signature,
            invalid_protocol_mode = snapshot.invalid_protocol_mode,
            truncated_input = snapshot.truncated_input,
            io_errors = snapshot.io_errors,
            other_errors = snapshot.other_errors,
            encodes_total = snapshot.encodes_total,
            bytes_received = snapshot.bytes_received,
            bytes_sent = snapshot.bytes_sent,
            uptime_seconds = snapshot.uptime_seconds,
            "Header metrics snapshot"
        );
    }
}

impl Default for HeaderMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub decodes_total: u64,
    pub decodes_success: u64,
    pub invalid_signature: u64,
    pub invalid_protocol_mode: u64,
    pub truncated_input: u64,
    pub io_errors: u64,
    pub other_errors: u64,
    pub encodes_total: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub uptime_seconds: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
