//! # Utility Modules
//!
//! Supporting utilities for logging and observability.
//!
//! ## Components
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Thread-safe counters for header outcomes

pub mod logging;
pub mod metrics;

pub use metrics::{HeaderMetrics, MetricsSnapshot};
