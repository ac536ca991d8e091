//! Lightweight in-process metrics.
//!
//! Connection and tick counters are stored as atomics and rendered by the
//! `/metrics` handler.

pub mod metrics;

pub use metrics::{ActiveGuard, FeedMode, GatewayMetrics};
