//! Health check reporting.
//!
//! Builds a [`DaemonHealth`] snapshot from the pipeline's health status
//! and counters. The orchestrator logs one snapshot per health interval.

use serde::Serialize;

use logship_core::pipeline::{HealthStatus, LogSink};
use logship_log_pipeline::LogPipeline;

/// Health snapshot for the daemon.
#[derive(Debug, Clone, Serialize)]
pub struct DaemonHealth {
    /// Pipeline health status.
    pub status: HealthStatus,
    /// Daemon uptime in seconds since start.
    pub uptime_secs: u64,
    /// Entries read from the input.
    pub received: u64,
    /// Records delivered to the collector.
    pub delivered: u64,
    /// Records dropped after a failed delivery.
    pub dropped: u64,
    /// Records waiting for the next flush.
    pub pending: usize,
}

impl DaemonHealth {
    /// Snapshot the pipeline counters alongside a health status.
    pub fn from_pipeline<S: LogSink>(
        status: HealthStatus,
        uptime_secs: u64,
        pipeline: &LogPipeline<S>,
    ) -> Self {
        let stats = pipeline.stats();
        Self {
            status,
            uptime_secs,
            received: stats.received(),
            delivered: stats.delivered_records(),
            dropped: stats.dropped_records(),
            pending: pipeline.pending_count(),
        }
    }
}

/// Log a health snapshot at a level matching its status.
pub fn log_health(health: &DaemonHealth) {
    match &health.status {
        HealthStatus::Healthy => tracing::debug!(
            uptime_secs = health.uptime_secs,
            received = health.received,
            delivered = health.delivered,
            pending = health.pending,
            "daemon healthy"
        ),
        HealthStatus::Degraded(reason) => tracing::warn!(
            reason = reason.as_str(),
            dropped = health.dropped,
            pending = health.pending,
            "daemon degraded"
        ),
        HealthStatus::Unhealthy(reason) => tracing::error!(
            reason = reason.as_str(),
            "daemon unhealthy"
        ),
    }
}
