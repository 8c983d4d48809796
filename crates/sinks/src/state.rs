//! Sink state reporting types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Error value published by a sink worker.
///
/// Published whole (message and timestamp together) through an atomic
/// pointer swap, so readers never observe a half-updated error.
#[derive(Debug, Clone)]
pub struct LastError {
    pub message: String,
    pub at: DateTime<Utc>,
}

impl LastError {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Point-in-time snapshot of one sink for health/telemetry consumers.
///
/// Best-effort: fields are read from independent atomics and need not be
/// mutually consistent.
#[derive(Debug, Clone, Serialize)]
pub struct SinkState {
    /// Human-readable sink name
    pub name: String,

    /// Routing namespace, empty for cluster sinks
    pub namespace: String,

    /// Last successful send, UTC; the epoch when nothing was ever sent
    pub last_successful_send: DateTime<Utc>,

    /// Most recent delivery error, absent after a successful send
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
