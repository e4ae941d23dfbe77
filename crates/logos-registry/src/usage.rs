//! Usage notifications for an external metering collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Emitted after each successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    /// Component that ran.
    pub component_id: String,
    /// Caller identity.
    pub caller_id: String,
    /// Capability that ran.
    pub capability: String,
    /// Completion time.
    pub timestamp: DateTime<Utc>,
}

/// Receives usage events. Delivery is fire-and-forget: errors are logged and
/// never reach the dispatch caller.
#[async_trait]
pub trait UsageSink: Send + Sync {
    /// Record one event.
    async fn record(&self, event: UsageEvent) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
