//! Observability collaborator for status-transition audit events.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::actor::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    Job,
    Application,
}

/// Emitted for every job or application status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChangeEvent {
    pub entity: AuditEntity,
    pub id: String,
    pub from: &'static str,
    pub to: &'static str,
    pub actor: ActorId,
    pub at: DateTime<Utc>,
}

/// Sink for audit events. Recording is infallible from the engine's point of
/// view; a sink that forwards to an external system owns its own retries.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: StatusChangeEvent);
}
