//! Domain events and the flat record hosts emit for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope fields shared by every event a playthrough records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Dotted type name, e.g. `playthrough.scene_requested`.
    pub event_type: String,
    /// The playthrough that recorded the event.
    pub aggregate_id: Uuid,
    /// Position within the playthrough, starting at 1.
    pub sequence_number: i64,
    /// Correlation ID of the command that led here.
    pub correlation_id: Uuid,
    /// ID of the command that caused this event.
    pub causation_id: Uuid,
    /// When the event was recorded, per the injected clock.
    pub occurred_at: DateTime<Utc>,
}

/// An event recorded by an aggregate.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the dotted type name.
    fn event_type(&self) -> &'static str;

    /// Returns the event body as JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the envelope.
    fn metadata(&self) -> &EventMetadata;
}

/// One event flattened for output: envelope fields plus the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// The recording aggregate.
    pub aggregate_id: Uuid,
    /// Dotted type name.
    pub event_type: String,
    /// Event body.
    pub payload: serde_json::Value,
    /// Position within the aggregate's events.
    pub sequence_number: i64,
    /// Correlation ID.
    pub correlation_id: Uuid,
    /// Causation ID.
    pub causation_id: Uuid,
    /// Timestamp.
    pub occurred_at: DateTime<Utc>,
}

impl EventRecord {
    /// Flattens `event` into a record.
    #[must_use]
    pub fn from_event(event: &dyn DomainEvent) -> Self {
        let meta = event.metadata();
        Self {
            event_id: meta.event_id,
            aggregate_id: meta.aggregate_id,
            event_type: event.event_type().to_owned(),
            payload: event.to_payload(),
            sequence_number: meta.sequence_number,
            correlation_id: meta.correlation_id,
            causation_id: meta.causation_id,
            occurred_at: meta.occurred_at,
        }
    }
}
