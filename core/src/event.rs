//! The desk event log.
//!
//! Every import and distribution run appends events under its batch id.
//! Variants are only ever appended; stored payloads must stay readable.

use crate::types::BatchId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    BatchImported {
        batch_id: BatchId,
        rows_total: usize,
        rows_imported: usize,
        rows_rejected: usize,
    },
    ValidationFailed {
        batch_id: BatchId,
        issues: Vec<String>,
    },
    TicketsDistributed {
        batch_id: BatchId,
        assigned: usize,
        unassigned: usize,
    },
    RosterImported {
        batch_id: BatchId,
        managers: usize,
    },
}

impl DeskEvent {
    /// Stable name stored in the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            DeskEvent::BatchImported { .. }      => "batch_imported",
            DeskEvent::ValidationFailed { .. }   => "validation_failed",
            DeskEvent::TicketsDistributed { .. } => "tickets_distributed",
            DeskEvent::RosterImported { .. }     => "roster_imported",
        }
    }

    pub fn batch_id(&self) -> &str {
        match self {
            DeskEvent::BatchImported { batch_id, .. }
            | DeskEvent::ValidationFailed { batch_id, .. }
            | DeskEvent::TicketsDistributed { batch_id, .. }
            | DeskEvent::RosterImported { batch_id, .. } => batch_id,
        }
    }
}

/// A persisted event row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub batch_id: BatchId,
    pub event_type: String,
    pub payload: String, // JSON-serialized DeskEvent
    pub created_at: String,
}

impl EventLogEntry {
    pub fn from_event(event: &DeskEvent, created_at: String) -> serde_json::Result<Self> {
        Ok(Self {
            id: None,
            batch_id: event.batch_id().to_string(),
            event_type: event.type_name().to_string(),
            payload: serde_json::to_string(event)?,
            created_at,
        })
    }

    pub fn event(&self) -> serde_json::Result<DeskEvent> {
        serde_json::from_str(&self.payload)
    }
}
