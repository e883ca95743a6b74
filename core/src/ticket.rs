//! The canonical ticket record.
//!
//! Tickets are values: every stage downstream of the normalizer builds new
//! records instead of editing existing ones.

use crate::types::{Priority, TicketId};
use serde::{Deserialize, Serialize};

/// One customer service request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub segment: String,
    #[serde(rename = "type")]
    pub ticket_type: String,
    pub sentiment: String,
    pub priority: Priority,
    pub language: String,
    pub office: String,
    pub manager: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
}

impl Ticket {
    /// A blank ticket carrying only an id.
    pub fn new(id: impl Into<TicketId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Copy of this ticket handed to `manager` with the given status.
    pub fn with_manager(&self, manager: &str, status: &str) -> Self {
        Self {
            manager: manager.to_string(),
            status: status.to_string(),
            ..self.clone()
        }
    }
}
