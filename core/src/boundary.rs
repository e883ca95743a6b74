//! Backend boundary: listing records as the backend sends them.
//!
//! The backend may send null for any descriptive field. Nulls are turned
//! into canonical defaults here, once, so nothing past this module has to
//! branch on them.

use crate::{
    config::DeskConfig,
    manager::{parse_skills, Manager},
    ticket::Ticket,
    types::Priority,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: i64,
    #[serde(default)]
    pub client_guid: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub office_name: Option<String>,
    #[serde(default)]
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub processed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerRecord {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub office_name: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub workload: i64,
}

impl TicketRecord {
    /// `manager_name` is the joined manager display name, when known.
    pub fn into_ticket(self, manager_name: Option<&str>, config: &DeskConfig) -> Ticket {
        let manager = match (manager_name, self.manager_id) {
            (Some(name), _) => name.to_string(),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => config.unassigned_manager.clone(),
        };
        let status = if self.processed_at.is_some() {
            &config.status_processed
        } else {
            &config.status_new
        };

        Ticket {
            id: self.id.to_string(),
            segment: self.segment.unwrap_or_default(),
            ticket_type: self.ticket_type.unwrap_or_default(),
            sentiment: self.sentiment.unwrap_or_default(),
            priority: self.priority.unwrap_or(0),
            language: self.language.unwrap_or_default(),
            office: self.office_name.unwrap_or_default(),
            manager,
            status: status.clone(),
            ai_summary: self.summary.filter(|s| !s.trim().is_empty()),
        }
    }
}

impl ManagerRecord {
    pub fn into_manager(self) -> Manager {
        Manager {
            id: Some(self.id.to_string()),
            name: self.full_name,
            office: self.office_name.unwrap_or_default(),
            skills: parse_skills(self.skills.as_deref().unwrap_or("")),
            active_requests: u32::try_from(self.workload).unwrap_or(0),
        }
    }
}

/// Normalize a ticket listing, resolving manager names from the manager
/// listing by numeric id.
pub fn join_tickets(
    tickets: Vec<TicketRecord>,
    managers: &[ManagerRecord],
    config: &DeskConfig,
) -> Vec<Ticket> {
    let names: HashMap<i64, &str> = managers
        .iter()
        .map(|m| (m.id, m.full_name.as_str()))
        .collect();

    tickets
        .into_iter()
        .map(|t| {
            let name = t.manager_id.and_then(|id| names.get(&id).copied());
            t.into_ticket(name, config)
        })
        .collect()
}
