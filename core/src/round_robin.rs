//! Round-robin assignment engine.
//!
//! Ticket `i` goes to manager `i mod roster_len`, in input order. Workload
//! and skills are not consulted. An empty roster is a normal outcome: every
//! ticket id lands in `unassigned`.

use crate::{
    config::DeskConfig,
    manager::{resolve_manager_id, Manager},
    ticket::Ticket,
    types::{ManagerId, TicketId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAssignment {
    pub ticket_id: TicketId,
    pub manager_id: ManagerId,
    pub manager_name: String,
}

/// Every input ticket id appears exactly once, in `assignments` or in
/// `unassigned`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResult {
    pub assignments: Vec<TicketAssignment>,
    pub unassigned: Vec<TicketId>,
}

pub fn assign_tickets(tickets: &[Ticket], managers: &[Manager]) -> DistributionResult {
    if managers.is_empty() {
        if !tickets.is_empty() {
            log::warn!("no managers on roster, {} ticket(s) left unassigned", tickets.len());
        }
        return DistributionResult {
            assignments: Vec::new(),
            unassigned: tickets.iter().map(|t| t.id.clone()).collect(),
        };
    }

    let assignments = tickets
        .iter()
        .zip(managers.iter().cycle())
        .map(|(ticket, manager)| TicketAssignment {
            ticket_id: ticket.id.clone(),
            manager_id: resolve_manager_id(manager),
            manager_name: manager.name.clone(),
        })
        .collect::<Vec<_>>();

    log::debug!(
        "round robin: {} ticket(s) across {} manager(s)",
        assignments.len(),
        managers.len()
    );
    DistributionResult {
        assignments,
        unassigned: Vec::new(),
    }
}

/// New ticket records reflecting `result`. Assigned tickets carry the
/// manager's name and the assigned status; the rest come back unchanged.
pub fn apply_distribution(
    tickets: &[Ticket],
    result: &DistributionResult,
    config: &DeskConfig,
) -> Vec<Ticket> {
    let by_ticket: HashMap<&str, &TicketAssignment> = result
        .assignments
        .iter()
        .map(|a| (a.ticket_id.as_str(), a))
        .collect();

    tickets
        .iter()
        .map(|ticket| match by_ticket.get(ticket.id.as_str()) {
            Some(a) => ticket.with_manager(&a.manager_name, &config.status_assigned),
            None => ticket.clone(),
        })
        .collect()
}
