//! Ticket statistics for the console summary.

use crate::{config::DeskConfig, ticket::Ticket};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub total: usize,
    pub processed: usize,
    pub unassigned: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_sentiment: BTreeMap<String, usize>,
    pub by_office: BTreeMap<String, usize>,
    pub by_language: BTreeMap<String, usize>,
}

impl TicketStats {
    pub fn compute(tickets: &[Ticket], config: &DeskConfig) -> Self {
        let mut stats = TicketStats {
            total: tickets.len(),
            ..Self::default()
        };
        for t in tickets {
            if t.status == config.status_processed {
                stats.processed += 1;
            }
            if config.is_unassigned(&t.manager) {
                stats.unassigned += 1;
            }
            bump(&mut stats.by_type, &t.ticket_type);
            bump(&mut stats.by_sentiment, &t.sentiment);
            bump(&mut stats.by_office, &t.office);
            bump(&mut stats.by_language, &t.language);
        }
        stats
    }
}

// Empty values are not counted.
fn bump(counts: &mut BTreeMap<String, usize>, key: &str) {
    if !key.is_empty() {
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
}
