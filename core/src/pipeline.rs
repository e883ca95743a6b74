//! The desk pipeline: wires the pure components to the store.
//!
//! IMPORT ORDER (fixed):
//!   1. CSV decoder + normalizer   (rejects rows without an id)
//!   2. Validator                  (reports duplicates, never blocks)
//!   3. Store                      (first occurrence of each id persisted)
//!   4. Event log                  (BatchImported, ValidationFailed)
//!
//! RULES:
//!   - Components never touch the store; only this module does.
//!   - Problems are reported alongside partial results, never raised.
//!   - Each run gets its own batch id.

use crate::{
    config::DeskConfig,
    error::DeskResult,
    event::{DeskEvent, EventLogEntry},
    filter::{FilterEngine, TicketFilters},
    manager::parse_managers_csv,
    normalizer::{parse_tickets_csv, IngestIssue},
    round_robin::{assign_tickets, DistributionResult},
    stats::TicketStats,
    store::DeskStore,
    ticket::Ticket,
    types::BatchId,
    validator::{first_occurrences, validate_tickets, ValidationReport},
};
use serde::Serialize;

/// What one ticket import did, for "N of M rows imported" reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub batch_id: BatchId,
    pub rows_total: usize,
    pub rows_imported: usize,
    pub parse_errors: Vec<IngestIssue>,
    pub validation: ValidationReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSummary {
    pub batch_id: BatchId,
    pub rows_total: usize,
    pub rows_imported: usize,
    pub parse_errors: Vec<IngestIssue>,
}

pub struct DeskPipeline {
    pub config: DeskConfig,
    store: DeskStore,
}

impl DeskPipeline {
    pub fn new(store: DeskStore, config: DeskConfig) -> Self {
        Self { config, store }
    }

    /// In-memory store with default config. Used by tests.
    pub fn build_test() -> DeskResult<Self> {
        let store = DeskStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(store, DeskConfig::default()))
    }

    pub fn store(&self) -> &DeskStore {
        &self.store
    }

    pub fn import_tickets(&self, text: &str, replace: bool) -> DeskResult<ImportSummary> {
        let batch_id = new_batch_id();
        let parsed = parse_tickets_csv(text);
        let validation = validate_tickets(&parsed.tickets);
        let accepted = first_occurrences(&parsed.tickets);
        let rows_imported = self.store.insert_tickets(&batch_id, &accepted, replace)?;

        self.log_event(&DeskEvent::BatchImported {
            batch_id: batch_id.clone(),
            rows_total: parsed.total_rows,
            rows_imported,
            rows_rejected: parsed.errors.len(),
        })?;
        if !validation.valid {
            self.log_event(&DeskEvent::ValidationFailed {
                batch_id: batch_id.clone(),
                issues: validation.error_messages(),
            })?;
        }

        log::info!(
            "batch {batch_id}: imported {rows_imported} of {} rows",
            parsed.total_rows
        );
        Ok(ImportSummary {
            batch_id,
            rows_total: parsed.total_rows,
            rows_imported,
            parse_errors: parsed.errors,
            validation,
        })
    }

    pub fn import_managers(&self, text: &str, replace: bool) -> DeskResult<RosterSummary> {
        let batch_id = new_batch_id();
        let parsed = parse_managers_csv(text);
        let rows_imported = self.store.insert_managers(&parsed.managers, replace)?;

        self.log_event(&DeskEvent::RosterImported {
            batch_id: batch_id.clone(),
            managers: rows_imported,
        })?;
        Ok(RosterSummary {
            batch_id,
            rows_total: parsed.total_rows,
            rows_imported,
            parse_errors: parsed.errors,
        })
    }

    /// Round-robin every unassigned ticket across the stored roster.
    pub fn distribute(&self) -> DeskResult<DistributionResult> {
        let tickets = self.store.unassigned_tickets(&self.config)?;
        let managers = self.store.all_managers()?;
        let result = assign_tickets(&tickets, &managers);
        self.store.record_distribution(&result, &self.config)?;

        self.log_event(&DeskEvent::TicketsDistributed {
            batch_id: new_batch_id(),
            assigned: result.assignments.len(),
            unassigned: result.unassigned.len(),
        })?;
        Ok(result)
    }

    /// Stored tickets passing `filters`, using the configured match mode.
    pub fn query(&self, filters: &TicketFilters) -> DeskResult<Vec<Ticket>> {
        let tickets = self.store.all_tickets()?;
        Ok(FilterEngine::new(self.config.filter_match).apply(&tickets, filters))
    }

    pub fn stats(&self) -> DeskResult<TicketStats> {
        let tickets = self.store.all_tickets()?;
        Ok(TicketStats::compute(&tickets, &self.config))
    }

    fn log_event(&self, event: &DeskEvent) -> DeskResult<()> {
        let entry = EventLogEntry::from_event(event, chrono::Utc::now().to_rfc3339())?;
        self.store.append_event(&entry)?;
        log::debug!("event {} for batch {}", entry.event_type, entry.batch_id);
        Ok(())
    }
}

fn new_batch_id() -> BatchId {
    uuid::Uuid::new_v4().to_string()
}
