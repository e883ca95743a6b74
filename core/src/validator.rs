//! Ticket validator: structural checks over an already-normalized batch.
//!
//! Never mutates the batch and never fails; it only reports.

use crate::ticket::Ticket;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// `position` is the 1-based position of the ticket in the batch.
    #[error("Row {position}: missing id")]
    MissingId { position: usize },

    #[error("Duplicate id: {id}")]
    DuplicateId { id: String },
}

impl Serialize for ValidationIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Flag empty ids and every repeat of an id after its first occurrence.
/// Ids are compared exactly as given, so a repeated empty id is both
/// missing and a duplicate.
pub fn validate_tickets(tickets: &[Ticket]) -> ValidationReport {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (idx, ticket) in tickets.iter().enumerate() {
        let id = ticket.id.as_str();
        if id.is_empty() {
            errors.push(ValidationIssue::MissingId { position: idx + 1 });
        }
        if !seen.insert(id) {
            errors.push(ValidationIssue::DuplicateId { id: id.to_string() });
        }
    }

    if !errors.is_empty() {
        log::warn!("validation found {} issue(s) in {} tickets", errors.len(), tickets.len());
    }
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Keep the first ticket for each non-empty id, in order.
pub fn first_occurrences(tickets: &[Ticket]) -> Vec<Ticket> {
    let mut seen: HashSet<&str> = HashSet::new();
    tickets
        .iter()
        .filter(|t| !t.id.is_empty() && seen.insert(t.id.as_str()))
        .cloned()
        .collect()
}
