//! Shared primitive types used across the desk.

/// A ticket identifier. Non-empty and unique within a batch.
pub type TicketId = String;

/// A resolved manager identifier: the manager's id, or its name when the
/// roster entry carries no id.
pub type ManagerId = String;

/// Identifies one import or distribution run in the event log.
pub type BatchId = String;

/// Priority as carried on a ticket. Conventionally 1–10, 0 when unknown.
pub type Priority = i32;
