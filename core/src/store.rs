//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The pipeline calls store methods; it never executes SQL directly.

use crate::{
    config::DeskConfig,
    error::{DeskError, DeskResult},
    event::EventLogEntry,
    manager::{parse_skills, resolve_manager_id, Manager},
    round_robin::DistributionResult,
    ticket::Ticket,
};
use rusqlite::{params, Connection, OptionalExtension};

const TICKET_COLUMNS: &str = "ticket_id, segment, ticket_type, sentiment, priority, language,
     office, manager, status, ai_summary";

fn ticket_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id:          row.get(0)?,
        segment:     row.get(1)?,
        ticket_type: row.get(2)?,
        sentiment:   row.get(3)?,
        priority:    row.get(4)?,
        language:    row.get(5)?,
        office:      row.get(6)?,
        manager:     row.get(7)?,
        status:      row.get(8)?,
        ai_summary:  row.get(9)?,
    })
}

fn manager_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Manager> {
    Ok(Manager {
        id:              row.get(0)?,
        name:            row.get(1)?,
        office:          row.get(2)?,
        skills:          parse_skills(&row.get::<_, String>(3)?),
        active_requests: row.get::<_, i64>(4)?.max(0) as u32,
    })
}

pub struct DeskStore {
    conn: Connection,
}

impl DeskStore {
    /// Open (or create) the desk database at `path`.
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open(path)?;
        // WAL for files; an in-memory database reports `memory` and stays so.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_desk.sql"))?;
        Ok(())
    }

    // ── Tickets ────────────────────────────────────────────────

    /// Insert tickets, skipping ids already stored. Returns the count
    /// actually inserted.
    pub fn insert_tickets(&self, batch_id: &str, tickets: &[Ticket], replace: bool) -> DeskResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        if replace {
            let removed = tx.execute("DELETE FROM ticket", [])?;
            log::info!("replace: removed {removed} stored ticket(s)");
        }
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO ticket (
                    ticket_id, batch_id, segment, ticket_type, sentiment, priority,
                    language, office, manager, status, ai_summary
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for t in tickets {
                inserted += stmt.execute(params![
                    &t.id,
                    batch_id,
                    &t.segment,
                    &t.ticket_type,
                    &t.sentiment,
                    t.priority,
                    &t.language,
                    &t.office,
                    &t.manager,
                    &t.status,
                    t.ai_summary.as_deref(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn all_tickets(&self) -> DeskResult<Vec<Ticket>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TICKET_COLUMNS} FROM ticket ORDER BY seq ASC"))?;
        let tickets = stmt
            .query_map([], ticket_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tickets)
    }

    pub fn get_ticket(&self, id: &str) -> DeskResult<Ticket> {
        self.conn
            .query_row(
                &format!("SELECT {TICKET_COLUMNS} FROM ticket WHERE ticket_id = ?1"),
                params![id],
                ticket_row_mapper,
            )
            .optional()?
            .ok_or_else(|| DeskError::TicketNotFound { id: id.to_string() })
    }

    /// Tickets with no manager yet, in insertion order.
    pub fn unassigned_tickets(&self, config: &DeskConfig) -> DeskResult<Vec<Ticket>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TICKET_COLUMNS} FROM ticket
             WHERE TRIM(manager) = '' OR TRIM(manager) = ?1
             ORDER BY seq ASC"
        ))?;
        let tickets = stmt
            .query_map(params![config.unassigned_manager.trim()], ticket_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tickets)
    }

    pub fn ticket_count(&self) -> DeskResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM ticket", [], |row| row.get(0))?;
        Ok(n)
    }

    // ── Managers ───────────────────────────────────────────────

    /// Insert managers, skipping resolved ids already stored.
    pub fn insert_managers(&self, managers: &[Manager], replace: bool) -> DeskResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        if replace {
            tx.execute("DELETE FROM manager", [])?;
        }
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO manager (
                    manager_key, manager_id, name, office, skills, active_requests
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for m in managers {
                inserted += stmt.execute(params![
                    resolve_manager_id(m),
                    m.id.as_deref(),
                    &m.name,
                    &m.office,
                    m.skills.join(", "),
                    m.active_requests as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn all_managers(&self) -> DeskResult<Vec<Manager>> {
        let mut stmt = self.conn.prepare(
            "SELECT manager_id, name, office, skills, active_requests
             FROM manager ORDER BY seq ASC",
        )?;
        let managers = stmt
            .query_map([], manager_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(managers)
    }

    // ── Distribution ───────────────────────────────────────────

    /// Persist assignments: each ticket gets its manager and the assigned
    /// status, each manager's workload grows by one per ticket.
    pub fn record_distribution(&self, result: &DistributionResult, config: &DeskConfig) -> DeskResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut set_ticket = tx.prepare(
                "UPDATE ticket SET manager = ?1, status = ?2 WHERE ticket_id = ?3",
            )?;
            let mut bump_manager = tx.prepare(
                "UPDATE manager SET active_requests = active_requests + 1 WHERE manager_key = ?1",
            )?;
            for a in &result.assignments {
                set_ticket.execute(params![&a.manager_name, &config.status_assigned, &a.ticket_id])?;
                bump_manager.execute(params![&a.manager_id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (batch_id, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.batch_id, entry.event_type, entry.payload, entry.created_at],
        )?;
        Ok(())
    }

    pub fn events_for_batch(&self, batch_id: &str) -> DeskResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, batch_id, event_type, payload, created_at
             FROM event_log WHERE batch_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![batch_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    batch_id:   row.get(1)?,
                    event_type: row.get(2)?,
                    payload:    row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
