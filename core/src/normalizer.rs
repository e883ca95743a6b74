//! Ticket normalizer: decoded CSV rows to canonical `Ticket` records.
//!
//! Header matching is case-insensitive and bilingual. Each canonical field
//! accepts a fixed set of aliases; the first alias with a non-empty value
//! wins. Missing text fields become "", a missing or non-numeric priority
//! becomes 0. A row with no id is rejected and reported by line number.

use crate::{
    csv_decoder::{self, CsvRow, DecodeError},
    ticket::Ticket,
    types::Priority,
};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;

const ID: &[&str] = &["id", "id обращения"];
const SEGMENT: &[&str] = &["segment", "сегмент"];
const TYPE: &[&str] = &["type", "тип"];
const SENTIMENT: &[&str] = &["sentiment", "тональность"];
const PRIORITY: &[&str] = &["priority", "приоритет"];
const LANGUAGE: &[&str] = &["language", "язык"];
const OFFICE: &[&str] = &["office", "офис"];
const MANAGER: &[&str] = &["manager", "менеджер"];
const STATUS: &[&str] = &["status", "статус"];
const AI_SUMMARY: &[&str] = &["aisummary", "ai_summary", "ии summary"];

/// A problem found while turning CSV text into records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestIssue {
    #[error("File is empty or contains only a header")]
    EmptyFile,

    #[error("Line {line}: could not map row (id is required)")]
    MissingId { line: usize },

    #[error("Line {line}: could not map row (manager name is required)")]
    MissingManagerName { line: usize },

    #[error("Line {line}: quote is never closed; rows from here were read line by line")]
    UnterminatedQuote { line: usize },
}

impl From<DecodeError> for IngestIssue {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::TooShort { .. } => IngestIssue::EmptyFile,
        }
    }
}

impl Serialize for IngestIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of the CSV-to-tickets path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketImport {
    pub tickets: Vec<Ticket>,
    pub errors: Vec<IngestIssue>,
    /// Non-blank data rows seen, header excluded. Rows of empty fields
    /// count here even though they yield neither a ticket nor an error.
    pub total_rows: usize,
}

impl TicketImport {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Lower-cased header name to column index. A repeated header resolves to
/// its last column.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(header: &[String]) -> Self {
        let columns = header
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        Self { columns }
    }

    /// First non-empty value among `aliases`, or "".
    pub fn value<'r>(&self, row: &'r CsvRow, aliases: &[&str]) -> &'r str {
        aliases
            .iter()
            .filter_map(|alias| self.columns.get(*alias))
            .map(|&i| row.field(i))
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }
}

/// Map one data row to a ticket. `None` when the id is empty.
pub fn normalize_row(headers: &HeaderIndex, row: &CsvRow) -> Option<Ticket> {
    let id = headers.value(row, ID);
    if id.is_empty() {
        return None;
    }
    let text = |aliases: &[&str]| headers.value(row, aliases).to_string();
    let summary = headers.value(row, AI_SUMMARY);

    Some(Ticket {
        id: id.to_string(),
        segment: text(SEGMENT),
        ticket_type: text(TYPE),
        sentiment: text(SENTIMENT),
        priority: parse_leading_int(headers.value(row, PRIORITY)),
        language: text(LANGUAGE),
        office: text(OFFICE),
        manager: text(MANAGER),
        status: text(STATUS),
        ai_summary: (!summary.is_empty()).then(|| summary.to_string()),
    })
}

/// Decode and normalize a whole CSV document.
pub fn parse_tickets_csv(text: &str) -> TicketImport {
    let decoded = match csv_decoder::decode(text) {
        Ok(decoded) => decoded,
        Err(err) => {
            log::warn!("ticket csv rejected: {err}");
            return TicketImport {
                errors: vec![err.into()],
                ..TicketImport::default()
            };
        }
    };

    let headers = HeaderIndex::new(&decoded.header);
    let mut import = TicketImport {
        total_rows: decoded.rows.len(),
        errors: decoded
            .unterminated_quote
            .map(|line| IngestIssue::UnterminatedQuote { line })
            .into_iter()
            .collect(),
        ..TicketImport::default()
    };
    for row in decoded.rows.iter().filter(|r| !r.is_empty()) {
        match normalize_row(&headers, row) {
            Some(ticket) => import.tickets.push(ticket),
            None => {
                log::warn!("line {}: ticket row has no id, skipped", row.line);
                import.errors.push(IngestIssue::MissingId { line: row.line });
            }
        }
    }

    log::info!(
        "parsed {} of {} ticket rows ({} rejected)",
        import.tickets.len(),
        import.total_rows,
        import.errors.len(),
    );
    import
}

/// Integer prefix of `s` after leading whitespace, with an optional sign.
/// Anything without leading digits, or out of range, reads as 0.
pub(crate) fn parse_leading_int(s: &str) -> Priority {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits_len = s[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len() - sign_len);
    if digits_len == 0 {
        return 0;
    }
    s[..sign_len + digits_len].parse().unwrap_or(0)
}
