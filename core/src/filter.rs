//! Filter engine: declarative facet filters over a ticket collection.
//!
//! A ticket passes when it satisfies every facet (AND across facets) and,
//! within a facet, any selected option (OR). An empty facet places no
//! constraint. Pure: no I/O, no state kept between calls.

use crate::{ticket::Ticket, types::Priority};
use serde::{Deserialize, Serialize};

/// User-chosen filter selections, one ordered option list per facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TicketFilters {
    #[serde(rename = "type")]
    pub ticket_type: Vec<String>,
    pub segment: Vec<String>,
    pub language: Vec<String>,
    /// Priority bucket labels, not numbers.
    pub priority_range: Vec<String>,
}

impl TicketFilters {
    pub fn is_empty(&self) -> bool {
        count_active_filters(self) == 0
    }

    /// Select `option` in a facet if absent, deselect it otherwise.
    pub fn toggle(&mut self, facet: Facet, option: &str) {
        let selected = match facet {
            Facet::Type => &mut self.ticket_type,
            Facet::Segment => &mut self.segment,
            Facet::Language => &mut self.language,
            Facet::PriorityRange => &mut self.priority_range,
        };
        match selected.iter().position(|s| s == option) {
            Some(i) => {
                selected.remove(i);
            }
            None => selected.push(option.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    Type,
    Segment,
    Language,
    PriorityRange,
}

/// How text facets compare a selected option with a ticket field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Byte-for-byte equality.
    Exact,
    /// Equality after trimming and lower-casing both sides.
    #[default]
    IgnoreCase,
}

impl MatchMode {
    fn matches(self, option: &str, value: &str) -> bool {
        match self {
            MatchMode::Exact => option == value,
            MatchMode::IgnoreCase => option.trim().to_lowercase() == value.trim().to_lowercase(),
        }
    }
}

/// The fixed priority bucket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBucket {
    Low,
    Medium,
    High,
}

impl PriorityBucket {
    pub const ALL: [PriorityBucket; 3] = [Self::Low, Self::Medium, Self::High];

    /// Closed interval covered by the bucket.
    pub fn range(self) -> (Priority, Priority) {
        match self {
            Self::Low => (1, 4),
            Self::Medium => (5, 7),
            Self::High => (8, 10),
        }
    }

    pub fn contains(self, priority: Priority) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&priority)
    }

    /// Label offered in the console, en-dash separated.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::Low => "Низкий (1–4)",
            Self::Medium => "Средний (5–7)",
            Self::High => "Высокий (8–10)",
        }
    }

    /// Resolve a bucket label. En-dash and em-dash read as a hyphen; case
    /// and surrounding whitespace are ignored. Unknown labels give `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let key = label.trim().replace(['–', '—'], "-").to_lowercase();
        match key.as_str() {
            "low" | "low (1-4)" | "низкий (1-4)" => Some(Self::Low),
            "medium" | "medium (5-7)" | "средний (5-7)" => Some(Self::Medium),
            "high" | "high (8-10)" | "высокий (8-10)" => Some(Self::High),
            _ => None,
        }
    }
}

/// Options offered per facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(rename = "type")]
    pub ticket_type: Vec<&'static str>,
    pub segment: Vec<&'static str>,
    pub language: Vec<&'static str>,
    pub priority_range: Vec<&'static str>,
}

impl FilterOptions {
    pub fn catalog() -> Self {
        Self {
            ticket_type: vec![
                "Жалоба",
                "Смена данных",
                "Консультация",
                "Претензия",
                "Неработоспособность приложения",
                "Мошеннические действия",
                "Спам",
            ],
            segment: vec!["VIP", "Priority", "Mass"],
            language: vec!["RU", "EN", "KZ"],
            priority_range: PriorityBucket::ALL.iter().map(|b| b.display_label()).collect(),
        }
    }
}

/// Filter evaluation with a chosen text match mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine {
    mode: MatchMode,
}

impl FilterEngine {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn matches(&self, ticket: &Ticket, filters: &TicketFilters) -> bool {
        self.facet(&filters.ticket_type, &ticket.ticket_type)
            && self.facet(&filters.segment, &ticket.segment)
            && self.facet(&filters.language, &ticket.language)
            && priority_matches(&filters.priority_range, ticket.priority)
    }

    /// Tickets passing every facet, in input order.
    pub fn apply(&self, tickets: &[Ticket], filters: &TicketFilters) -> Vec<Ticket> {
        tickets
            .iter()
            .filter(|t| self.matches(t, filters))
            .cloned()
            .collect()
    }

    fn facet(&self, selected: &[String], value: &str) -> bool {
        selected.is_empty() || selected.iter().any(|option| self.mode.matches(option, value))
    }
}

fn priority_matches(labels: &[String], priority: Priority) -> bool {
    labels.is_empty()
        || labels
            .iter()
            .filter_map(|label| PriorityBucket::from_label(label))
            .any(|bucket| bucket.contains(priority))
}

/// `FilterEngine` with the default match mode.
pub fn apply_filters(tickets: &[Ticket], filters: &TicketFilters) -> Vec<Ticket> {
    FilterEngine::default().apply(tickets, filters)
}

/// Number of individually selected options across all facets.
pub fn count_active_filters(filters: &TicketFilters) -> usize {
    filters.ticket_type.len()
        + filters.segment.len()
        + filters.language.len()
        + filters.priority_range.len()
}
