//! Synthetic tickets and rosters for demos and load checks.
//!
//! Deterministic: the same seed yields byte-identical CSV.

use crate::{
    config::DEFAULT_STATUS_NEW,
    filter::FilterOptions,
    manager::Manager,
    name_generator::NameGenerator,
    rng::{RngBank, SeededRng, StreamSlot},
    ticket::Ticket,
};

const SEGMENTS: &[(&str, f64)] = &[("Mass", 0.7), ("Priority", 0.2), ("VIP", 0.1)];
const LANGUAGES: &[(&str, f64)] = &[("RU", 0.6), ("KZ", 0.3), ("EN", 0.1)];
const SENTIMENTS: &[&str] = &["Позитивная", "Нейтральная", "Негативная"];
const OFFICES: &[&str] = &["Алматы", "Астана", "Шымкент", "Караганда", "Актобе"];
const SKILLS: &[&str] = &["VIP", "ENG", "KZ"];
const SUMMARIES: &[&str] = &[
    "Клиент сообщает о задержке, требуется связаться с клиентом.",
    "Вопрос по условиям вклада, подготовить консультацию.",
    "Не проходит вход в приложение, передать в техподдержку.",
    "Претензия по комиссии, проверить списания.",
];

pub struct SampleGenerator {
    bank: RngBank,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            bank: RngBank::new(seed),
        }
    }

    /// `count` unassigned tickets with ids "1".."count".
    pub fn tickets(&self, count: usize) -> Vec<Ticket> {
        let mut rng = self.bank.for_stream(StreamSlot::Tickets);
        let types = FilterOptions::catalog().ticket_type;
        (1..=count)
            .map(|n| Ticket {
                id: n.to_string(),
                segment: rng.pick_weighted(SEGMENTS).to_string(),
                ticket_type: rng.pick(&types).to_string(),
                sentiment: rng.pick(SENTIMENTS).to_string(),
                priority: rng.range_inclusive(1, 10),
                language: rng.pick_weighted(LANGUAGES).to_string(),
                office: rng.pick(OFFICES).to_string(),
                manager: String::new(),
                status: DEFAULT_STATUS_NEW.to_string(),
                ai_summary: rng.chance(0.6).then(|| rng.pick(SUMMARIES).to_string()),
            })
            .collect()
    }

    /// `count` managers with ids "m-1".."m-count".
    pub fn managers(&self, count: usize) -> Vec<Manager> {
        let mut rng = self.bank.for_stream(StreamSlot::Managers);
        (1..=count)
            .map(|n| Manager {
                id: Some(format!("m-{n}")),
                name: NameGenerator::generate_display_name(&mut rng),
                office: rng.pick(OFFICES).to_string(),
                skills: pick_skills(&mut rng),
                active_requests: rng.next_u64_below(6) as u32,
            })
            .collect()
    }
}

fn pick_skills(rng: &mut SeededRng) -> Vec<String> {
    SKILLS
        .iter()
        .filter(|_| rng.chance(0.4))
        .map(|s| s.to_string())
        .collect()
}

pub fn encode_tickets_csv(tickets: &[Ticket]) -> String {
    let header = [
        "id", "segment", "type", "sentiment", "priority", "language", "office", "manager",
        "status", "aiSummary",
    ];
    let rows = tickets.iter().map(|t| {
        vec![
            t.id.clone(),
            t.segment.clone(),
            t.ticket_type.clone(),
            t.sentiment.clone(),
            t.priority.to_string(),
            t.language.clone(),
            t.office.clone(),
            t.manager.clone(),
            t.status.clone(),
            t.ai_summary.clone().unwrap_or_default(),
        ]
    });
    encode(&header, rows)
}

pub fn encode_managers_csv(managers: &[Manager]) -> String {
    let header = ["id", "name", "office", "skills", "activeRequests"];
    let rows = managers.iter().map(|m| {
        vec![
            m.id.clone().unwrap_or_default(),
            m.name.clone(),
            m.office.clone(),
            m.skills.join(", "),
            m.active_requests.to_string(),
        ]
    });
    encode(&header, rows)
}

fn encode(header: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let mut out = header.join(",");
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = row.iter().map(|f| encode_field(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

// The decoder has no escape for a literal quote, so quotes become
// apostrophes.
fn encode_field(value: &str) -> String {
    let value = value.replace('"', "'");
    if value.contains([',', '\n', '\r']) {
        format!("\"{value}\"")
    } else {
        value
    }
}
