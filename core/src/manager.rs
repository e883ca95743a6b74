//! Managers: assignment targets, and roster ingestion from CSV.

use crate::{
    csv_decoder,
    normalizer::{parse_leading_int, HeaderIndex, IngestIssue},
    types::ManagerId,
};
use serde::{Deserialize, Serialize};

const ID: &[&str] = &["id"];
const NAME: &[&str] = &["name", "full_name", "фио"];
const OFFICE: &[&str] = &["office", "офис"];
const SKILLS: &[&str] = &["skills", "навыки"];
const ACTIVE_REQUESTS: &[&str] = &["activerequests", "workload", "количество обращений в работе"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub office: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub active_requests: u32,
}

impl Manager {
    pub fn new(id: Option<&str>, name: &str) -> Self {
        Self {
            id: id.map(String::from),
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// The identifier a manager is assigned under: its id when present and
/// non-empty, otherwise its name.
pub fn resolve_manager_id(manager: &Manager) -> ManagerId {
    match manager.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => manager.name.clone(),
    }
}

/// Split a comma-separated skill list, dropping blanks.
pub fn parse_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterImport {
    pub managers: Vec<Manager>,
    pub errors: Vec<IngestIssue>,
    pub total_rows: usize,
}

/// Decode a manager roster. Rows without a name are rejected by line.
pub fn parse_managers_csv(text: &str) -> RosterImport {
    let decoded = match csv_decoder::decode(text) {
        Ok(decoded) => decoded,
        Err(err) => {
            log::warn!("manager csv rejected: {err}");
            return RosterImport {
                errors: vec![err.into()],
                ..RosterImport::default()
            };
        }
    };

    let headers = HeaderIndex::new(&decoded.header);
    let mut import = RosterImport {
        total_rows: decoded.rows.len(),
        errors: decoded
            .unterminated_quote
            .map(|line| IngestIssue::UnterminatedQuote { line })
            .into_iter()
            .collect(),
        ..RosterImport::default()
    };
    for row in decoded.rows.iter().filter(|r| !r.is_empty()) {
        let name = headers.value(row, NAME);
        if name.is_empty() {
            log::warn!("line {}: manager row has no name, skipped", row.line);
            import.errors.push(IngestIssue::MissingManagerName { line: row.line });
            continue;
        }
        let id = headers.value(row, ID);
        let active_requests = parse_leading_int(headers.value(row, ACTIVE_REQUESTS)).max(0);
        import.managers.push(Manager {
            id: (!id.is_empty()).then(|| id.to_string()),
            name: name.to_string(),
            office: headers.value(row, OFFICE).to_string(),
            skills: parse_skills(headers.value(row, SKILLS)),
            active_requests: active_requests as u32,
        });
    }

    log::info!(
        "parsed {} of {} manager rows",
        import.managers.len(),
        import.total_rows
    );
    import
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_falls_back_to_name() {
        assert_eq!(resolve_manager_id(&Manager::new(Some("m-1"), "Иванов")), "m-1");
        assert_eq!(resolve_manager_id(&Manager::new(None, "Иванов")), "Иванов");
        assert_eq!(resolve_manager_id(&Manager::new(Some("  "), "Иванов")), "Иванов");
    }

    #[test]
    fn skills_split_on_commas() {
        assert_eq!(parse_skills("VIP, ENG,,KZ "), vec!["VIP", "ENG", "KZ"]);
        assert!(parse_skills("").is_empty());
    }
}
