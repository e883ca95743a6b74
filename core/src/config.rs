//! Desk configuration.
//!
//! Loaded from a JSON file by the runner. Every key is optional; missing
//! keys take the values from `DeskConfig::default()`, which is also what
//! tests use.

use crate::filter::MatchMode;
use serde::{Deserialize, Serialize};

pub const DEFAULT_UNASSIGNED_MANAGER: &str = "—";
pub const DEFAULT_STATUS_NEW: &str = "Новое";
pub const DEFAULT_STATUS_ASSIGNED: &str = "Назначено";
pub const DEFAULT_STATUS_PROCESSED: &str = "Обработано";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// How `type`, `segment` and `language` facets compare against tickets.
    pub filter_match: MatchMode,
    /// Display name shown for a ticket that has no manager yet.
    pub unassigned_manager: String,
    pub status_new: String,
    pub status_assigned: String,
    pub status_processed: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            filter_match: MatchMode::IgnoreCase,
            unassigned_manager: DEFAULT_UNASSIGNED_MANAGER.into(),
            status_new: DEFAULT_STATUS_NEW.into(),
            status_assigned: DEFAULT_STATUS_ASSIGNED.into(),
            status_processed: DEFAULT_STATUS_PROCESSED.into(),
        }
    }
}

impl DeskConfig {
    /// Load from a JSON file.
    /// In tests, use DeskConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::debug!("Loaded desk config from {path}: {config:?}");
        Ok(config)
    }

    /// True when `manager` is blank or the unassigned placeholder.
    pub fn is_unassigned(&self, manager: &str) -> bool {
        let manager = manager.trim();
        manager.is_empty() || manager == self.unassigned_manager
    }
}
