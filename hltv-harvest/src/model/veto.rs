//! Pick/ban (veto) sequence types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MapKey;

/// What happened to a map during the veto phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoAction {
    /// A team picked the map.
    Pick,
    /// A team removed the map.
    Ban,
    /// The map was left over.
    Decider,
}

impl fmt::Display for VetoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pick => write!(f, "pick"),
            Self::Ban => write!(f, "ban"),
            Self::Decider => write!(f, "decider"),
        }
    }
}

/// One line of the veto box, in observed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickBanEntry {
    /// Team name; `None` for the decider.
    pub team: Option<String>,
    /// The action taken.
    pub action: VetoAction,
    /// Map name as displayed.
    pub map: String,
    /// Key of the played map this entry refers to, once map results are known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_key: Option<MapKey>,
}

impl PickBanEntry {
    /// Creates a pick entry.
    #[must_use]
    pub fn pick(team: impl Into<String>, map: impl Into<String>) -> Self {
        Self {
            team: Some(team.into()),
            action: VetoAction::Pick,
            map: map.into(),
            map_key: None,
        }
    }

    /// Creates a ban entry.
    #[must_use]
    pub fn ban(team: impl Into<String>, map: impl Into<String>) -> Self {
        Self {
            team: Some(team.into()),
            action: VetoAction::Ban,
            map: map.into(),
            map_key: None,
        }
    }

    /// Creates a decider entry.
    #[must_use]
    pub fn decider(map: impl Into<String>) -> Self {
        Self {
            team: None,
            action: VetoAction::Decider,
            map: map.into(),
            map_key: None,
        }
    }
}

/// Accumulator folded over the veto lines.
///
/// Returned next to the parsed sequence so callers can see which maps were
/// picked, removed and left over without re-walking the entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetoSummary {
    /// Picked maps, in veto order.
    pub picked: Vec<String>,
    /// Removed maps, in veto order.
    pub removed: Vec<String>,
    /// The leftover map, if any.
    pub decider: Option<String>,
}

impl VetoSummary {
    /// Folds one entry into the summary.
    #[must_use]
    pub fn with_entry(mut self, entry: &PickBanEntry) -> Self {
        match entry.action {
            VetoAction::Pick => self.picked.push(entry.map.clone()),
            VetoAction::Ban => self.removed.push(entry.map.clone()),
            VetoAction::Decider => self.decider = Some(entry.map.clone()),
        }
        self
    }

    /// Maps that were selected to be played (picks then decider).
    #[must_use]
    pub fn map_pool(&self) -> Vec<&str> {
        self.picked
            .iter()
            .map(String::as_str)
            .chain(self.decider.as_deref())
            .collect()
    }
}
