//! The structured record extracted from one match page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{PickBanEntry, VetoSummary};
use crate::utils::Timestamp;

/// One side of a match: `{id, name, score, won}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResult {
    /// Team id.
    pub id: u64,
    /// Team display name.
    pub name: String,
    /// Series score (maps won, or rounds for a best-of-one).
    pub score: u32,
    /// Whether the page marks this team as the winner.
    pub won: bool,
}

/// The event a match belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    /// Event id.
    pub id: u64,
    /// Event name (the slug from the event link).
    pub name: String,
    /// Site-relative event link.
    pub link: String,
}

/// Terminal match states that are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// The match was conceded; no veto box, no maps played.
    Forfeit,
}

/// Match-level metadata and the veto sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMeta {
    /// Match id.
    pub match_id: u64,
    /// Event id.
    pub event_id: u64,
    /// Best-of count.
    pub best_of: u8,
    /// Stage label, e.g. "Grand final".
    pub instance: String,
    /// Whether the match was played on LAN.
    pub is_lan: bool,
    /// Kickoff time.
    pub date: Timestamp,
    /// Veto entries in page order.
    #[serde(default)]
    pub pick_bans: Vec<PickBanEntry>,
    /// Folded view of the veto entries.
    #[serde(default)]
    pub veto: VetoSummary,
    /// `Some(Forfeit)` when the page shows no veto box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
}

/// Synthetic per-map key assigned once at extraction time.
///
/// It is the ordinal of the map block on the page and is shared by the veto
/// entries, the map results and the per-map player statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapKey(pub usize);

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map#{}", self.0)
    }
}

/// Tactical side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Counter-terrorists.
    Ct,
    /// Terrorists.
    T,
}

impl Side {
    /// Both sides.
    pub const ALL: [Self; 2] = [Self::Ct, Self::T];

    /// Class marking a half-score span for this side.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Ct => "ct",
            Self::T => "t",
        }
    }
}

/// Rounds won by one team on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResults {
    /// Rounds won as CT.
    pub ct: u32,
    /// Rounds won as T.
    pub t: u32,
    /// Rounds won in overtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime: Option<u32>,
}

impl RoundResults {
    /// Adds rounds won on `side`.
    pub fn add(&mut self, side: Side, rounds: u32) {
        match side {
            Side::Ct => self.ct += rounds,
            Side::T => self.t += rounds,
        }
    }
}

/// One team's result on a played map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSide {
    /// Team name as shown on the map block.
    pub team_name: String,
    /// Rounds won.
    pub score: u32,
    /// Whether the team won the map.
    pub won: bool,
    /// Whether the team picked the map.
    pub pick: bool,
    /// Round results by side.
    pub rounds: RoundResults,
}

/// One team's result on a forfeited ("Default") map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitSide {
    /// Team name.
    pub team_name: String,
    /// Whether the team was awarded the map.
    pub won: bool,
}

/// Result of one map block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapOutcome {
    /// The map was played to completion.
    Played {
        /// Map stats id from the stats link.
        map_id: u64,
        /// Left team.
        first: MapSide,
        /// Right team.
        second: MapSide,
        /// Whether overtime was played.
        overtime: bool,
    },
    /// The map was conceded; only winner and loser are known.
    Forfeited {
        /// Left team.
        first: ForfeitSide,
        /// Right team.
        second: ForfeitSide,
    },
}

/// A map present in the record. Absent maps (voided, unplayed) have no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapResult {
    /// Synthetic key.
    pub key: MapKey,
    /// Map name, or "Default" for a forfeited map.
    pub name: String,
    /// What happened on the map.
    pub outcome: MapOutcome,
}

impl MapResult {
    /// Returns the map stats id for played maps.
    #[must_use]
    pub fn map_id(&self) -> Option<u64> {
        match self.outcome {
            MapOutcome::Played { map_id, .. } => Some(map_id),
            MapOutcome::Forfeited { .. } => None,
        }
    }

    /// Returns true if the map was played.
    #[must_use]
    pub fn is_played(&self) -> bool {
        matches!(self.outcome, MapOutcome::Played { .. })
    }
}

/// A pair of values, one per team, in page order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamPair<T> {
    /// Team 1 (left) value.
    pub first: T,
    /// Team 2 (right) value.
    pub second: T,
}

impl<T> TeamPair<T> {
    /// Creates a new pair.
    pub fn new(first: T, second: T) -> Self {
        Self { first, second }
    }
}

/// Per-player, per-side statistics on one map (or across all maps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatBlock {
    /// Player id.
    pub player_id: u64,
    /// Player nickname.
    pub nickname: String,
    /// Kills as CT.
    pub ct_kills: u32,
    /// Deaths as CT.
    pub ct_deaths: u32,
    /// Average damage per round as CT.
    pub ct_adr: f64,
    /// Kills as T.
    pub t_kills: u32,
    /// Deaths as T.
    pub t_deaths: u32,
    /// Average damage per round as T.
    pub t_adr: f64,
}

/// Player identity, captured once from the "all maps" container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// Player id.
    pub player_id: u64,
    /// Real name.
    pub name: String,
    /// Nickname.
    pub nickname: String,
    /// Nationality from the flag title.
    pub nationality: Option<String>,
}

/// All player statistics of a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchPlayerStats {
    /// Aggregate blocks across all maps.
    pub overall: TeamPair<Vec<PlayerStatBlock>>,
    /// Identities from the aggregate container only.
    pub identities: Vec<PlayerIdentity>,
    /// Per-map blocks keyed by map key.
    pub per_map: BTreeMap<MapKey, TeamPair<Vec<PlayerStatBlock>>>,
}

/// The full structured record of one match page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Left team.
    pub team1: TeamResult,
    /// Right team.
    pub team2: TeamResult,
    /// Event.
    pub event: EventRef,
    /// Metadata and veto.
    pub meta: MatchMeta,
    /// Maps present on the page, in page order.
    pub maps: Vec<MapResult>,
    /// Player statistics; `None` when the page has no stats containers.
    pub player_stats: Option<MatchPlayerStats>,
}

impl MatchRecord {
    /// Returns the match id.
    #[must_use]
    pub fn match_id(&self) -> u64 {
        self.meta.match_id
    }

    /// Returns true if the match was forfeited without a veto.
    #[must_use]
    pub fn is_forfeit(&self) -> bool {
        self.meta.status == Some(MatchStatus::Forfeit)
    }

    /// Looks up a map by key.
    #[must_use]
    pub fn map(&self, key: MapKey) -> Option<&MapResult> {
        self.maps.iter().find(|m| m.key == key)
    }

    /// Iterates over played maps.
    pub fn played_maps(&self) -> impl Iterator<Item = &MapResult> {
        self.maps.iter().filter(|m| m.is_played())
    }

    /// Returns the winning team.
    ///
    /// Uses the team `won` markers, then the winner of a forfeited map, and
    /// falls back to team 2.
    #[must_use]
    pub fn winner(&self) -> &TeamResult {
        if self.team1.won {
            return &self.team1;
        }
        if self.team2.won {
            return &self.team2;
        }

        let forfeit_winner = self.maps.iter().find_map(|m| match &m.outcome {
            MapOutcome::Forfeited { first, .. } if first.won => Some(first.team_name.as_str()),
            MapOutcome::Forfeited { second, .. } if second.won => Some(second.team_name.as_str()),
            _ => None,
        });

        match forfeit_winner {
            Some(name) if name == self.team1.name => &self.team1,
            _ => &self.team2,
        }
    }

    /// Returns the winning team id.
    #[must_use]
    pub fn winner_id(&self) -> u64 {
        self.winner().id
    }

    /// Returns both team ids in page order.
    #[must_use]
    pub fn team_ids(&self) -> TeamPair<u64> {
        TeamPair::new(self.team1.id, self.team2.id)
    }
}
