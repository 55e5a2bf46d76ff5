//! Flat row shapes of the warehouse tables.

use serde::{Deserialize, Serialize};

use crate::utils::Timestamp;

/// A flat row with a fixed column order.
pub trait Row: Serialize {
    /// Table name.
    const TABLE: &'static str;
    /// Column names, in table order. They match the serialized field names.
    const COLUMNS: &'static [&'static str];

    /// Returns the row's values in [`Row::COLUMNS`] order.
    fn values(&self) -> Vec<serde_json::Value> {
        let object = serde_json::to_value(self).unwrap_or_default();
        Self::COLUMNS
            .iter()
            .map(|column| object.get(column).cloned().unwrap_or_default())
            .collect()
    }
}

/// Team dimension row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRow {
    /// Team id.
    pub id: u64,
    /// Team name.
    pub name: String,
}

impl Row for TeamRow {
    const TABLE: &'static str = "Team";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
}

/// Event dimension row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    /// Event id.
    pub id: u64,
    /// Event name.
    pub name: String,
}

impl Row for EventRow {
    const TABLE: &'static str = "Event";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
}

/// Player dimension row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRow {
    /// Player id.
    pub id: u64,
    /// Real name.
    pub name: String,
    /// Nickname.
    pub nickname: String,
    /// Nationality.
    pub nationality: Option<String>,
}

impl Row for PlayerRow {
    const TABLE: &'static str = "Player";
    const COLUMNS: &'static [&'static str] = &["id", "name", "nickname", "nationality"];
}

/// Match fact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRow {
    /// Match id.
    pub id: u64,
    /// Best-of count.
    pub best_of: u8,
    /// Stage label.
    pub instance: String,
    /// Event id.
    pub event_id: u64,
    /// Played on LAN.
    pub lan: bool,
    /// Kickoff time.
    pub date: Timestamp,
    /// Left team id.
    pub team1_id: u64,
    /// Right team id.
    pub team2_id: u64,
    /// Winning team id.
    pub winner_id: u64,
}

impl Row for MatchRow {
    const TABLE: &'static str = "Match";
    const COLUMNS: &'static [&'static str] = &[
        "id", "bestOf", "instance", "eventId", "lan", "date", "team1Id", "team2Id", "winnerId",
    ];
}

/// Map fact row, one per team per played map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRow {
    /// Map stats id.
    pub map_id: u64,
    /// Match id.
    pub match_id: u64,
    /// Team this row describes.
    pub team_id: u64,
    /// Map name.
    pub map_name: String,
    /// Rounds won by the team.
    pub score: u32,
    /// Rounds won by the opponent.
    pub opponent_score: u32,
    /// Rounds won as CT.
    pub ct_round_score: u32,
    /// Rounds won as T.
    pub t_round_score: u32,
    /// Whether the map went to overtime.
    pub overtime: bool,
    /// Whether the team won the map.
    pub won: bool,
    /// Whether the team picked the map.
    pub pick: bool,
}

impl Row for MapRow {
    const TABLE: &'static str = "Map";
    const COLUMNS: &'static [&'static str] = &[
        "mapId",
        "matchId",
        "teamId",
        "mapName",
        "score",
        "opponentScore",
        "ctRoundScore",
        "tRoundScore",
        "overtime",
        "won",
        "pick",
    ];
}

/// Player statistics fact row, one per player per team per played map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatRow {
    /// Map stats id.
    pub map_id: u64,
    /// Match id.
    pub match_id: u64,
    /// Team id.
    pub team_id: u64,
    /// Player id.
    pub player_id: u64,
    /// Map name.
    pub map_name: String,
    /// Kills as CT.
    pub ct_kills: u32,
    /// Deaths as CT.
    pub ct_deaths: u32,
    /// ADR as CT.
    pub ct_adr: f64,
    /// Kills as T.
    pub t_kills: u32,
    /// Deaths as T.
    pub t_deaths: u32,
    /// ADR as T.
    pub t_adr: f64,
}

impl Row for PlayerStatRow {
    const TABLE: &'static str = "PlayerStat";
    const COLUMNS: &'static [&'static str] = &[
        "mapId", "matchId", "teamId", "playerId", "mapName", "ctKills", "ctDeaths", "ctAdr",
        "tKills", "tDeaths", "tAdr",
    ];
}

/// Match row carrying team, event and winner names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenormalizedMatchRow {
    /// Key columns.
    #[serde(flatten)]
    pub row: MatchRow,
    /// Event name.
    pub event_name: String,
    /// Left team name.
    pub team1_name: String,
    /// Right team name.
    pub team2_name: String,
    /// Winning team name.
    pub winner_name: String,
}

impl Row for DenormalizedMatchRow {
    const TABLE: &'static str = "Match";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "bestOf",
        "instance",
        "eventId",
        "eventName",
        "lan",
        "date",
        "team1Id",
        "team1Name",
        "team2Id",
        "team2Name",
        "winnerId",
        "winnerName",
    ];
}

/// Map row carrying team and opponent names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenormalizedMapRow {
    /// Key columns.
    #[serde(flatten)]
    pub row: MapRow,
    /// Team name.
    pub team_name: String,
    /// Opponent name.
    pub opponent_name: String,
}

impl Row for DenormalizedMapRow {
    const TABLE: &'static str = "Map";
    const COLUMNS: &'static [&'static str] = &[
        "mapId",
        "matchId",
        "teamId",
        "teamName",
        "opponentName",
        "mapName",
        "score",
        "opponentScore",
        "ctRoundScore",
        "tRoundScore",
        "overtime",
        "won",
        "pick",
    ];
}

/// Player statistics row carrying team name and player nickname.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenormalizedPlayerStatRow {
    /// Key columns.
    #[serde(flatten)]
    pub row: PlayerStatRow,
    /// Team name.
    pub team_name: String,
    /// Player nickname.
    pub nickname: String,
}

impl Row for DenormalizedPlayerStatRow {
    const TABLE: &'static str = "PlayerStat";
    const COLUMNS: &'static [&'static str] = &[
        "mapId", "matchId", "teamId", "teamName", "playerId", "nickname", "mapName", "ctKills",
        "ctDeaths", "ctAdr", "tKills", "tDeaths", "tAdr",
    ];
}
