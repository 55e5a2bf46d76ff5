//! Pure mapping from match records to flat rows.

use super::tables::{
    DenormalizedMapRow, DenormalizedMatchRow, DenormalizedPlayerStatRow, MapRow, MatchRow,
    PlayerStatRow,
};
use crate::model::{MapOutcome, MapSide, MatchRecord, PlayerStatBlock, TeamResult};

/// The fact rows of one match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRows {
    /// The match row.
    pub match_row: MatchRow,
    /// Two rows per played map.
    pub maps: Vec<MapRow>,
    /// One row per player per team per played map.
    pub player_stats: Vec<PlayerStatRow>,
}

/// Accumulates rows across many match records.
pub trait RowSet: Default + Send {
    /// Appends the rows of one record.
    fn append(&mut self, record: &MatchRecord);

    /// Number of match rows held.
    fn match_count(&self) -> usize;

    /// Returns true if no match has been appended.
    fn is_empty(&self) -> bool {
        self.match_count() == 0
    }
}

/// Builds the rows of a single record.
///
/// Forfeited maps produce no map or player rows; they only influence the
/// winner column.
#[must_use]
pub fn build_row(record: &MatchRecord) -> MatchRows {
    MatchRows {
        match_row: match_row(record),
        maps: map_rows(record),
        player_stats: player_stat_rows(record),
    }
}

/// Builds rows for many records into any [`RowSet`].
#[must_use]
pub fn build_rows<'a, R: RowSet>(records: impl IntoIterator<Item = &'a MatchRecord>) -> R {
    let mut rows = R::default();
    for record in records {
        rows.append(record);
    }
    rows
}

fn match_row(record: &MatchRecord) -> MatchRow {
    let meta = &record.meta;
    MatchRow {
        id: meta.match_id,
        best_of: meta.best_of,
        instance: meta.instance.clone(),
        event_id: meta.event_id,
        lan: meta.is_lan,
        date: meta.date,
        team1_id: record.team1.id,
        team2_id: record.team2.id,
        winner_id: record.winner_id(),
    }
}

fn map_rows(record: &MatchRecord) -> Vec<MapRow> {
    let mut rows = Vec::new();
    for map in &record.maps {
        let MapOutcome::Played {
            map_id,
            first,
            second,
            overtime,
        } = &map.outcome
        else {
            continue;
        };

        let row = |team: &TeamResult, side: &MapSide, opponent: &MapSide| MapRow {
            map_id: *map_id,
            match_id: record.match_id(),
            team_id: team.id,
            map_name: map.name.clone(),
            score: side.score,
            opponent_score: opponent.score,
            ct_round_score: side.rounds.ct,
            t_round_score: side.rounds.t,
            overtime: *overtime,
            won: side.won,
            pick: side.pick,
        };
        rows.push(row(&record.team1, first, second));
        rows.push(row(&record.team2, second, first));
    }
    rows
}

fn player_stat_rows(record: &MatchRecord) -> Vec<PlayerStatRow> {
    let Some(stats) = &record.player_stats else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for (key, pair) in &stats.per_map {
        let Some(map) = record.map(*key) else {
            continue;
        };
        let Some(map_id) = map.map_id() else {
            continue;
        };

        let row = |team_id: u64, block: &PlayerStatBlock| PlayerStatRow {
            map_id,
            match_id: record.match_id(),
            team_id,
            player_id: block.player_id,
            map_name: map.name.clone(),
            ct_kills: block.ct_kills,
            ct_deaths: block.ct_deaths,
            ct_adr: block.ct_adr,
            t_kills: block.t_kills,
            t_deaths: block.t_deaths,
            t_adr: block.t_adr,
        };
        rows.extend(pair.first.iter().map(|b| row(record.team1.id, b)));
        rows.extend(pair.second.iter().map(|b| row(record.team2.id, b)));
    }
    rows
}

/// Key-only rows: every name lives in the dimension tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRows {
    /// Match rows.
    pub matches: Vec<MatchRow>,
    /// Map rows.
    pub maps: Vec<MapRow>,
    /// Player statistics rows.
    pub player_stats: Vec<PlayerStatRow>,
}

impl RowSet for NormalizedRows {
    fn append(&mut self, record: &MatchRecord) {
        let rows = build_row(record);
        self.matches.push(rows.match_row);
        self.maps.extend(rows.maps);
        self.player_stats.extend(rows.player_stats);
    }

    fn match_count(&self) -> usize {
        self.matches.len()
    }
}

/// Rows with team, event and player names inlined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenormalizedRows {
    /// Match rows.
    pub matches: Vec<DenormalizedMatchRow>,
    /// Map rows.
    pub maps: Vec<DenormalizedMapRow>,
    /// Player statistics rows.
    pub player_stats: Vec<DenormalizedPlayerStatRow>,
}

impl RowSet for DenormalizedRows {
    fn append(&mut self, record: &MatchRecord) {
        let rows = build_row(record);
        let name_of = |team_id: u64| {
            if team_id == record.team1.id {
                record.team1.name.clone()
            } else {
                record.team2.name.clone()
            }
        };
        let opponent_of = |team_id: u64| {
            if team_id == record.team1.id {
                record.team2.name.clone()
            } else {
                record.team1.name.clone()
            }
        };

        self.matches.push(DenormalizedMatchRow {
            event_name: record.event.name.clone(),
            team1_name: record.team1.name.clone(),
            team2_name: record.team2.name.clone(),
            winner_name: record.winner().name.clone(),
            row: rows.match_row,
        });

        self.maps.extend(rows.maps.into_iter().map(|row| DenormalizedMapRow {
            team_name: name_of(row.team_id),
            opponent_name: opponent_of(row.team_id),
            row,
        }));

        let nicknames = record.player_stats.as_ref().map(|s| &s.per_map);
        self.player_stats
            .extend(rows.player_stats.into_iter().map(|row| {
                let nickname = nicknames
                    .and_then(|per_map| {
                        per_map
                            .values()
                            .flat_map(|pair| pair.first.iter().chain(&pair.second))
                            .find(|b| b.player_id == row.player_id)
                    })
                    .map(|b| b.nickname.clone())
                    .unwrap_or_default();
                DenormalizedPlayerStatRow {
                    team_name: name_of(row.team_id),
                    nickname,
                    row,
                }
            }));
    }

    fn match_count(&self) -> usize {
        self.matches.len()
    }
}
