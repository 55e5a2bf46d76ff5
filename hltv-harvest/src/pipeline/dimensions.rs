//! Dimension tables deduplicated across a run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{MatchRecord, PlayerIdentity};
use crate::rows::{EventRow, PlayerRow, TeamRow};

/// Teams, events and players seen during a run, keyed by id.
///
/// The first occurrence of an id wins; later records never overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionTables {
    /// Team id to name.
    pub teams: BTreeMap<u64, String>,
    /// Event id to name.
    pub events: BTreeMap<u64, String>,
    /// Player id to identity.
    pub players: BTreeMap<u64, PlayerIdentity>,
}

impl DimensionTables {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the entities of one record, insert-if-absent.
    pub fn merge(&mut self, record: &MatchRecord) {
        for team in [&record.team1, &record.team2] {
            self.teams
                .entry(team.id)
                .or_insert_with(|| team.name.clone());
        }
        self.events
            .entry(record.event.id)
            .or_insert_with(|| record.event.name.clone());

        if let Some(stats) = &record.player_stats {
            for identity in &stats.identities {
                self.players
                    .entry(identity.player_id)
                    .or_insert_with(|| identity.clone());
            }
        }
    }

    /// Team rows in id order.
    #[must_use]
    pub fn team_rows(&self) -> Vec<TeamRow> {
        self.teams
            .iter()
            .map(|(id, name)| TeamRow {
                id: *id,
                name: name.clone(),
            })
            .collect()
    }

    /// Event rows in id order.
    #[must_use]
    pub fn event_rows(&self) -> Vec<EventRow> {
        self.events
            .iter()
            .map(|(id, name)| EventRow {
                id: *id,
                name: name.clone(),
            })
            .collect()
    }

    /// Player rows in id order.
    #[must_use]
    pub fn player_rows(&self) -> Vec<PlayerRow> {
        self.players
            .values()
            .map(|p| PlayerRow {
                id: p.player_id,
                name: p.name.clone(),
                nickname: p.nickname.clone(),
                nationality: p.nationality.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MatchPageExtractor;
    use crate::testing::{MatchPageFixture, TEAM1_ID, TEAM2_ID};

    #[test]
    fn test_merge_is_insert_if_absent() {
        let extractor = MatchPageExtractor::new();
        let first = extractor
            .extract(1, &MatchPageFixture::new().render())
            .unwrap();
        let renamed = extractor
            .extract(
                2,
                &MatchPageFixture::new()
                    .with_team1(TEAM1_ID, "NaVi")
                    .with_team2(42, "Vitality")
                    .render(),
            )
            .unwrap();

        let mut tables = DimensionTables::new();
        tables.merge(&first);
        tables.merge(&renamed);

        assert_eq!(tables.teams.len(), 3);
        assert_eq!(tables.teams[&TEAM1_ID], "Natus Vincere");
        assert_eq!(tables.teams[&TEAM2_ID], "G2");
        assert_eq!(tables.teams[&42], "Vitality");
        assert_eq!(tables.events.len(), 1);
        assert_eq!(tables.players.len(), 10);
    }

    #[test]
    fn test_rows_in_id_order() {
        let record = MatchPageExtractor::new()
            .extract(1, &MatchPageFixture::new().render())
            .unwrap();
        let mut tables = DimensionTables::new();
        tables.merge(&record);

        let teams = tables.team_rows();
        assert_eq!(teams[0].id, TEAM1_ID);
        assert_eq!(teams[1].id, TEAM2_ID);
        assert_eq!(tables.event_rows()[0].name, "fixture-cup");
        assert_eq!(tables.player_rows()[0].nationality.as_deref(), Some("Country1"));
    }
}
