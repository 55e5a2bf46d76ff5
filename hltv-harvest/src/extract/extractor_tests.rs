//! End-to-end tests for match page extraction.

#[cfg(test)]
mod tests {
    use crate::extract::MatchPageExtractor;
    use crate::model::{MapKey, MapOutcome, MatchStatus, VetoAction};
    use crate::testing::{MapFixture, MatchPageFixture, EVENT_ID, TEAM1_ID, TEAM2_ID};
    use pretty_assertions::assert_eq;

    fn extract(page: &MatchPageFixture) -> crate::model::MatchRecord {
        MatchPageExtractor::new()
            .extract(2_366_000, &page.render())
            .unwrap()
    }

    #[test]
    fn test_full_page() {
        let record = extract(&MatchPageFixture::new());

        assert_eq!(record.match_id(), 2_366_000);
        assert_eq!(record.team1.id, TEAM1_ID);
        assert_eq!(record.team1.name, "Natus Vincere");
        assert_eq!(record.team2.id, TEAM2_ID);
        assert_eq!(record.event.id, EVENT_ID);
        assert_eq!(record.event.name, "fixture-cup");
        assert_eq!(record.meta.event_id, EVENT_ID);
        assert_eq!(record.meta.best_of, 3);
        assert!(record.meta.is_lan);
        assert_eq!(record.meta.instance, "Grand final");
        assert_eq!(record.meta.date.timestamp_millis(), 1_696_512_000_000);
        assert_eq!(record.meta.status, None);
        assert_eq!(record.winner_id(), TEAM1_ID);

        // The optional decider stops map parsing.
        assert_eq!(record.maps.len(), 2);
        assert_eq!(record.maps[0].name, "Mirage");
        assert_eq!(record.maps[1].map_id(), Some(150_002));
    }

    #[test]
    fn test_veto_sequence_and_keys() {
        let record = extract(&MatchPageFixture::new());
        let pick_bans = &record.meta.pick_bans;

        assert_eq!(pick_bans.len(), 7);
        assert_eq!(pick_bans[0].action, VetoAction::Ban);
        assert_eq!(pick_bans[0].team.as_deref(), Some("G2"));
        assert_eq!(pick_bans[2].map, "Mirage");
        assert_eq!(pick_bans[2].map_key, Some(MapKey(0)));
        assert_eq!(pick_bans[3].map_key, Some(MapKey(1)));
        // The decider was not played, so it has no map block.
        assert_eq!(pick_bans[6].action, VetoAction::Decider);
        assert_eq!(pick_bans[6].map_key, None);
        assert_eq!(record.meta.veto.map_pool(), vec!["Mirage", "Inferno", "Ancient"]);
    }

    #[test]
    fn test_player_stats() {
        let page = MatchPageFixture::new();
        let record = extract(&page);
        let stats = record.player_stats.expect("stats containers present");

        assert_eq!(stats.identities.len(), 10);
        assert_eq!(stats.identities[0].player_id, page.player_ids(1)[0]);
        assert_eq!(stats.identities[0].name, "Player 1000");
        assert_eq!(stats.identities[0].nationality.as_deref(), Some("Country1"));

        assert_eq!(stats.overall.first.len(), 5);
        assert_eq!(stats.per_map.len(), 2);

        let mirage = &stats.per_map[&MapKey(0)];
        let first = &mirage.first[0];
        assert_eq!(first.nickname, "p1000");
        assert_eq!((first.ct_kills, first.ct_deaths), (10, 15));
        assert!((first.ct_adr - 75.0).abs() < f64::EPSILON);
        // "-" ADR is read as zero.
        assert!(first.t_adr.abs() < f64::EPSILON);
        assert_eq!(mirage.second[1].player_id, page.player_ids(2)[1]);
    }

    #[test]
    fn test_forfeit_without_veto_box() {
        let page = MatchPageFixture::new()
            .without_veto()
            .with_maps(vec![MapFixture::Default { left_won: false }])
            .with_won(false, false)
            .with_players_per_team(0);
        let record = extract(&page);

        assert!(record.is_forfeit());
        assert_eq!(record.meta.status, Some(MatchStatus::Forfeit));
        assert!(record.meta.pick_bans.is_empty());
        assert_eq!(record.played_maps().count(), 0);
        assert!(record.player_stats.is_none());
        // The Default map names team 2 as winner.
        assert_eq!(record.winner_id(), TEAM2_ID);
    }

    #[test]
    fn test_default_map_resolves_team1() {
        let page = MatchPageFixture::new()
            .with_maps(vec![MapFixture::Default { left_won: true }])
            .with_won(false, false)
            .with_players_per_team(0);
        let record = extract(&page);

        assert!(matches!(record.maps[0].outcome, MapOutcome::Forfeited { .. }));
        assert_eq!(record.winner_id(), TEAM1_ID);
    }

    #[test]
    fn test_tie_produces_no_map() {
        let page = MatchPageFixture::new().with_maps(vec![
            MapFixture::Tie {
                name: "Mirage".to_string(),
            },
            MapFixture::played("Inferno", 150_002, 16, 9),
        ]);
        let record = extract(&page);

        assert_eq!(record.maps.len(), 1);
        assert_eq!(record.maps[0].key, MapKey(1));
        let stats = record.player_stats.unwrap();
        assert!(stats.per_map.contains_key(&MapKey(1)));
    }

    #[test]
    fn test_overtime_map() {
        let page = MatchPageFixture::new()
            .with_maps(vec![MapFixture::overtime("Nuke", 150_009, 4, 2)]);
        let record = extract(&page);

        let MapOutcome::Played { first, second, overtime, .. } = &record.maps[0].outcome else {
            panic!("expected a played map");
        };
        assert!(*overtime);
        assert_eq!(first.score, 19);
        assert_eq!(first.rounds.overtime, Some(4));
        assert_eq!(first.rounds.ct + first.rounds.t, 15);
        assert_eq!(second.rounds.overtime, Some(2));
    }

    #[test]
    fn test_tba_stops_map_parsing() {
        let page = MatchPageFixture::new().with_maps(vec![
            MapFixture::played("Mirage", 150_001, 16, 3),
            MapFixture::Tba,
            MapFixture::played("Nuke", 150_003, 16, 3),
        ]);
        let record = extract(&page);

        assert_eq!(record.maps.len(), 1);
        let stats = record.player_stats.unwrap();
        assert_eq!(stats.per_map.len(), 1);
        assert!(stats.per_map.contains_key(&MapKey(0)));
    }

    #[test]
    fn test_stats_of_unplayed_map_are_dropped() {
        let page = MatchPageFixture::new().with_maps(vec![
            MapFixture::played("Mirage", 150_001, 16, 3),
            MapFixture::played("Inferno", 150_002, 16, 8),
            MapFixture::Optional {
                name: "Ancient".to_string(),
            },
        ]);
        let html = page.render().replace(
            "id=\"150002-content\"",
            "id=\"150009-content\"",
        );
        let record = MatchPageExtractor::new().extract(2_366_000, &html).unwrap();

        assert_eq!(record.played_maps().count(), 2);
        let stats = record.player_stats.unwrap();
        assert_eq!(stats.per_map.len(), 1);
        assert!(stats.per_map.contains_key(&MapKey(0)));
    }

    #[test]
    fn test_structural_mismatch_is_error() {
        let extractor = MatchPageExtractor::new();
        assert!(extractor.extract(1, "<html><body>blocked</body></html>").is_err());

        let page = MatchPageFixture::new()
            .with_format("Format to be announced")
            .render();
        assert!(extractor.extract(1, &page).is_err());
    }
}
