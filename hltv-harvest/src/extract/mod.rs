//! Structural extraction of match pages and listings.
//!
//! Every parser here is synchronous: `scraper::Html` is not `Send`, so a
//! parsed document never crosses an `.await`. Any structural mismatch is an
//! [`ExtractionError`]; forfeits, voided maps and unplayed deciders are data.

mod header;
pub mod listing;
mod maps;
mod meta;
mod players;
mod selectors;

mod extractor_tests;

use scraper::Html;
use tracing::debug;

use crate::errors::ExtractionError;
use crate::model::{MapResult, MatchMeta, MatchRecord, MatchStatus, PickBanEntry, VetoAction};

pub use listing::{parse_listing, parse_team_ids, ListingPage, TEAM_PROFILE_LINK_TEXT};
pub use maps::{FORFEIT_MAP_NAME, UNDECIDED_MAP_NAME};
pub use players::AGGREGATE_CONTAINER_ID;

/// Turns one match page into a [`MatchRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchPageExtractor;

impl MatchPageExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extracts the full record of match `match_id` from its page markup.
    pub fn extract(&self, match_id: u64, html: &str) -> Result<MatchRecord, ExtractionError> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let (team1, team2) = header::parse_teams(root)?;
        let event = header::parse_event(root)?;
        let date = header::parse_date(root)?;
        let parsed = meta::parse_meta(root)?;
        let maps = maps::parse_maps(root)?;
        let player_stats = players::parse_player_stats(root, &maps)?;

        let mut pick_bans = parsed.pick_bans;
        link_map_keys(&mut pick_bans, &maps);

        debug!(
            match_id,
            maps = maps.len(),
            vetoes = pick_bans.len(),
            forfeit = parsed.forfeit,
            "extracted match page"
        );

        Ok(MatchRecord {
            team1,
            team2,
            meta: MatchMeta {
                match_id,
                event_id: event.id,
                best_of: parsed.best_of,
                instance: parsed.instance,
                is_lan: parsed.is_lan,
                date,
                pick_bans,
                veto: parsed.veto,
                status: parsed.forfeit.then_some(MatchStatus::Forfeit),
            },
            event,
            maps,
            player_stats,
        })
    }
}

/// Points picks and the decider at the map block they produced.
///
/// Each map block is claimed at most once, in veto order.
fn link_map_keys(entries: &mut [PickBanEntry], maps: &[MapResult]) {
    let mut claimed = Vec::new();
    for entry in entries.iter_mut().filter(|e| e.action != VetoAction::Ban) {
        let found = maps
            .iter()
            .find(|m| m.name == entry.map && !claimed.contains(&m.key));
        if let Some(map) = found {
            claimed.push(map.key);
            entry.map_key = Some(map.key);
        }
    }
}
