//! Player statistics from the `div.stats-content` containers.

use scraper::ElementRef;
use std::collections::HashMap;
use tracing::debug;

use super::selectors::{attr, select_all, select_first, select_text};
use crate::errors::ExtractionError;
use crate::model::{MapKey, MapResult, MatchPlayerStats, PlayerIdentity, PlayerStatBlock, TeamPair};
use crate::utils::first_id;

type Result<T> = std::result::Result<T, ExtractionError>;

/// Id of the container holding the all-maps aggregate.
pub const AGGREGATE_CONTAINER_ID: &str = "all-content";

/// Tables per container: aggregate, CT and T for each team.
const TABLES_PER_CONTAINER: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SideLine {
    kills: u32,
    deaths: u32,
    adr: f64,
}

/// Parses every stats container; `None` when the page has none.
pub(crate) fn parse_player_stats(
    root: ElementRef<'_>,
    maps: &[MapResult],
) -> Result<Option<MatchPlayerStats>> {
    let containers = select_all(root, "div.stats-content")?;
    if containers.is_empty() {
        return Ok(None);
    }

    let mut stats = MatchPlayerStats::default();
    let mut assigned: Vec<MapKey> = Vec::new();

    for container in containers {
        let id = container.value().attr("id").unwrap_or_default();

        if id == AGGREGATE_CONTAINER_ID {
            let (overall, identities) = parse_container(container, true)?;
            stats.overall = overall;
            stats.identities = identities;
            continue;
        }

        let (blocks, _) = parse_container(container, false)?;
        let Some(key) = assign_map(id, maps, &assigned) else {
            debug!(container = id, "stats container for a map that was not played; skipped");
            continue;
        };
        assigned.push(key);

        debug!(%key, container = id, "parsed map player stats");
        stats.per_map.insert(key, blocks);
    }

    Ok(Some(stats))
}

/// Picks the played map a per-map container belongs to.
///
/// A container id such as `"150000-content"` names the map stats id and
/// only matches that map; `None` means the map was skipped (tie, optional
/// decider, after `TBA`). Ids without a numeric prefix take the next
/// unassigned played map.
fn assign_map(container_id: &str, maps: &[MapResult], assigned: &[MapKey]) -> Option<MapKey> {
    let mut candidates = maps
        .iter()
        .filter(|m| m.is_played() && !assigned.contains(&m.key));

    let prefix = container_id
        .split('-')
        .next()
        .and_then(|p| p.parse::<u64>().ok());

    match prefix {
        Some(map_id) => candidates.find(|m| m.map_id() == Some(map_id)).map(|m| m.key),
        None => candidates.next().map(|m| m.key),
    }
}

fn parse_container(
    container: ElementRef<'_>,
    with_identity: bool,
) -> Result<(TeamPair<Vec<PlayerStatBlock>>, Vec<PlayerIdentity>)> {
    let tables = select_all(container, "table")?;
    if tables.len() < TABLES_PER_CONTAINER {
        return Err(ExtractionError::invalid(
            "stats tables",
            tables.len().to_string(),
        ));
    }

    let mut identities = Vec::new();
    let first = parse_team_tables(&tables[0..3], with_identity, &mut identities)?;
    let second = parse_team_tables(&tables[3..6], with_identity, &mut identities)?;

    Ok((TeamPair::new(first, second), identities))
}

fn parse_team_tables(
    tables: &[ElementRef<'_>],
    with_identity: bool,
    identities: &mut Vec<PlayerIdentity>,
) -> Result<Vec<PlayerStatBlock>> {
    let ct = side_lines(tables[1])?;
    let t = side_lines(tables[2])?;

    let mut blocks = Vec::new();
    for row in player_rows(tables[0])? {
        let nickname = select_text(row, "span.player-nick")?;
        let href = attr(select_first(row, "a.flagAlign")?, "href", "player link")?;
        let player_id =
            first_id(href).ok_or_else(|| ExtractionError::invalid("player id", href))?;

        if with_identity {
            identities.push(PlayerIdentity {
                player_id,
                name: select_text(row, "div.statsPlayerName")?,
                nickname: nickname.clone(),
                nationality: select_first(row, "img")
                    .ok()
                    .and_then(|img| img.value().attr("title"))
                    .map(str::to_string),
            });
        }

        let ct_line = ct
            .get(&nickname)
            .ok_or_else(|| ExtractionError::missing(format!("ct stats for {nickname}")))?;
        let t_line = t
            .get(&nickname)
            .ok_or_else(|| ExtractionError::missing(format!("t stats for {nickname}")))?;

        blocks.push(PlayerStatBlock {
            player_id,
            ct_kills: ct_line.kills,
            ct_deaths: ct_line.deaths,
            ct_adr: ct_line.adr,
            t_kills: t_line.kills,
            t_deaths: t_line.deaths,
            t_adr: t_line.adr,
            nickname,
        });
    }

    Ok(blocks)
}

/// Data rows of a table: `tr` elements without a class.
fn player_rows(table: ElementRef<'_>) -> Result<Vec<ElementRef<'_>>> {
    Ok(select_all(table, "tr")?
        .into_iter()
        .filter(|row| row.value().attr("class").map_or(true, |c| c.trim().is_empty()))
        .collect())
}

fn side_lines(table: ElementRef<'_>) -> Result<HashMap<String, SideLine>> {
    player_rows(table)?
        .into_iter()
        .map(|row| -> Result<(String, SideLine)> {
            let nickname = select_text(row, "span.player-nick")?;
            let (kills, deaths) = parse_kd(&select_text(row, "td.kd")?)?;
            let adr = parse_adr(&select_text(row, "td.adr")?)?;
            Ok((nickname, SideLine { kills, deaths, adr }))
        })
        .collect()
}

/// Splits `"k-d"` into kills and deaths.
pub(crate) fn parse_kd(text: &str) -> Result<(u32, u32)> {
    let (kills, deaths) = text
        .split_once('-')
        .ok_or_else(|| ExtractionError::invalid("kd", text))?;
    let kills = kills
        .trim()
        .parse()
        .map_err(|_| ExtractionError::invalid("kd", text))?;
    let deaths = deaths
        .trim()
        .parse()
        .map_err(|_| ExtractionError::invalid("kd", text))?;
    Ok((kills, deaths))
}

/// Parses an ADR cell; `"-"` means no damage recorded.
pub(crate) fn parse_adr(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed == "-" {
        return Ok(0.0);
    }
    trimmed
        .parse()
        .map_err(|_| ExtractionError::invalid("adr", trimmed))
}
