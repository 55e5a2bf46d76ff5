//! Per-map results from the `div.mapholder` blocks.

use scraper::node::Node;
use scraper::ElementRef;
use tracing::debug;

use super::selectors::{
    attr, child_elements, has_class, parse_number, select_all, select_first,
    select_text, text_of,
};
use crate::errors::ExtractionError;
use crate::model::{
    ForfeitSide, MapKey, MapOutcome, MapResult, MapSide, RoundResults, Side,
};
use crate::utils::first_id;

type Result<T> = std::result::Result<T, ExtractionError>;

/// Map name shown for a map awarded without being played.
pub const FORFEIT_MAP_NAME: &str = "Default";

/// Map name shown when the rest of the series was never scheduled.
pub const UNDECIDED_MAP_NAME: &str = "TBA";

/// Parses the map blocks in page order.
///
/// Keys are the block ordinals, so a skipped tie leaves a gap in the keys.
pub(crate) fn parse_maps(root: ElementRef<'_>) -> Result<Vec<MapResult>> {
    let mut maps = Vec::new();

    for (index, holder) in select_all(root, "div.mapholder")?.into_iter().enumerate() {
        let key = MapKey(index);
        let name = select_text(holder, "div.mapname")?;

        let optional = child_elements(holder)
            .find(|e| e.value().name() == "div")
            .is_some_and(|e| has_class(e, "optional"));
        if optional {
            debug!(%key, map = %name, "optional map not played, stopping");
            break;
        }

        if name == FORFEIT_MAP_NAME {
            maps.push(MapResult {
                key,
                name,
                outcome: parse_forfeited(holder)?,
            });
            continue;
        }

        if name == UNDECIDED_MAP_NAME {
            debug!(%key, "undecided map, stopping");
            break;
        }

        let left = select_first(holder, ".results-left")?;
        if has_class(left, "tie") {
            debug!(%key, map = %name, "voided map skipped");
            continue;
        }

        maps.push(MapResult {
            key,
            name,
            outcome: parse_played(holder, left)?,
        });
    }

    Ok(maps)
}

fn parse_forfeited(holder: ElementRef<'_>) -> Result<MapOutcome> {
    let side = |source: &str| -> Result<ForfeitSide> {
        let block = select_first(holder, source)?;
        Ok(ForfeitSide {
            team_name: select_text(block, "div.results-teamname")?,
            won: has_class(block, "won"),
        })
    };

    Ok(MapOutcome::Forfeited {
        first: side(".results-left")?,
        second: side(".results-right")?,
    })
}

fn parse_played(holder: ElementRef<'_>, left: ElementRef<'_>) -> Result<MapOutcome> {
    let right = select_first(holder, ".results-right")?;
    let mut first = parse_side(left, "left score")?;
    let mut second = parse_side(right, "right score")?;

    let half_score = select_first(holder, "div.results-center-half-score")?;
    let (first_rounds, second_rounds) = parse_half_scores(half_score)?;
    first.rounds = first_rounds;
    second.rounds = second_rounds;
    let overtime = first_rounds.overtime.is_some() || second_rounds.overtime.is_some();

    let stats_link = select_first(holder, "a.results-stats")?;
    let href = attr(stats_link, "href", "map stats link")?;
    let map_id = first_id(href).ok_or_else(|| ExtractionError::invalid("map id", href))?;

    Ok(MapOutcome::Played {
        map_id,
        first,
        second,
        overtime,
    })
}

fn parse_side(block: ElementRef<'_>, context: &str) -> Result<MapSide> {
    Ok(MapSide {
        team_name: select_text(block, "div.results-teamname")?,
        score: parse_number(&select_text(block, ".results-team-score")?, context)?,
        won: has_class(block, "won"),
        pick: has_class(block, "pick"),
        rounds: RoundResults::default(),
    })
}

/// Reads the half-score row.
///
/// Whitespace-only text nodes are ignored; the remaining children are read
/// by position: 1 and 5 belong to the left team, 3 and 7 to the right team,
/// 11 and 13 are the overtime totals.
pub(crate) fn parse_half_scores(element: ElementRef<'_>) -> Result<(RoundResults, RoundResults)> {
    let mut first = RoundResults::default();
    let mut second = RoundResults::default();

    let nodes = element.children().filter(|node| match node.value() {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(_) => true,
        _ => false,
    });

    for (position, node) in nodes.enumerate() {
        let target = match position {
            1 | 5 | 11 => &mut first,
            3 | 7 | 13 => &mut second,
            _ => continue,
        };
        let span = ElementRef::wrap(node)
            .ok_or_else(|| ExtractionError::missing(format!("half score span #{position}")))?;
        let rounds: u32 = parse_number(&text_of(span), "half score")?;

        if position >= 11 {
            target.overtime = Some(rounds);
        } else {
            let side = side_of(span).ok_or_else(|| {
                let class = span.value().attr("class").unwrap_or_default();
                ExtractionError::invalid("half score side", class)
            })?;
            target.add(side, rounds);
        }
    }

    Ok((first, second))
}

/// Side marked by a half-score span's classes, in any order.
fn side_of(span: ElementRef<'_>) -> Option<Side> {
    Side::ALL
        .into_iter()
        .find(|side| has_class(span, side.class_name()))
}
