//! Match header: teams, event and kickoff date.

use scraper::ElementRef;

use super::selectors::{
    attr, has_class, next_element_sibling, parse_number, select_first, select_text, text_of,
};
use crate::errors::ExtractionError;
use crate::model::{EventRef, TeamResult};
use crate::utils::{first_id, parse_match_date, parse_unix_millis, Timestamp};

type Result<T> = std::result::Result<T, ExtractionError>;

/// Parses both team blocks in page order.
pub(crate) fn parse_teams(root: ElementRef<'_>) -> Result<(TeamResult, TeamResult)> {
    let first = parse_team(select_first(root, "div.team1-gradient")?, "team1")?;
    let second = parse_team(select_first(root, "div.team2-gradient")?, "team2")?;
    Ok((first, second))
}

fn parse_team(block: ElementRef<'_>, context: &str) -> Result<TeamResult> {
    let link = select_first(block, "a")?;
    let href = attr(link, "href", context)?;
    let id = first_id(href).ok_or_else(|| ExtractionError::invalid(format!("{context} id"), href))?;
    let name = select_text(link, "div")?;

    let result = next_element_sibling(link)
        .ok_or_else(|| ExtractionError::missing(format!("{context} result")))?;
    let score_text = text_of(result);
    // A forfeited series shows "-" in place of the map count.
    let score = if score_text == "-" {
        0
    } else {
        parse_number(&score_text, &format!("{context} score"))?
    };

    Ok(TeamResult {
        id,
        name,
        score,
        won: has_class(result, "won"),
    })
}

/// Parses the event link inside `div.timeAndEvent`.
pub(crate) fn parse_event(root: ElementRef<'_>) -> Result<EventRef> {
    let link = select_first(root, "div.timeAndEvent div.event a")?;
    let href = attr(link, "href", "event link")?;

    let mut segments = href.trim_end_matches('/').rsplit('/');
    let slug = segments.next().unwrap_or_default();
    let id_text = segments.next().unwrap_or_default();
    let id = parse_number(id_text, "event id")?;

    Ok(EventRef {
        id,
        name: slug.to_string(),
        link: href.to_string(),
    })
}

/// Parses the kickoff time, preferring the `data-unix` attribute.
pub(crate) fn parse_date(root: ElementRef<'_>) -> Result<Timestamp> {
    let date = select_first(root, "div.timeAndEvent div.date")?;
    if let Some(unix) = date.value().attr("data-unix") {
        return parse_unix_millis(unix).map_err(|e| ExtractionError::invalid("match date", e.to_string()));
    }

    let time_text = select_first(root, "div.timeAndEvent div.time")
        .map(text_of)
        .unwrap_or_default();
    parse_match_date(&text_of(date), &time_text)
        .map_err(|e| ExtractionError::invalid("match date", e.to_string()))
}
