//! Results listings and the team rankings page.

use scraper::Html;

use super::selectors::{attr, parse_number, select_all, select_first, text_of};
use crate::errors::ExtractionError;
use crate::model::MatchReference;
use crate::utils::first_id;

type Result<T> = std::result::Result<T, ExtractionError>;

/// Link text of the team profile links on the rankings page.
pub const TEAM_PROFILE_LINK_TEXT: &str = "HLTV Team profile";

/// One page of a results listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Match references on this page, in page order.
    pub entries: Vec<MatchReference>,
    /// Total number of results the site reports for the whole listing.
    pub total: usize,
}

/// Parses a results listing page.
///
/// Entries come from the first link of each `div.result-con`; the total is
/// the last token of the `"1 - 100 of 54321"` pagination footer.
pub fn parse_listing(html: &str) -> Result<ListingPage> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let footer = text_of(select_first(root, "span.pagination-data")?);
    let total = parse_number(
        footer.split_whitespace().last().unwrap_or_default(),
        "listing total",
    )?;

    let mut entries = Vec::new();
    for result in select_all(root, "div.result-con")? {
        let link = select_first(result, "a")?;
        let href = attr(link, "href", "match link")?;
        let reference = MatchReference::from_link(href)
            .ok_or_else(|| ExtractionError::invalid("match link", href))?;
        entries.push(reference);
    }

    Ok(ListingPage { entries, total })
}

/// Extracts team ids from the rankings page's profile links, in page order.
pub fn parse_team_ids(html: &str) -> Result<Vec<u64>> {
    let document = Html::parse_document(html);

    let mut ids = Vec::new();
    for link in select_all(document.root_element(), "a.moreLink")? {
        if text_of(link) != TEAM_PROFILE_LINK_TEXT {
            continue;
        }
        let href = attr(link, "href", "team profile link")?;
        ids.push(first_id(href).ok_or_else(|| ExtractionError::invalid("team id", href))?);
    }

    Ok(ids)
}
