//! Numeric identifier extraction from site links.
//!
//! Site links embed ids as bare path segments, e.g.
//! `/matches/2366000/natus-vincere-vs-g2` or `/stats/matches/mapstatsid/150000/x`.

/// Returns the purely numeric `/`-delimited segments of `text`, in order.
///
/// Never fails; returns an empty vector when the text holds no ids.
///
/// # Examples
///
/// ```
/// use hltv_harvest::utils::extract_ids;
///
/// assert_eq!(extract_ids("/team/4608/natus-vincere"), vec!["4608"]);
/// assert!(extract_ids("/results").is_empty());
/// ```
#[must_use]
pub fn extract_ids(text: &str) -> Vec<&str> {
    text.split('/')
        .filter(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

/// Parses the first numeric segment of `text`.
#[must_use]
pub fn first_id(text: &str) -> Option<u64> {
    extract_ids(text).first().and_then(|id| id.parse().ok())
}

/// Parses the last numeric segment of `text`.
#[must_use]
pub fn last_id(text: &str) -> Option<u64> {
    extract_ids(text).last().and_then(|id| id.parse().ok())
}
