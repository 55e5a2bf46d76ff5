//! Match references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pointer to one match detail page: `(match_id, link)`.
///
/// Produced by the listing crawler or supplied by the caller, consumed once
/// per orchestrator pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchReference {
    /// Numeric match id.
    pub match_id: u64,
    /// Site-relative link to the match page, e.g. `/matches/2366000/a-vs-b`.
    pub link: String,
}

impl MatchReference {
    /// Creates a new reference.
    #[must_use]
    pub fn new(match_id: u64, link: impl Into<String>) -> Self {
        Self {
            match_id,
            link: link.into(),
        }
    }

    /// Builds a reference from a match link, taking the last numeric segment as id.
    #[must_use]
    pub fn from_link(link: &str) -> Option<Self> {
        crate::utils::last_id(link).map(|id| Self::new(id, link))
    }

    /// Resolves the link against the site base URL.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if self.link.starts_with("http://") || self.link.starts_with("https://") {
            self.link.clone()
        } else if self.link.starts_with('/') {
            format!("{base}{}", self.link)
        } else {
            format!("{base}/{}", self.link)
        }
    }
}

impl fmt::Display for MatchReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.match_id, self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_link() {
        let reference = MatchReference::from_link("/matches/2366000/navi-vs-g2-iem").unwrap();
        assert_eq!(reference.match_id, 2_366_000);
        assert_eq!(reference.link, "/matches/2366000/navi-vs-g2-iem");

        assert!(MatchReference::from_link("/matches/navi").is_none());
    }

    #[test]
    fn test_url_resolution() {
        let reference = MatchReference::new(1, "/matches/1/a-vs-b");
        assert_eq!(
            reference.url("https://www.hltv.org/"),
            "https://www.hltv.org/matches/1/a-vs-b"
        );

        let relative = MatchReference::new(1, "matches/1/a-vs-b");
        assert_eq!(
            relative.url("https://www.hltv.org"),
            "https://www.hltv.org/matches/1/a-vs-b"
        );

        let absolute = MatchReference::new(1, "https://mirror.example/matches/1");
        assert_eq!(absolute.url("https://www.hltv.org"), "https://mirror.example/matches/1");
    }

    #[test]
    fn test_display() {
        let reference = MatchReference::new(7, "/matches/7/x");
        assert_eq!(reference.to_string(), "7 (/matches/7/x)");
    }
}
