//! Listing crawler.
//!
//! Pages through a results listing until the requested number of match
//! references is collected or the site-reported total is exhausted.

use tracing::{debug, info};

use crate::errors::{HarvestError, Result};
use crate::extract::{parse_listing, parse_team_ids, ListingPage};
use crate::fetch::{Fetcher, SiteConfig};
use crate::model::MatchReference;

/// Collects match references from results listings.
///
/// Any transport or listing-shape error aborts the whole call.
#[derive(Debug)]
pub struct ListingCrawler<F> {
    fetcher: F,
    site: SiteConfig,
}

impl<F: Fetcher> ListingCrawler<F> {
    /// Creates a crawler over `fetcher` for the given site layout.
    #[must_use]
    pub fn new(fetcher: F, site: SiteConfig) -> Self {
        Self { fetcher, site }
    }

    /// Gets the site configuration.
    #[must_use]
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Returns up to `limit` of the most recent matches, in listing order.
    pub async fn list_matches(&self, limit: usize) -> Result<Vec<MatchReference>> {
        let site = &self.site;
        self.crawl(limit, |offset| site.results_url(offset)).await
    }

    /// Returns up to `limit` of a team's most recent matches, in listing order.
    pub async fn list_matches_for_team(
        &self,
        team_id: u64,
        limit: usize,
    ) -> Result<Vec<MatchReference>> {
        let site = &self.site;
        self.crawl(limit, |offset| site.team_results_url(team_id, offset))
            .await
    }

    /// Returns the ids of the teams on the rankings page, in rank order.
    pub async fn top_team_ids(&self) -> Result<Vec<u64>> {
        let url = self.site.ranking_url();
        let page = self.fetcher.fetch(&url).await?;
        let ids = parse_team_ids(&page.text)?;
        info!(url = %url, teams = ids.len(), "fetched team rankings");
        Ok(ids)
    }

    async fn crawl(
        &self,
        limit: usize,
        url_at: impl Fn(usize) -> String + Send + Sync,
    ) -> Result<Vec<MatchReference>> {
        let page_size = self.site.page_size;
        if page_size == 0 {
            return Err(HarvestError::Config("listing page size must be positive".into()));
        }

        let first = self.fetch_page(&url_at(0)).await?;
        let mut remaining = first.total;
        let mut matches = first.entries;
        let mut offset = 0;

        while remaining > page_size {
            offset += page_size;
            if offset >= limit {
                break;
            }
            let page = self.fetch_page(&url_at(offset)).await?;
            matches.extend(page.entries);
            remaining -= page_size;
        }

        matches.truncate(limit);
        info!(total = first.total, collected = matches.len(), limit, "crawled listing");
        Ok(matches)
    }

    async fn fetch_page(&self, url: &str) -> Result<ListingPage> {
        let page = self.fetcher.fetch(url).await?;
        let listing = parse_listing(&page.text)?;
        debug!(url, entries = listing.entries.len(), total = listing.total, "parsed listing page");
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::testing::{listing_page, rankings_page, references, MockFetcher};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Serves a listing of `total` references split into pages of 100.
    fn listing_fetcher(site: &SiteConfig, total: usize, team: Option<u64>) -> MockFetcher {
        let all = references(1, total);
        let fetcher = MockFetcher::new();
        for (page, chunk) in all.chunks(100).enumerate() {
            let offset = page * 100;
            let url = match team {
                Some(id) => site.team_results_url(id, offset),
                None => site.results_url(offset),
            };
            fetcher.set_page(url, listing_page(chunk, offset, total));
        }
        fetcher
    }

    #[tokio::test]
    async fn test_list_matches_stops_at_limit() {
        let site = SiteConfig::new();
        let fetcher = Arc::new(listing_fetcher(&site, 250, None));
        let crawler = ListingCrawler::new(Arc::clone(&fetcher), site);

        let matches = crawler.list_matches(150).await.unwrap();
        assert_eq!(matches.len(), 150);
        assert_eq!(matches[0].match_id, 1);
        assert_eq!(matches[149].match_id, 150);
        assert_eq!(fetcher.call_count(), 2);
    }

    #[tokio::test]
    async fn test_list_matches_stops_at_total() {
        let site = SiteConfig::new();
        let fetcher = Arc::new(listing_fetcher(&site, 250, None));
        let crawler = ListingCrawler::new(Arc::clone(&fetcher), site);

        let matches = crawler.list_matches(1_000).await.unwrap();
        assert_eq!(matches.len(), 250);
        assert_eq!(fetcher.call_count(), 3);
    }

    #[tokio::test]
    async fn test_list_matches_count_is_min_of_total_and_limit() {
        for (total, limit) in [(40, 100), (100, 100), (100, 30), (301, 300), (301, 301)] {
            let site = SiteConfig::new();
            let crawler = ListingCrawler::new(listing_fetcher(&site, total, None), site);
            let matches = crawler.list_matches(limit).await.unwrap();
            assert_eq!(matches.len(), total.min(limit), "total={total} limit={limit}");
        }
    }

    #[tokio::test]
    async fn test_list_matches_for_team() {
        let site = SiteConfig::new();
        let fetcher = Arc::new(listing_fetcher(&site, 120, Some(4608)));
        let crawler = ListingCrawler::new(Arc::clone(&fetcher), site);

        let matches = crawler.list_matches_for_team(4608, 500).await.unwrap();
        assert_eq!(matches.len(), 120);
        assert_eq!(
            fetcher.calls(),
            vec![
                "https://www.hltv.org/results?team=4608&offset=0".to_string(),
                "https://www.hltv.org/results?team=4608&offset=100".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_error_aborts() {
        let site = SiteConfig::new();
        let fetcher = listing_fetcher(&site, 250, None).with_status(site.results_url(100), 503);
        let crawler = ListingCrawler::new(fetcher, site);

        let err = crawler.list_matches(300).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[tokio::test]
    async fn test_listing_shape_error_aborts() {
        let site = SiteConfig::new();
        let fetcher = MockFetcher::new().with_page(site.results_url(0), "<html>captcha</html>");
        let crawler = ListingCrawler::new(fetcher, site);

        let err = crawler.list_matches(10).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Extraction);
    }

    #[tokio::test]
    async fn test_top_team_ids() {
        let site = SiteConfig::new();
        let fetcher = MockFetcher::new().with_page(site.ranking_url(), rankings_page(&[9565, 4608, 5995]));
        let crawler = ListingCrawler::new(fetcher, site);

        assert_eq!(crawler.top_team_ids().await.unwrap(), vec![9565, 4608, 5995]);
    }
}
