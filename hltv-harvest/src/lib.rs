//! # hltv-harvest
//!
//! Harvests professional CS match results from HLTV and normalizes them into
//! warehouse-ready rows.
//!
//! The harvest runs in three steps:
//!
//! - **Listing crawl**: page through the results listing and collect match
//!   references, up to a requested count
//! - **Page extraction**: turn each match page into a nested [`MatchRecord`]
//!   with teams, event, format, veto, per-map results and player stats
//! - **Normalization**: drain the reference queue one match at a time into
//!   dimension tables and fact rows, isolating per-match failures and
//!   checkpointing unfinished work
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hltv_harvest::prelude::*;
//! use std::sync::Arc;
//!
//! let config = HarvestConfig::from_file("harvest.json")?;
//! init_tracing(&config.log)?;
//!
//! let fetcher = Arc::new(HttpFetcher::new(config.fetch.clone())?);
//! let crawler = ListingCrawler::new(Arc::clone(&fetcher), config.site.clone());
//! let references = crawler.list_matches(500).await?;
//!
//! let orchestrator: NormalizationOrchestrator<_> =
//!     NormalizationOrchestrator::new(fetcher, config.site, config.orchestrator);
//! match orchestrator.run(references).await? {
//!     RunOutcome::Done(bundle) => println!("{} matches", bundle.stats.processed),
//!     RunOutcome::Checkpointed { checkpoint, .. } => {
//!         println!("{} left for the next run", checkpoint.pending.len());
//!     }
//!     RunOutcome::Unsaved { checkpoint, error, .. } => {
//!         eprintln!("could not save {} pending: {error}", checkpoint.pending.len());
//!     }
//! }
//! ```
//!
//! [`MatchRecord`]: crate::model::MatchRecord

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod crawl;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod rows;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::HarvestConfig;
    pub use crate::crawl::ListingCrawler;
    pub use crate::errors::{
        ExtractionError, FailureKind, HarvestError, Result, TransportError,
    };
    pub use crate::extract::MatchPageExtractor;
    #[cfg(feature = "http")]
    pub use crate::fetch::HttpFetcher;
    pub use crate::fetch::{FetchConfig, FetchResult, Fetcher, SiteConfig};
    pub use crate::model::{MatchRecord, MatchReference, PickBanEntry, VetoAction};
    pub use crate::observability::{
        init_tracing, LogConfig, LoggingRunObserver, NoOpRunObserver, RunObserver,
    };
    pub use crate::pipeline::{
        Checkpoint, CheckpointStore, FileCheckpointStore, HarvestBundle, NormalizationOrchestrator,
        OrchestratorConfig, RunOutcome, RunPhase, RunState, StepError,
    };
    pub use crate::rows::{
        build_row, build_rows, DenormalizedRows, NormalizedRows, Row, RowSet,
    };
    pub use crate::utils::Timestamp;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::testing::MatchPageFixture;

    #[test]
    fn test_prelude_extracts_and_builds_rows() {
        let html = MatchPageFixture::new().render();
        let record = MatchPageExtractor::new().extract(2_366_000, &html).unwrap();
        let rows: NormalizedRows = build_rows([&record]);
        assert_eq!(rows.match_count(), 1);
    }
}
