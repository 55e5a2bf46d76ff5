//! Domain model for harvested matches.
//!
//! This module contains the types that flow through the pipeline:
//! - match references produced by the listing crawler
//! - the nested match record produced by the page extractor
//! - the pick/ban sequence and its fold accumulator

mod record;
mod reference;
mod veto;

pub use record::{
    EventRef, ForfeitSide, MapKey, MapOutcome, MapResult, MapSide, MatchMeta, MatchPlayerStats,
    MatchRecord, MatchStatus, PlayerIdentity, PlayerStatBlock, RoundResults, Side, TeamPair,
    TeamResult,
};
pub use reference::MatchReference;
pub use veto::{PickBanEntry, VetoAction, VetoSummary};
