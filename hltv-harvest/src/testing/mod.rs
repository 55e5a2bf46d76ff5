//! Testing utilities for harvest runs.
//!
//! This module provides:
//! - A recording [`MockFetcher`] serving canned pages
//! - Synthetic match, listing and rankings pages

mod fixtures;
mod mocks;

pub use fixtures::{
    listing_page, rankings_page, references, MapFixture, MatchPageFixture, EVENT_ID, TEAM1_ID,
    TEAM2_ID,
};
pub use mocks::MockFetcher;
