//! Page fetching.
//!
//! This module provides:
//! - [`FetchConfig`] and [`SiteConfig`] for transport and URL layout
//! - The [`Fetcher`] protocol trait
//! - [`HttpFetcher`], the `reqwest` implementation (feature `http`)

pub mod config;
#[cfg(feature = "http")]
pub mod http;
pub mod protocols;

pub use config::{FetchConfig, SiteConfig};
#[cfg(feature = "http")]
pub use http::HttpFetcher;
pub use protocols::{FetchResult, Fetcher};
