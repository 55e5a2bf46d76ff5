//! Small pure helpers shared by the extractors.
//!
//! - numeric identifier extraction from site links
//! - match date parsing into UTC timestamps

mod ids;
pub mod timestamps;

pub use ids::{extract_ids, first_id, last_id};
pub use timestamps::{format_iso8601, parse_match_date, parse_unix_millis, Timestamp, TimestampError};
