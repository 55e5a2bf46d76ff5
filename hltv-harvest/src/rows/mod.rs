//! Row builders.
//!
//! Maps [`MatchRecord`](crate::model::MatchRecord)s onto the warehouse table
//! shapes. Everything here is pure and deterministic: building the same
//! records twice yields identical rows.

mod builders;
mod tables;


pub use builders::{build_row, build_rows, DenormalizedRows, MatchRows, NormalizedRows, RowSet};
pub use tables::{
    DenormalizedMapRow, DenormalizedMatchRow, DenormalizedPlayerStatRow, EventRow, MapRow,
    MatchRow, PlayerRow, PlayerStatRow, Row, TeamRow,
};
