//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - series identifiers and observations (`SeriesId`, `Observation`)
//! - request vocabularies (`Frequency`, `Interval`) and `DateRange`
//! - injected time (`Clock`, `SystemClock`, `FixedClock`)
//! - the date-indexed tables exchanged between fetch and analytics

pub mod series;
pub mod table;

pub use series::*;
pub use table::*;
