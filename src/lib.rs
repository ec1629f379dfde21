//! `yc-central` library crate.
//!
//! Retrieves U.S. Treasury yield curve and macro series and derives a few
//! curve analytics from them:
//!
//! - `data`: FRED history (blocking) and AlphaVantage bundles (async, concurrent)
//! - `analytics`: inversion, rolling regression/correlation/volatility, contango
//! - `pipeline`: glue for the common fetch-then-analyse paths

pub mod analytics;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod math;
pub mod pipeline;
