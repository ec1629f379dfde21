//! Data acquisition.
//!
//! - `catalog`: default FRED series and their descriptions
//! - `fred` + `historical`: historical series from FRED, joined by date
//! - `alphavantage`: concurrent yield / macro bundles from AlphaVantage

pub mod alphavantage;
pub mod catalog;
pub mod fred;
pub mod historical;

pub use alphavantage::{HttpTransport, NamedPayloads, RequestSet, ReqwestTransport, YieldFetcher};
pub use catalog::{CatalogEntry, SeriesCatalog};
pub use fred::{FredSource, SeriesSource};
pub use historical::HistoricalSeriesClient;
