//! Historical series retrieval and the multi-series join.

use tracing::{debug, info, warn};

use crate::data::catalog::SeriesCatalog;
use crate::data::fred::{FredSource, SeriesSource};
use crate::domain::{DateRange, Frequency, SeriesId, TimeSeriesTable};
use crate::error::AppError;

/// Fetches named series from a [`SeriesSource`] and merges them into wide tables.
pub struct HistoricalSeriesClient<S> {
    source: S,
    catalog: SeriesCatalog,
}

impl HistoricalSeriesClient<FredSource> {
    /// FRED-backed client over the default Treasury catalog.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(FredSource::from_env()?))
    }
}

impl<S: SeriesSource> HistoricalSeriesClient<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            catalog: SeriesCatalog::treasury().clone(),
        }
    }

    pub fn with_catalog(mut self, catalog: SeriesCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &SeriesCatalog {
        &self.catalog
    }

    /// Retrieve one series as a `(date, <series_id>)` table.
    ///
    /// `frequency` is validated before the source is contacted. Any provider
    /// failure (including an unknown series id) becomes `DataUnavailable`.
    pub fn fetch_series(
        &self,
        series_id: impl Into<SeriesId>,
        range: &DateRange,
        frequency: &str,
    ) -> Result<TimeSeriesTable, AppError> {
        let frequency: Frequency = frequency.parse()?;
        self.fetch_series_at(series_id.into(), range, frequency)
    }

    /// Retrieve every catalog series and left-join them in catalog order.
    ///
    /// The first series anchors the row set; dates that only appear in later
    /// series are dropped. A single failing series fails the whole call.
    pub fn fetch_all_series(
        &self,
        range: &DateRange,
        frequency: &str,
    ) -> Result<TimeSeriesTable, AppError> {
        let frequency: Frequency = frequency.parse()?;

        let mut merged: Option<TimeSeriesTable> = None;
        for id in self.catalog.ids() {
            let table = self.fetch_series_at(id.clone(), range, frequency)?;
            merged = Some(match merged {
                None => table,
                Some(left) => left.left_join(&table)?,
            });
        }

        let merged = merged.unwrap_or_default();
        info!(
            series = self.catalog.len(),
            rows = merged.len(),
            "merged historical series"
        );
        Ok(merged)
    }

    fn fetch_series_at(
        &self,
        series_id: SeriesId,
        range: &DateRange,
        frequency: Frequency,
    ) -> Result<TimeSeriesTable, AppError> {
        debug!(series = %series_id, "fetching series");
        match self.source.fetch_observations(&series_id, range, frequency) {
            Ok(observations) => Ok(TimeSeriesTable::from_observations(series_id, observations)),
            Err(source) => {
                warn!(series = %series_id, error = %source, "series unavailable");
                Err(AppError::DataUnavailable { series_id, source })
            }
        }
    }
}
