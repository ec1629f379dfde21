//! Shared glue between acquisition and analytics.
//!
//! - fetch the catalog history, then compute the curve inversion
//! - run the async yield bundle from synchronous code

use crate::analytics::YieldCurveAnalytics;
use crate::data::alphavantage::{HttpTransport, NamedPayloads, YieldFetcher};
use crate::data::fred::SeriesSource;
use crate::data::historical::HistoricalSeriesClient;
use crate::domain::{DateRange, DerivedMetricTable};
use crate::error::AppError;

/// Fetch every catalog series and compute `long - short` with its inversion flag.
pub fn inversion_history<S: SeriesSource>(
    client: &HistoricalSeriesClient<S>,
    range: &DateRange,
    frequency: &str,
    short_id: &str,
    long_id: &str,
) -> Result<DerivedMetricTable, AppError> {
    let table = client.fetch_all_series(range, frequency)?;
    YieldCurveAnalytics::new(&table).yield_curve_inversion(short_id, long_id)
}

/// Run [`YieldFetcher::fetch_yields`] to completion on a current-thread runtime.
///
/// Must not be called from inside another tokio runtime.
pub fn fetch_yields_blocking<T: HttpTransport>(
    fetcher: &YieldFetcher<T>,
    interval: &str,
) -> Result<NamedPayloads, AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;
    runtime.block_on(fetcher.fetch_yields(interval))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::data::alphavantage::HttpResponse;
    use crate::data::catalog::{CatalogEntry, SeriesCatalog};
    use crate::domain::{Frequency, Observation, SeriesId};
    use crate::error::ProviderError;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, day).unwrap()
    }

    struct CurveSource;

    impl SeriesSource for CurveSource {
        fn fetch_observations(
            &self,
            series_id: &SeriesId,
            _range: &DateRange,
            _frequency: Frequency,
        ) -> Result<Vec<Observation>, ProviderError> {
            let values: &[(u32, f64)] = match series_id.as_str() {
                "DGS3MO" => &[(3, 5.43), (5, 5.45), (6, 5.46)],
                "DGS10" => &[(3, 3.86), (5, 3.94), (6, 4.05), (7, 4.06)],
                _ => return Err(ProviderError::Status(400)),
            };
            Ok(values
                .iter()
                .map(|&(day, v)| Observation::new(d(day), Some(v)))
                .collect())
        }
    }

    #[test]
    fn inversion_history_uses_the_anchor_calendar() {
        let client = HistoricalSeriesClient::new(CurveSource).with_catalog(SeriesCatalog::new([
            CatalogEntry::new("DGS3MO", "3m"),
            CatalogEntry::new("DGS10", "10y"),
        ]));
        let range = DateRange::new(d(1), d(31)).unwrap();

        let out = inversion_history(&client, &range, "d", "DGS3MO", "DGS10").unwrap();
        assert_eq!(out.dates(), &[d(3), d(5), d(6)]);
        let flags = out.column("inversion_flag").unwrap();
        assert!(flags.iter().all(|f| *f == Some(1.0)));
    }

    #[test]
    fn inversion_history_propagates_fetch_errors() {
        let client = HistoricalSeriesClient::new(CurveSource)
            .with_catalog(SeriesCatalog::new([CatalogEntry::new("DGS5", "5y")]));
        let range = DateRange::new(d(1), d(31)).unwrap();
        let err = inversion_history(&client, &range, "d", "DGS3MO", "DGS10").unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable { .. }));
    }

    struct EchoTransport;

    #[async_trait]
    impl HttpTransport for EchoTransport {
        async fn get(&self, _url: &str, _api_key: &str) -> Result<HttpResponse, ProviderError> {
            Ok(HttpResponse {
                status: 200,
                body: r#"{"name":"Treasury Yield","data":[]}"#.into(),
            })
        }
    }

    #[test]
    fn blocking_wrapper_returns_full_bundle() {
        let fetcher = YieldFetcher::with_transport(EchoTransport, "demo");
        let payloads = fetch_yields_blocking(&fetcher, "daily").unwrap();
        assert_eq!(payloads.len(), 7);
        assert_eq!(payloads.get("FedFunds").unwrap()["name"], "Treasury Yield");

        let err = fetch_yields_blocking(&fetcher, "hourly").unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
