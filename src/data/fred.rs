//! FRED API integration for historical observation series.
//!
//! [`SeriesSource`] is the seam between the history client and the network;
//! [`FredSource`] is the production implementation over the FRED
//! `series/observations` endpoint.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::domain::{DateRange, Frequency, Observation, SeriesId};
use crate::error::{AppError, ProviderError};

pub const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Anything that can return the observations of one series over a date range.
pub trait SeriesSource {
    fn fetch_observations(
        &self,
        series_id: &SeriesId,
        range: &DateRange,
        frequency: Frequency,
    ) -> Result<Vec<Observation>, ProviderError>;
}

impl<S: SeriesSource + ?Sized> SeriesSource for &S {
    fn fetch_observations(
        &self,
        series_id: &SeriesId,
        range: &DateRange,
        frequency: Frequency,
    ) -> Result<Vec<Observation>, ProviderError> {
        (**self).fetch_observations(series_id, range, frequency)
    }
}

pub struct FredSource {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FredSource {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: FRED_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(Credentials::from_env().fred_key()?))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl SeriesSource for FredSource {
    fn fetch_observations(
        &self,
        series_id: &SeriesId,
        range: &DateRange,
        frequency: Frequency,
    ) -> Result<Vec<Observation>, ProviderError> {
        debug!(series = %series_id, start = %range.start, end = %range.end, frequency = frequency.code(), "requesting FRED series");

        let start = range.start.to_string();
        let end = range.end.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("series_id", series_id.as_str()),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", start.as_str()),
                ("observation_end", end.as_str()),
                ("frequency", frequency.code()),
            ])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            // FRED explains rejections (e.g. unknown series) in a JSON body.
            let message = resp
                .json::<ErrorResponse>()
                .ok()
                .and_then(|body| body.error_message);
            warn!(series = %series_id, status = status.as_u16(), "FRED request rejected");
            return Err(match message {
                Some(msg) => ProviderError::Api(format!("{msg} (status {})", status.as_u16())),
                None => ProviderError::Status(status.as_u16()),
            });
        }

        let body: ObservationsResponse = resp.json()?;
        decode_observations(body)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: Option<String>,
}

fn decode_observations(body: ObservationsResponse) -> Result<Vec<Observation>, ProviderError> {
    body.observations
        .into_iter()
        .map(|obs| {
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|e| {
                ProviderError::Malformed(format!("invalid FRED date '{}': {e}", obs.date))
            })?;
            Ok(Observation::new(date, parse_value(&obs.value)))
        })
        .collect()
}

/// FRED reports missing periods as `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
