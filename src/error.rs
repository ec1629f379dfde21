//! Error types shared by the acquisition and analytics modules.
//!
//! Nothing in this crate recovers locally: every failure is returned to the
//! immediate caller as an [`AppError`].

use thiserror::Error;

use crate::domain::SeriesId;

/// What a data provider reported when a single request could not be served.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    /// Provider-level error message carried in the response body.
    #[error("provider error: {0}")]
    Api(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Out-of-enumeration frequency/interval, degenerate window, unknown column.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("could not retrieve series {series_id}: {source}")]
    DataUnavailable {
        series_id: SeriesId,
        #[source]
        source: ProviderError,
    },

    #[error("request {name} failed with status {status}")]
    RemoteError { name: String, status: u16 },

    #[error("request {name} could not be completed: {source}")]
    Transport {
        name: String,
        #[source]
        source: ProviderError,
    },

    #[error("missing configuration: {0}")]
    Config(String),

    #[error("async runtime unavailable: {0}")]
    Runtime(#[source] std::io::Error),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidArgument(message.into())
    }

    /// True for errors raised before any I/O was attempted.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, AppError::InvalidArgument(_))
    }
}
