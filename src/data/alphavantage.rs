//! AlphaVantage bundle fetcher.
//!
//! A bundle is a fixed set of named requests (policy rate plus Treasury
//! maturities, or three macro indicators). All requests of a bundle are issued
//! at once on the calling task and joined with an all-or-nothing barrier:
//!
//! - the result is only assembled after every request has succeeded
//! - the first failure observed fails the call and drops the remaining requests
//! - result order is the bundle's declared order, not completion order

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::domain::Interval;
use crate::error::{AppError, ProviderError};

pub const ALPHAVANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Treasury maturities of the yield bundle, shortest first.
pub const MATURITIES: [&str; 6] = ["3month", "2year", "5year", "7year", "10year", "30year"];

/// Raw response of one GET: status code plus undecoded body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The network seam of [`YieldFetcher`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, api_key: &str) -> Result<HttpResponse, ProviderError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    async fn get(&self, url: &str, api_key: &str) -> Result<HttpResponse, ProviderError> {
        (**self).get(url, api_key).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, api_key: &str) -> Result<HttpResponse, ProviderError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// One fully formed request of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRequest {
    pub name: &'static str,
    pub url: String,
}

/// Fixed name → request mapping, built fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSet {
    requests: Vec<NamedRequest>,
}

impl RequestSet {
    /// `FedFunds` followed by the Treasury maturities in ascending order.
    pub fn yields(base_url: &str, interval: Interval, api_key: &str) -> Self {
        let mut requests = Vec::with_capacity(MATURITIES.len() + 1);
        requests.push(NamedRequest {
            name: "FedFunds",
            url: format!("{base_url}?function=FEDERAL_FUNDS_RATE&interval={interval}&apikey={api_key}"),
        });
        for maturity in MATURITIES {
            requests.push(NamedRequest {
                name: maturity,
                url: format!(
                    "{base_url}?function=TREASURY_YIELD&interval={interval}&maturity={maturity}&apikey={api_key}"
                ),
            });
        }
        Self { requests }
    }

    /// CPI, real GDP per capita and inflation.
    ///
    /// Real GDP per capita is only published at its native frequency, so its
    /// request carries no interval.
    pub fn economic(base_url: &str, interval: Interval, api_key: &str) -> Self {
        Self {
            requests: vec![
                NamedRequest {
                    name: "CPI",
                    url: format!("{base_url}?function=CPI&interval={interval}&apikey={api_key}"),
                },
                NamedRequest {
                    name: "RealGDPPerCapita",
                    url: format!("{base_url}?function=REAL_GDP_PER_CAPITA&apikey={api_key}"),
                },
                NamedRequest {
                    name: "Inflation",
                    url: format!("{base_url}?function=INFLATION&interval={interval}&apikey={api_key}"),
                },
            ],
        }
    }

    pub fn requests(&self) -> &[NamedRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Ordered name → JSON payload mapping. Payloads are passed through unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPayloads {
    entries: Vec<(&'static str, Value)>,
}

impl NamedPayloads {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(&'static str, Value)> {
        self.entries
    }
}

pub struct YieldFetcher<T = ReqwestTransport> {
    transport: T,
    api_key: String,
    base_url: String,
}

impl YieldFetcher<ReqwestTransport> {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_transport(ReqwestTransport::default(), api_key)
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(Credentials::from_env().alphavantage_key()?))
    }
}

impl<T: HttpTransport> YieldFetcher<T> {
    pub fn with_transport(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            base_url: ALPHAVANTAGE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the policy rate and every Treasury maturity for `interval`.
    pub async fn fetch_yields(&self, interval: &str) -> Result<NamedPayloads, AppError> {
        let interval: Interval = interval.parse()?;
        self.fetch_bundle(RequestSet::yields(&self.base_url, interval, &self.api_key))
            .await
    }

    /// Fetch CPI, real GDP per capita and inflation for `interval`.
    pub async fn fetch_economic_data(&self, interval: &str) -> Result<NamedPayloads, AppError> {
        let interval: Interval = interval.parse()?;
        self.fetch_bundle(RequestSet::economic(&self.base_url, interval, &self.api_key))
            .await
    }

    /// Issue every request of `set` concurrently and join all-or-nothing.
    pub async fn fetch_bundle(&self, set: RequestSet) -> Result<NamedPayloads, AppError> {
        let payloads = try_join_all(set.requests.iter().map(|req| self.fetch_one(req))).await?;

        let entries: Vec<(&'static str, Value)> = set
            .requests
            .iter()
            .map(|req| req.name)
            .zip(payloads)
            .collect();
        info!(requests = entries.len(), "fetched AlphaVantage bundle");
        Ok(NamedPayloads { entries })
    }

    async fn fetch_one(&self, req: &NamedRequest) -> Result<Value, AppError> {
        debug!(request = req.name, "requesting AlphaVantage endpoint");

        let resp = self
            .transport
            .get(&req.url, &self.api_key)
            .await
            .map_err(|source| AppError::Transport {
                name: req.name.to_string(),
                source,
            })?;

        if resp.status != 200 {
            warn!(request = req.name, status = resp.status, "AlphaVantage request failed");
            return Err(AppError::RemoteError {
                name: req.name.to_string(),
                status: resp.status,
            });
        }

        serde_json::from_str(&resp.body).map_err(|e| AppError::Transport {
            name: req.name.to_string(),
            source: ProviderError::Malformed(e.to_string()),
        })
    }
}
