//! Credential loading.
//!
//! Keys are read from the process environment, after loading a `.env` file if
//! one is present. A missing key is only an error once the provider that needs
//! it is constructed.

use crate::error::AppError;

pub const FRED_API_KEY: &str = "FRED_API_KEY";
pub const ALPHAVANTAGE_API_KEY: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Clone, Default)]
pub struct Credentials {
    pub fred: Option<String>,
    pub alphavantage: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            fred: read_key(FRED_API_KEY),
            alphavantage: read_key(ALPHAVANTAGE_API_KEY),
        }
    }

    pub fn fred_key(&self) -> Result<String, AppError> {
        self.fred.clone().ok_or_else(|| missing(FRED_API_KEY))
    }

    pub fn alphavantage_key(&self) -> Result<String, AppError> {
        self.alphavantage.clone().ok_or_else(|| missing(ALPHAVANTAGE_API_KEY))
    }
}

// Keys are never printed.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("fred", &self.fred.as_ref().map(|_| "<redacted>"))
            .field("alphavantage", &self.alphavantage.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn read_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing(name: &str) -> AppError {
    AppError::Config(format!("Missing {name} in environment (.env)."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_config_error() {
        let creds = Credentials::default();
        let err = creds.fred_key().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains(FRED_API_KEY));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let creds = Credentials {
            fred: Some("secret-fred".into()),
            alphavantage: None,
        };
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("secret-fred"));
        assert!(dbg.contains("<redacted>"));
        assert_eq!(creds.fred_key().unwrap(), "secret-fred");
    }
}
