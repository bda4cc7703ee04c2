/// Configuration for the cinebase record store client
use crate::error::{StoreError, StoreResult};
use std::env;
use std::time::Duration;

/// Default per-request deadline in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default cap on concurrent fan-out requests
const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Client configuration
///
/// Immutable after construction: the client holds no mutable session state
/// beyond this static credential.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base address of the record store, including the workspace segment
    pub base_url: String,
    /// Static bearer credential attached to every request
    pub api_token: String,
    /// Per-request deadline
    pub request_timeout: Duration,
    /// Maximum number of concurrent fan-out requests
    pub max_in_flight: usize,
}

impl StoreConfig {
    /// Build a configuration with default timeout and fan-out bounds
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> StoreResult<Self> {
        dotenv::dotenv().ok();

        let base_url = env::var("CINEBASE_BASE_URL")
            .map_err(|_| StoreError::Configuration("Base URL required".to_string()))?;
        let api_token = env::var("CINEBASE_API_TOKEN")
            .map_err(|_| StoreError::Configuration("API token required".to_string()))?;
        let request_timeout = env::var("CINEBASE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let max_in_flight = env::var("CINEBASE_MAX_IN_FLIGHT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_IN_FLIGHT);

        let config = Self {
            base_url,
            api_token,
            request_timeout,
            max_in_flight,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> StoreResult<()> {
        if self.api_token.is_empty() {
            return Err(StoreError::Configuration(
                "API token cannot be empty".to_string(),
            ));
        }

        reqwest::Url::parse(&self.base_url)
            .map_err(|e| StoreError::InvalidAddress(format!("{}: {}", self.base_url, e)))?;

        if self.max_in_flight == 0 {
            return Err(StoreError::Configuration(
                "max_in_flight must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
