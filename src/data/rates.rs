//! Currency rate API client
//!
//! Fetches the latest USD-based exchange rates from exchangerate-api.com and
//! parses the `rates` object of the response into a [`RateTable`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::RateTable;

/// Default endpoint for USD-based rates
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Timeout applied to the whole rate request
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur when fetching currency rates
#[derive(Debug, Error)]
pub enum RateFetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Rate source returned HTTP {0}")]
    HttpStatus(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Response had no `rates` object
    #[error("Missing expected field in response: rates")]
    MissingRates,
}

/// Anything that can produce a fresh rate table
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches a complete rate table
    async fn fetch_rates(&self) -> Result<RateTable, RateFetchError>;
}

/// Response shape of the rate API; everything but `rates` is ignored
#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: Option<RateTable>,
}

/// Client for fetching currency rates over HTTP
#[derive(Debug, Clone)]
pub struct RatesClient {
    client: Client,
    url: String,
}

impl Default for RatesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RatesClient {
    /// Create a new RatesClient pointed at the default endpoint
    pub fn new() -> Self {
        Self::with_url(DEFAULT_RATES_URL)
    }

    /// Create a new RatesClient pointed at a custom endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self::with_client(client, url)
    }

    /// Create a new RatesClient with a custom HTTP client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The endpoint this client fetches from
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RateSource for RatesClient {
    async fn fetch_rates(&self) -> Result<RateTable, RateFetchError> {
        tracing::debug!(url = %self.url, "fetching currency rates");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RateFetchError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        parse_rates(&text)
    }
}

/// Parse a rate API body into a RateTable
///
/// # Returns
/// * `Ok(RateTable)` with every entry of the `rates` object
/// * `Err(RateFetchError::ParseError)` if the body is not the expected JSON
/// * `Err(RateFetchError::MissingRates)` if there is no `rates` object
pub fn parse_rates(body: &str) -> Result<RateTable, RateFetchError> {
    let response: RatesResponse = serde_json::from_str(body)?;
    response.rates.ok_or(RateFetchError::MissingRates)
}
