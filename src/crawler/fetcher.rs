//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with user agent and timeouts
//! - GET requests for sitemap and restaurant pages
//! - Error classification into [`FetchFailure`]
//!
//! There is no retry and no caching; every call is one request.

use crate::config::HttpConfig;
use crate::{FetchError, FetchFailure};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A successfully fetched document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Decoded body text
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use good_spots::config::HttpConfig;
/// use good_spots::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies any failure
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | Any other status | `FetchFailure::Status` |
/// | Timeout | `FetchFailure::Timeout` |
/// | Connection refused, DNS, TLS | `FetchFailure::Connect` |
/// | Anything else, including body decoding | `FetchFailure::Transport` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The absolute URL to fetch
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    // Refuse anything the site would not serve
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(FetchError::new(
            url.as_str(),
            FetchFailure::Transport(format!("unsupported scheme '{}'", url.scheme())),
        ));
    }

    tracing::debug!("GET {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::new(url.as_str(), classify_error(&e)))?;

    // Check status
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(
            url.as_str(),
            FetchFailure::Status(status.as_u16()),
        ));
    }

    let final_url = response.url().clone();
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::new(url.as_str(), classify_error(&e)))?;

    Ok(FetchedPage {
        url: final_url,
        status: status.as_u16(),
        body,
    })
}

fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_connect() {
        FetchFailure::Connect(error.to_string())
    } else {
        FetchFailure::Transport(error.to_string())
    }
}

/// Shared HTTP client for every level of the crawl
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        fetch_url(&self.client, url).await
    }
}
