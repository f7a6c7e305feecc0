//! HTTP fetcher for the trending page
//!
//! This module handles:
//! - Building the HTTP client with a browser-like user agent
//! - Building the leaderboard URL from a fetch request
//! - GET requests with status and timeout classification

use crate::config::HttpSettings;
use crate::trending::FetchRequest;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while retrieving the trending page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Cannot build trending URL from base {0}")]
    InvalidUrl(String),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}")]
    Connect { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

/// Builds the HTTP client shared by every outbound call of a run
///
/// Leaderboard sites may reject default client user agents, so the configured
/// one is always sent.
///
/// # Example
///
/// ```no_run
/// use trending_relay::config::HttpSettings;
/// use trending_relay::trending::build_http_client;
///
/// let client = build_http_client(&HttpSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(FetchError::Client)
}

/// Builds `<base>[/<language>]?since=<period>`
///
/// The language is a path segment, the way github.com lays out its trending
/// pages.
pub fn build_trending_url(base: &Url, request: &FetchRequest) -> Result<Url, FetchError> {
    let mut url = base.clone();

    if let Some(language) = &request.language {
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(base.to_string()))?
            .pop_if_empty()
            .push(language);
    }

    url.query_pairs_mut()
        .clear()
        .append_pair("since", request.period.as_str());

    Ok(url)
}

/// Fetches the page body, failing on any non-success status
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    tracing::debug!(%url, "Fetching trending page");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;
    tracing::debug!(bytes = body.len(), "Trending page received");
    Ok(body)
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    let url = url.to_string();
    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_connect() {
        FetchError::Connect { url }
    } else {
        FetchError::Http { url, source: error }
    }
}
