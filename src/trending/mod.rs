//! Trending leaderboard retrieval
//!
//! This module contains the source side of the pipeline:
//! - Building the leaderboard URL and fetching the page
//! - Extracting ranked entries from the page markup
//! - The entry, request and period types shared with the sinks

mod fetcher;
mod parser;
mod types;

pub use fetcher::{build_http_client, build_trending_url, fetch_page, FetchError};
pub use parser::{extract_leaderboard, ExtractError};
pub use types::{Contributor, FetchRequest, Leaderboard, LeaderboardEntry, Period};

use reqwest::Client;
use url::Url;

/// Fetches and extracts the leaderboard for a request
///
/// Fetch and extraction failures are kept apart in the returned error: a
/// `FetchError` is usually transient, an `ExtractError` means the extractor
/// needs updating.
pub async fn fetch_leaderboard(
    client: &Client,
    base_url: &Url,
    request: &FetchRequest,
) -> Result<Leaderboard, crate::TrendingError> {
    let url = build_trending_url(base_url, request)?;
    tracing::info!("Fetching {}", url);

    let markup = fetch_page(client, &url).await?;
    let leaderboard = extract_leaderboard(&markup)?;

    tracing::info!("Extracted {} leaderboard entries", leaderboard.len());
    Ok(leaderboard)
}
