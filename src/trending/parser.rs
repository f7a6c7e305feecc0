//! HTML extractor for the trending leaderboard
//!
//! This module is the only place coupled to GitHub's markup. For every
//! `article.Box-row` it extracts:
//! - The repository identifier (`owner/name`)
//! - Description and language tag, both optional
//! - Total stars, forks and the star delta for the requested period
//! - "Built by" contributor avatars

use crate::trending::types::GITHUB_BASE_URL;
use crate::trending::{Contributor, Leaderboard, LeaderboardEntry};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors raised when the markup no longer matches the expected layout
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No leaderboard rows found; the trending page markup may have changed")]
    MissingRows,

    #[error("Invalid selector '{selector}': {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },
}

/// Compiled selectors for one extraction pass
struct RowSelectors {
    row: Selector,
    empty_state: Selector,
    repo_link: Selector,
    description: Selector,
    any_paragraph: Selector,
    language: Selector,
    stars: Selector,
    forks: Selector,
    period_stars: Selector,
    avatar: Selector,
}

impl RowSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            row: selector("article.Box-row")?,
            empty_state: selector(".blankslate")?,
            repo_link: selector("h2 a[href]")?,
            description: selector("p.col-9")?,
            any_paragraph: selector("p")?,
            language: selector("span[itemprop='programmingLanguage']")?,
            stars: selector("a[href$='/stargazers']")?,
            forks: selector("a[href$='/forks']")?,
            period_stars: selector("span.float-sm-right")?,
            avatar: selector("img.avatar")?,
        })
    }
}

fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css,
        message: e.to_string(),
    })
}

/// Parses trending page markup into a ranked leaderboard
///
/// Rows without a repository link are skipped and the remaining rows are
/// ranked 1..N in page order. Malformed counts become 0 rather than dropping
/// the row. A page showing GitHub's empty-state block yields an empty
/// leaderboard.
///
/// # Errors
///
/// Returns `ExtractError::MissingRows` when no usable row is present and the
/// page is not the empty-state page.
///
/// # Example
///
/// ```
/// use trending_relay::trending::extract_leaderboard;
///
/// let html = r#"<article class="Box-row">
///     <h2><a href="/octo/alpha">octo / alpha</a></h2>
/// </article>"#;
/// let board = extract_leaderboard(html).unwrap();
/// assert_eq!(board.entries()[0].full_name(), "octo/alpha");
/// ```
pub fn extract_leaderboard(markup: &str) -> Result<Leaderboard, ExtractError> {
    let selectors = RowSelectors::new()?;
    let document = Html::parse_document(markup);

    let rows: Vec<ElementRef> = document.select(&selectors.row).collect();
    if rows.is_empty() {
        if document.select(&selectors.empty_state).next().is_some() {
            tracing::warn!("Trending page reports no repositories for this filter");
            return Ok(Leaderboard::default());
        }
        return Err(ExtractError::MissingRows);
    }

    let mut entries = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let rank = entries.len() as u32 + 1;
        match extract_entry(row, &selectors, rank) {
            Some(entry) => entries.push(entry),
            None => tracing::warn!(row = index + 1, "Skipping row without a repository link"),
        }
    }

    if entries.is_empty() {
        return Err(ExtractError::MissingRows);
    }

    tracing::debug!(entries = entries.len(), "Leaderboard extracted");
    Ok(Leaderboard::new(entries))
}

fn extract_entry(
    row: &ElementRef,
    selectors: &RowSelectors,
    rank: u32,
) -> Option<LeaderboardEntry> {
    let href = row
        .select(&selectors.repo_link)
        .next()
        .and_then(|a| a.value().attr("href"))?;
    let (owner, name) = split_repo_path(href)?;

    let description = row
        .select(&selectors.description)
        .next()
        .or_else(|| row.select(&selectors.any_paragraph).next())
        .map(element_text)
        .filter(|text| !text.is_empty());

    let language = row
        .select(&selectors.language)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());

    let total_stars = count_in(row, &selectors.stars, "stars", &owner, &name);
    let forks = count_in(row, &selectors.forks, "forks", &owner, &name);
    let period_stars = count_in(row, &selectors.period_stars, "period stars", &owner, &name)
        .min(total_stars);

    let contributors = row
        .select(&selectors.avatar)
        .filter_map(|img| {
            let login = img.value().attr("alt")?.trim().trim_start_matches('@');
            if login.is_empty() {
                return None;
            }
            Some(Contributor {
                login: login.to_string(),
                avatar_url: img.value().attr("src").unwrap_or_default().to_string(),
            })
        })
        .collect();

    Some(LeaderboardEntry {
        rank,
        owner,
        name,
        description,
        language,
        total_stars,
        period_stars,
        forks,
        contributors,
    })
}

/// Splits `/owner/name` (or an absolute github.com link) into its parts
fn split_repo_path(href: &str) -> Option<(String, String)> {
    let path = href.trim();
    let path = path.strip_prefix(GITHUB_BASE_URL).unwrap_or(path);
    let (owner, name) = path.trim_matches('/').split_once('/')?;

    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

/// Reads the leading count of the first matching element, 0 when absent or malformed
fn count_in(row: &ElementRef, selector: &Selector, field: &str, owner: &str, name: &str) -> u64 {
    let Some(element) = row.select(selector).next() else {
        return 0;
    };
    let text = element_text(element);
    parse_count(&text).unwrap_or_else(|| {
        tracing::debug!(
            repo = %format!("{}/{}", owner, name),
            field,
            text = %text,
            "Malformed count, using 0"
        );
        0
    })
}

/// Parses the leading thousands-separated integer, e.g. "1,234 stars this week"
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    let token = text.split_whitespace().next()?;
    token.replace(',', "").parse().ok()
}

/// Collects element text with whitespace collapsed
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
