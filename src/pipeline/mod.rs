//! Pipeline driver
//!
//! Runs one pass of fetch → extract → deliver:
//! 1. Fetch and extract the leaderboard (fatal on failure)
//! 2. Truncate to the request limit and post the card
//! 3. Upsert every extracted entry into the table
//!
//! The card and the table receive read-only views of the same leaderboard.
//! A failing sink is reported in the [`RunReport`] and never stops the other.

mod report;

pub use report::{
    print_report, RunReport, RunStatus, SinkOutcome, SyncOutcome, FATAL_EXIT_CODE,
    PARTIAL_EXIT_CODE,
};

use crate::config::{parse_http_url, Config, Settings};
use crate::feishu::{
    build_row, format_card, send_card, BitableStore, CardPayload, Snapshot, TableRow, TableSyncer,
};
use crate::trending::{build_http_client, fetch_leaderboard, FetchRequest, Leaderboard};
use crate::TrendingError;
use chrono::NaiveDate;
use reqwest::Client;
use url::Url;

/// Runs the full pipeline for one snapshot date
///
/// # Returns
///
/// * `Ok(RunReport)` - Fetch and extraction succeeded; sinks may have failed
/// * `Err(TrendingError)` - Configuration, fetch or extraction failed and
///   nothing was delivered
pub async fn run_pipeline(
    config: &Config,
    snapshot_date: NaiveDate,
) -> Result<RunReport, TrendingError> {
    let trending_base = parse_http_url(
        "trending-base-url",
        &config.settings.endpoints.trending_base_url,
    )?;
    let feishu_base =
        parse_http_url("feishu-base-url", &config.settings.endpoints.feishu_base_url)?;
    let client = build_http_client(&config.settings.http)?;

    let leaderboard = fetch_leaderboard(&client, &trending_base, &config.request).await?;
    if leaderboard.is_empty() {
        tracing::warn!("No trending repositories found; nothing to deliver");
        return Ok(RunReport::empty());
    }

    let shown = leaderboard.top(config.request.limit);
    let card = format_card(&config.request, shown, &config.settings.card);
    let notify = notify(&client, &config.feishu.webhook_url, &card).await;

    let snapshot = Snapshot::new(snapshot_date, &config.request);
    let sync = sync_table(&client, &feishu_base, config, &leaderboard, &snapshot).await;

    let report = RunReport {
        extracted: leaderboard.len(),
        delivered: shown.len(),
        notify,
        sync,
    };
    tracing::info!("Run finished with status: {}", report.status().as_str());
    Ok(report)
}

async fn notify(client: &Client, webhook_url: &str, card: &CardPayload) -> SinkOutcome {
    match send_card(client, webhook_url, card).await {
        Ok(()) => {
            tracing::info!("Card with {} entries sent to webhook", card.lines.len());
            SinkOutcome::Delivered
        }
        Err(e) => {
            tracing::error!("Failed to send card: {}", e);
            SinkOutcome::Failed(e.to_string())
        }
    }
}

async fn sync_table(
    client: &Client,
    feishu_base: &Url,
    config: &Config,
    leaderboard: &Leaderboard,
    snapshot: &Snapshot,
) -> SyncOutcome {
    let Some(bitable) = &config.feishu.bitable else {
        return SyncOutcome::Skipped("Bitable not configured".to_string());
    };

    let store = match BitableStore::connect(client.clone(), feishu_base, bitable).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to connect to Bitable: {}", e);
            return SyncOutcome::Failed(e.to_string());
        }
    };

    tracing::info!(
        "Syncing {} entries to Bitable as {}",
        leaderboard.len(),
        snapshot.source_tag()
    );
    let report = TableSyncer::new(store)
        .sync(leaderboard.entries(), snapshot)
        .await;
    SyncOutcome::Synced(report)
}

/// Everything a run would deliver, without delivering it
#[derive(Debug, Clone)]
pub struct Preview {
    pub leaderboard: Leaderboard,
    pub card: CardPayload,
    pub rows: Vec<TableRow>,
}

/// Fetches and renders the card and table rows without touching any sink
pub async fn preview(
    request: &FetchRequest,
    settings: &Settings,
    snapshot_date: NaiveDate,
) -> Result<Preview, TrendingError> {
    let trending_base = parse_http_url("trending-base-url", &settings.endpoints.trending_base_url)?;
    let client = build_http_client(&settings.http)?;

    let leaderboard = fetch_leaderboard(&client, &trending_base, request).await?;
    let card = format_card(request, leaderboard.top(request.limit), &settings.card);

    let snapshot = Snapshot::new(snapshot_date, request);
    let rows = leaderboard
        .iter()
        .map(|entry| build_row(entry, &snapshot))
        .collect();

    Ok(Preview {
        leaderboard,
        card,
        rows,
    })
}
