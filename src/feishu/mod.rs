//! Feishu delivery sinks
//!
//! This module handles both destinations of a run:
//! - Rendering the interactive card and posting it to the chat webhook
//! - Exchanging app credentials for a tenant token
//! - Upserting one Bitable row per leaderboard entry
//!
//! The two sinks are independent; neither one's failure affects the other.

mod auth;
mod bitable;
mod card;
mod sync;
mod traits;
mod webhook;

pub use auth::{fetch_tenant_token, TenantToken};
pub use bitable::BitableStore;
pub use card::{format_card, shorten, CardPayload, WebhookMessage, TRENDING_PAGE_URL};
pub use sync::{build_row, RowFailure, Snapshot, SyncReport, TableSyncer};
pub use traits::{RecordStore, RowKey, SyncError, SyncResult, TableRow};
pub use webhook::{send_card, DeliveryError};

use url::Url;

/// Joins an API path onto the open platform base URL
pub(crate) fn api_url(base: &Url, path: &str) -> SyncResult<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| SyncError::InvalidUrl(format!("{}: {}", joined, e)))
}
