//! Tenant access token exchange
//!
//! Trades the app id and secret for a tenant token used as the bearer
//! credential on Bitable calls.

use crate::feishu::traits::{SyncError, SyncResult};
use crate::feishu::api_url;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

const TOKEN_PATH: &str = "open-apis/auth/v3/tenant_access_token/internal";

/// Tenant access token, held for a single run
#[derive(Clone)]
pub struct TenantToken {
    value: String,
    expires_in: u64,
}

impl TenantToken {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Lifetime in seconds reported by the server
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }
}

impl std::fmt::Debug for TenantToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantToken")
            .field("value", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenReply {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    #[serde(default)]
    expire: u64,
}

/// Exchanges app credentials for a tenant access token
pub async fn fetch_tenant_token(
    client: &Client,
    base_url: &Url,
    app_id: &str,
    app_secret: &str,
) -> SyncResult<TenantToken> {
    let url = api_url(base_url, TOKEN_PATH)?;
    tracing::debug!(app_id, "Requesting tenant access token");

    let response = client
        .post(url)
        .json(&json!({ "app_id": app_id, "app_secret": app_secret }))
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SyncError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let reply: TokenReply =
        serde_json::from_str(&body).map_err(|e| SyncError::InvalidResponse(e.to_string()))?;

    if reply.code != 0 {
        return Err(SyncError::Auth(format!("code {}: {}", reply.code, reply.msg)));
    }

    let value = reply
        .tenant_access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SyncError::Auth("response carried no tenant_access_token".to_string()))?;

    Ok(TenantToken {
        value,
        expires_in: reply.expire,
    })
}
