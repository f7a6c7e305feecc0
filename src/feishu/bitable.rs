//! Bitable record store
//!
//! HTTP implementation of [`RecordStore`] against the Feishu Bitable records
//! API. The tenant token is fetched once in [`BitableStore::connect`] and
//! reused for every call of the run.

use crate::config::BitableConfig;
use crate::feishu::auth::{fetch_tenant_token, TenantToken};
use crate::feishu::traits::{RecordStore, RowKey, SyncError, SyncResult, TableRow};
use crate::feishu::api_url;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

/// Standard Feishu response envelope
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    items: Option<Vec<RecordData>>,
}

#[derive(Debug, Deserialize)]
struct RecordEnvelope {
    record: RecordData,
}

#[derive(Debug, Deserialize)]
struct RecordData {
    record_id: String,
}

/// Record store backed by one Bitable table
pub struct BitableStore {
    client: Client,
    records_url: String,
    token: TenantToken,
}

impl BitableStore {
    /// Authenticates and binds the store to the configured table
    pub async fn connect(
        client: Client,
        base_url: &Url,
        config: &BitableConfig,
    ) -> SyncResult<Self> {
        let token =
            fetch_tenant_token(&client, base_url, &config.app_id, &config.app_secret).await?;
        tracing::info!(
            expires_in = token.expires_in(),
            "Obtained Bitable access token"
        );

        let records_url = api_url(
            base_url,
            &format!(
                "open-apis/bitable/v1/apps/{}/tables/{}/records",
                config.app_token, config.table_id
            ),
        )?
        .to_string();

        Ok(Self {
            client,
            records_url,
            token,
        })
    }

    /// Sends an authorized request and unwraps the response envelope
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> SyncResult<T> {
        let response = request.bearer_auth(self.token.as_str()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiEnvelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(SyncError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => return Err(SyncError::InvalidResponse(e.to_string())),
        };

        if envelope.code != 0 {
            return Err(SyncError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
                body,
            });
        }

        envelope
            .data
            .ok_or_else(|| SyncError::InvalidResponse("response carried no data".to_string()))
    }
}

/// Search filter matching exactly one natural key
fn key_filter(key: &RowKey) -> serde_json::Value {
    json!({
        "filter": {
            "conjunction": "and",
            "conditions": [
                { "field_name": "Repo", "operator": "is", "value": [key.repo] },
                {
                    "field_name": "Date",
                    "operator": "is",
                    "value": ["ExactDate", key.date_millis.to_string()]
                },
                { "field_name": "Source", "operator": "is", "value": [key.source] }
            ]
        }
    })
}

#[async_trait]
impl RecordStore for BitableStore {
    async fn find_record(&self, key: &RowKey) -> SyncResult<Option<String>> {
        let request = self
            .client
            .post(format!("{}/search", self.records_url))
            .query(&[("page_size", "1")])
            .json(&key_filter(key));

        let data: SearchData = self.call(request).await?;
        Ok(data
            .items
            .into_iter()
            .flatten()
            .next()
            .map(|item| item.record_id))
    }

    async fn create_record(&self, row: &TableRow) -> SyncResult<String> {
        let request = self
            .client
            .post(&self.records_url)
            .json(&row.to_record_body());

        let data: RecordEnvelope = self.call(request).await?;
        tracing::debug!(repo = %row.key.repo, record_id = %data.record.record_id, "Row created");
        Ok(data.record.record_id)
    }

    async fn update_record(&self, record_id: &str, row: &TableRow) -> SyncResult<()> {
        let request = self
            .client
            .put(format!("{}/{}", self.records_url, record_id))
            .json(&row.to_record_body());

        let _: RecordEnvelope = self.call(request).await?;
        tracing::debug!(repo = %row.key.repo, record_id, "Row updated");
        Ok(())
    }
}
