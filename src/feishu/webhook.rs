//! Chat webhook delivery
//!
//! Posts a rendered card to a Feishu custom-bot webhook. A 2xx reply can still
//! carry a non-zero `code`, which is treated as a rejection.

use crate::feishu::card::CardPayload;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while posting a card to the chat webhook
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Webhook rejected the card (code {code}): {msg}")]
    Rejected { code: i64, msg: String },

    #[error("Invalid webhook response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct WebhookReply {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
}

/// Posts the card as an `interactive` message
///
/// Both a non-success HTTP status and a non-zero `code` in the reply count as
/// a failed delivery.
pub async fn send_card(
    client: &Client,
    webhook_url: &str,
    card: &CardPayload,
) -> Result<(), DeliveryError> {
    tracing::debug!(lines = card.lines.len(), "Posting card to webhook");

    let response = client
        .post(webhook_url)
        .json(&card.to_message())
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let reply: WebhookReply =
        serde_json::from_str(&body).map_err(|e| DeliveryError::InvalidResponse(e.to_string()))?;

    if reply.code != 0 {
        return Err(DeliveryError::Rejected {
            code: reply.code,
            msg: reply.msg,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CardSettings;
    use crate::feishu::format_card;
    use crate::trending::{FetchRequest, Period};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn card() -> CardPayload {
        format_card(
            &FetchRequest::new(None, Period::Daily, 10),
            &[],
            &CardSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_send_card_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(serde_json::json!({ "msg_type": "interactive" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "code": 0, "msg": "success", "data": {} })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        let result = send_card(&Client::new(), &url, &card()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_card_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        let result = send_card(&Client::new(), &url, &card()).await;
        assert!(matches!(result, Err(DeliveryError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_send_card_rejected_by_bot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "code": 19021, "msg": "sign match fail" })),
            )
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        match send_card(&Client::new(), &url, &card()).await {
            Err(DeliveryError::Rejected { code, msg }) => {
                assert_eq!(code, 19021);
                assert_eq!(msg, "sign match fail");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_card_invalid_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        let result = send_card(&Client::new(), &url, &card()).await;
        assert!(matches!(result, Err(DeliveryError::InvalidResponse(_))));
    }
}
