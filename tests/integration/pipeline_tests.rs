//! Integration tests for the relay pipeline
//!
//! These tests use wiremock to stand in for the trending page, the chat
//! webhook and the Bitable API, and run the whole pipeline end-to-end.

use chrono::NaiveDate;
use serde_json::{json, Value};
use trending_relay::config::{BitableConfig, Config, FeishuConfig, Settings};
use trending_relay::pipeline::{preview, run_pipeline, RunStatus, SinkOutcome, SyncOutcome};
use trending_relay::trending::{FetchRequest, Period};
use trending_relay::TrendingError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("../fixtures/trending_daily.html");
const RECORDS: &str = "/open-apis/bitable/v1/apps/bascn1/tables/tbl1/records";

fn snapshot_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 18).expect("valid date")
}

fn test_settings(base_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.endpoints.trending_base_url = format!("{}/trending", base_url);
    settings.endpoints.feishu_base_url = base_url.to_string();
    settings.http.timeout_secs = 5;
    settings
}

/// Creates a config whose every endpoint points at the mock server
fn create_test_config(base_url: &str, limit: usize, with_bitable: bool) -> Config {
    let bitable = with_bitable.then(|| BitableConfig {
        app_id: "cli_test".to_string(),
        app_secret: "secret".to_string(),
        app_token: "bascn1".to_string(),
        table_id: "tbl1".to_string(),
    });

    Config {
        request: FetchRequest::new(None, Period::Daily, limit),
        settings: test_settings(base_url),
        feishu: FeishuConfig {
            webhook_url: format!("{}/hook", base_url),
            bitable,
        },
    }
}

async fn mount_trending(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/trending"))
        .and(query_param("since", "daily"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_webhook(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!({ "code": 0, "msg": "success" })),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/open-apis/auth/v3/tenant_access_token/internal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "ok",
            "tenant_access_token": "t-test",
            "expire": 7200
        })))
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, existing_record: Option<&str>) {
    let items: Vec<Value> = existing_record
        .map(|id| vec![json!({ "record_id": id, "fields": {} })])
        .unwrap_or_default();

    Mock::given(method("POST"))
        .and(path(format!("{}/search", RECORDS)))
        .and(header("authorization", "Bearer t-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "success",
            "data": { "items": items, "has_more": false, "total": items.len() }
        })))
        .mount(server)
        .await;
}

fn record_reply(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "msg": "success",
        "data": { "record": { "record_id": id, "fields": {} } }
    }))
}

async fn mount_create(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(RECORDS))
        .respond_with(record_reply("recNew"))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Bodies of all requests received on a path, decoded as JSON
async fn bodies_for(server: &MockServer, wanted: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .filter(|r| r.url.path() == wanted)
        .map(|r| serde_json::from_slice(&r.body).expect("JSON body"))
        .collect()
}

#[tokio::test]
async fn test_full_run_delivers_card_and_rows() {
    let server = MockServer::start().await;
    mount_trending(&server, ResponseTemplate::new(200).set_body_string(FIXTURE)).await;
    mount_webhook(&server, 200, 1).await;
    mount_token(&server).await;
    mount_search(&server, None).await;
    mount_create(&server, 3).await;

    let config = create_test_config(&server.uri(), 2, true);
    let report = run_pipeline(&config, snapshot_date())
        .await
        .expect("pipeline should succeed");

    assert_eq!(report.status(), RunStatus::Success);
    assert_eq!(report.extracted, 3);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.notify, SinkOutcome::Delivered);
    match &report.sync {
        SyncOutcome::Synced(sync) => {
            assert_eq!(sync.created, 3);
            assert_eq!(sync.updated, 0);
        }
        other => panic!("expected a sync report, got {:?}", other),
    }

    // Card holds exactly ranks 1 and 2
    let cards = bodies_for(&server, "/hook").await;
    assert_eq!(cards.len(), 1);
    let card_text = cards[0].to_string();
    assert!(card_text.contains("octo/alpha"));
    assert!(card_text.contains("beta-labs/beta"));
    assert!(!card_text.contains("gamma-org/gamma"));

    // Table receives all three rows
    let rows = bodies_for(&server, RECORDS).await;
    let repos: Vec<&str> = rows
        .iter()
        .filter_map(|r| r["fields"]["Repo"].as_str())
        .collect();
    assert_eq!(repos, vec!["octo/alpha", "beta-labs/beta", "gamma-org/gamma"]);
    assert_eq!(rows[0]["fields"]["Stars"], 1200);
    assert_eq!(rows[0]["fields"]["TodayStars"], 120);
    assert_eq!(rows[0]["fields"]["Source"], "github-trending:daily:2025-10-18:all");
}

#[tokio::test]
async fn test_webhook_failure_still_syncs_full_set() {
    let server = MockServer::start().await;
    mount_trending(&server, ResponseTemplate::new(200).set_body_string(FIXTURE)).await;
    mount_webhook(&server, 500, 1).await;
    mount_token(&server).await;
    mount_search(&server, None).await;
    mount_create(&server, 3).await;

    let config = create_test_config(&server.uri(), 2, true);
    let report = run_pipeline(&config, snapshot_date())
        .await
        .expect("webhook failure is not fatal");

    assert_eq!(report.status(), RunStatus::Partial);
    assert!(matches!(report.notify, SinkOutcome::Failed(_)));
    assert!(matches!(&report.sync, SyncOutcome::Synced(sync) if sync.created == 3));
}

#[tokio::test]
async fn test_rerun_same_day_updates_instead_of_creating() {
    let server = MockServer::start().await;
    mount_trending(&server, ResponseTemplate::new(200).set_body_string(FIXTURE)).await;
    mount_webhook(&server, 200, 1).await;
    mount_token(&server).await;
    mount_search(&server, Some("recExisting")).await;
    mount_create(&server, 0).await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/recExisting", RECORDS)))
        .respond_with(record_reply("recExisting"))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), 10, true);
    let report = run_pipeline(&config, snapshot_date()).await.expect("run");

    assert_eq!(report.status(), RunStatus::Success);
    assert!(matches!(
        &report.sync,
        SyncOutcome::Synced(sync) if sync.updated == 3 && sync.created == 0
    ));
}

#[tokio::test]
async fn test_row_rejection_is_partial() {
    let server = MockServer::start().await;
    mount_trending(&server, ResponseTemplate::new(200).set_body_string(FIXTURE)).await;
    mount_webhook(&server, 200, 1).await;
    mount_token(&server).await;
    mount_search(&server, None).await;

    Mock::given(method("POST"))
        .and(path(RECORDS))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 1254045,
            "msg": "FieldNameNotFound"
        })))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), 10, true);
    let report = run_pipeline(&config, snapshot_date()).await.expect("run");

    assert_eq!(report.status(), RunStatus::Partial);
    assert_eq!(report.notify, SinkOutcome::Delivered);
    assert!(matches!(&report.sync, SyncOutcome::Synced(sync) if sync.failures.len() == 3));
}

#[tokio::test]
async fn test_token_failure_degrades_to_partial() {
    let server = MockServer::start().await;
    mount_trending(&server, ResponseTemplate::new(200).set_body_string(FIXTURE)).await;
    mount_webhook(&server, 200, 1).await;

    Mock::given(method("POST"))
        .and(path("/open-apis/auth/v3/tenant_access_token/internal"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 10014, "msg": "app secret invalid" })),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), 10, true);
    let report = run_pipeline(&config, snapshot_date()).await.expect("run");

    assert_eq!(report.status(), RunStatus::Partial);
    assert_eq!(report.notify, SinkOutcome::Delivered);
    assert!(matches!(report.sync, SyncOutcome::Failed(_)));
}

#[tokio::test]
async fn test_unconfigured_table_is_skipped() {
    let server = MockServer::start().await;
    mount_trending(&server, ResponseTemplate::new(200).set_body_string(FIXTURE)).await;
    mount_webhook(&server, 200, 1).await;

    let config = create_test_config(&server.uri(), 10, false);
    let report = run_pipeline(&config, snapshot_date()).await.expect("run");

    assert_eq!(report.status(), RunStatus::Success);
    assert_eq!(report.delivered, 3);
    assert!(matches!(report.sync, SyncOutcome::Skipped(_)));
}

#[tokio::test]
async fn test_fetch_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_trending(&server, ResponseTemplate::new(502)).await;
    mount_webhook(&server, 200, 0).await;

    let config = create_test_config(&server.uri(), 10, true);
    let result = run_pipeline(&config, snapshot_date()).await;

    assert!(matches!(result, Err(TrendingError::Fetch(_))));
}

#[tokio::test]
async fn test_markup_change_is_fatal_and_distinct() {
    let server = MockServer::start().await;
    mount_trending(
        &server,
        ResponseTemplate::new(200)
            .set_body_string("<html><body><main>new layout</main></body></html>"),
    )
    .await;
    mount_webhook(&server, 200, 0).await;

    let config = create_test_config(&server.uri(), 10, true);
    let result = run_pipeline(&config, snapshot_date()).await;

    assert!(matches!(result, Err(TrendingError::Extract(_))));
}

#[tokio::test]
async fn test_empty_leaderboard_delivers_nothing() {
    let server = MockServer::start().await;
    mount_trending(
        &server,
        ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <div class="blankslate"><h3>No trending repositories.</h3></div>
            </body></html>"#,
        ),
    )
    .await;
    mount_webhook(&server, 200, 0).await;

    let config = create_test_config(&server.uri(), 10, true);
    let report = run_pipeline(&config, snapshot_date()).await.expect("run");

    assert_eq!(report.extracted, 0);
    assert_eq!(report.status(), RunStatus::Success);
}

#[tokio::test]
async fn test_preview_renders_without_delivering() {
    let server = MockServer::start().await;
    mount_trending(&server, ResponseTemplate::new(200).set_body_string(FIXTURE)).await;
    mount_webhook(&server, 200, 0).await;

    let request = FetchRequest::new(None, Period::Daily, 2);
    let preview = preview(&request, &test_settings(&server.uri()), snapshot_date())
        .await
        .expect("preview");

    assert_eq!(preview.leaderboard.len(), 3);
    assert_eq!(preview.card.lines.len(), 2);
    assert_eq!(preview.rows.len(), 3);
    assert_eq!(preview.rows[2].key.repo, "gamma-org/gamma");
}
