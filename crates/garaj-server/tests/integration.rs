use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use garaj_core::config::Config;
use garaj_core::types::Recipient;
use garaj_server::channel::{ChannelClient, ChannelError};
use garaj_server::state::AppState;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

const OPERATOR: i64 = 555;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Channel that records sends and fails for a fixed set of chat ids.
#[derive(Default)]
struct FakeChannel {
    failing: Vec<i64>,
    sent: Mutex<Vec<(i64, String)>>,
}

impl FakeChannel {
    fn calls(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelClient for FakeChannel {
    async fn send(&self, recipient: Recipient, text: &str) -> Result<(), ChannelError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.id(), text.to_string()));
        if self.failing.contains(&recipient.id()) {
            return Err(ChannelError::Rejected("Forbidden: bot was blocked".into()));
        }
        Ok(())
    }
}

/// Seed a store with active users 1..=3, one blocked user, and one startup.
fn seed_store(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("garajhub.db");
    garaj_core::store::bootstrap(&path).unwrap();
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "INSERT INTO users (user_id, first_name, status) VALUES
            (1, 'a', 'active'), (2, 'b', 'active'), (3, 'c', 'active'), (4, 'd', 'blocked');
         INSERT INTO startups (name, group_link, owner_id, status) VALUES ('s', 'l', 3, 'active');",
    )
    .unwrap();
    path
}

fn config(db: PathBuf, admin_token: Option<&str>) -> Config {
    let mut cfg = Config::default();
    cfg.database = db;
    cfg.operator_chat_id = OPERATOR;
    cfg.pacing.delay_ms = 1;
    cfg.server.admin_token = admin_token.map(str::to_string);
    cfg
}

fn app(cfg: &Config, channel: Arc<FakeChannel>) -> axum::Router {
    garaj_server::build_router(AppState::new(cfg, channel))
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body and optional bearer token.
async fn post_json(
    app: axum::Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = req
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn wait_for_report(channel: &FakeChannel) -> String {
    for _ in 0..500 {
        if let Some((_, text)) = channel.calls().into_iter().find(|(id, _)| *id == OPERATOR) {
            return text;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("delivery report never arrived");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_public() {
    let dir = TempDir::new().unwrap();
    let cfg = config(seed_store(&dir), Some("secret"));
    let (status, json) = get(app(&cfg, Arc::default()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn broadcast_is_accepted_and_reported() {
    let dir = TempDir::new().unwrap();
    let cfg = config(seed_store(&dir), None);
    let channel = Arc::new(FakeChannel {
        failing: vec![2],
        ..Default::default()
    });

    let (status, json) = post_json(
        app(&cfg, channel.clone()),
        "/api/broadcast",
        None,
        serde_json::json!({ "message": "Demo day juma kuni!", "audience": "all" }),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["accepted"], true);
    assert_eq!(json["recipients"], 3);
    assert_eq!(json["audience"], "all");
    assert!(json["job_id"].is_string());

    let report = wait_for_report(&channel).await;
    assert!(report.contains("✅ Yuborildi: 2\n"));
    assert!(report.contains("❌ Yuborilmadi: 1\n"));
    assert!(report.ends_with("📝 Xabar: Demo day juma kuni!"));

    let recipients: Vec<i64> = channel
        .calls()
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| *id != OPERATOR)
        .collect();
    assert_eq!(recipients, vec![1, 2, 3]);
}

#[tokio::test]
async fn dashboard_user_type_field_is_accepted() {
    let dir = TempDir::new().unwrap();
    let cfg = config(seed_store(&dir), None);
    let channel = Arc::new(FakeChannel::default());

    let (status, json) = post_json(
        app(&cfg, channel.clone()),
        "/api/broadcast",
        None,
        serde_json::json!({ "message": "hi owners", "user_type": "startup_owners" }),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["recipients"], 1);
    wait_for_report(&channel).await;
}

#[tokio::test]
async fn unknown_audience_is_rejected_without_any_send() {
    let dir = TempDir::new().unwrap();
    let cfg = config(seed_store(&dir), None);
    let channel = Arc::new(FakeChannel::default());

    let (status, json) = post_json(
        app(&cfg, channel.clone()),
        "/api/broadcast",
        None,
        serde_json::json!({ "message": "hello", "audience": "nonexistent_tag" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("nonexistent_tag"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let dir = TempDir::new().unwrap();
    let cfg = config(seed_store(&dir), None);
    let channel = Arc::new(FakeChannel::default());

    let (status, _json) = post_json(
        app(&cfg, channel.clone()),
        "/api/broadcast",
        None,
        serde_json::json!({ "message": "", "audience": "all" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn missing_store_is_a_server_error() {
    let dir = TempDir::new().unwrap();
    let cfg = config(dir.path().join("absent.db"), None);
    let channel = Arc::new(FakeChannel::default());

    let (status, json) = post_json(
        app(&cfg, channel.clone()),
        "/api/broadcast",
        None,
        serde_json::json!({ "message": "hello", "audience": "all" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].is_string());
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn admin_token_guards_broadcast() {
    let dir = TempDir::new().unwrap();
    let cfg = config(seed_store(&dir), Some("secret"));
    let channel = Arc::new(FakeChannel::default());
    let body = serde_json::json!({ "message": "hello", "audience": "all" });

    let (status, _) = post_json(app(&cfg, channel.clone()), "/api/broadcast", None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(channel.calls().is_empty());

    let (status, _) = post_json(
        app(&cfg, channel.clone()),
        "/api/broadcast",
        Some("secret"),
        body,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    wait_for_report(&channel).await;
}
