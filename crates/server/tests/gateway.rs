//! End-to-end gateway tests: request in, gate decision out, with the
//! backend scripted. Every scenario exercises the full path through the
//! snapshot fetcher, so normalization and fail-closed behavior are covered
//! at the HTTP boundary.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use parking_lot::Mutex;
use serde_json::{json, Value};
use siteward_infra::{
    AuditError, BackendRpc, GateAudit, GateRecord, RpcError, TenantCookieCodec,
};
use siteward_server::{router, AppState, RateLimiter};
use tower::ServiceExt;

const SECRET: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

struct ScriptedRpc {
    snapshot: Result<Value, String>,
    rows: Value,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRpc {
    fn new(snapshot: Result<Value, String>, rows: Value) -> Self {
        Self {
            snapshot,
            rows,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BackendRpc for ScriptedRpc {
    async fn call(
        &self,
        _token: Option<&str>,
        function: &str,
        _params: Value,
    ) -> Result<Value, RpcError> {
        self.calls.lock().push(function.to_string());
        if function == "my_permissions_snapshot" {
            return match &self.snapshot {
                Ok(value) => Ok(value.clone()),
                Err(message) => Err(RpcError::Status {
                    status: 500,
                    body: message.clone(),
                }),
            };
        }
        Ok(self.rows.clone())
    }
}

struct MemoryAudit {
    records: Mutex<Vec<GateRecord>>,
}

impl MemoryAudit {
    fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl GateAudit for MemoryAudit {
    fn record(&self, record: &GateRecord) -> Result<(), AuditError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

fn snapshot_row(role: &str, permissions: &[&str]) -> Value {
    json!([{
        "account_id": "acc-1",
        "role": role,
        "permissions": permissions,
    }])
}

fn account_cookie() -> String {
    let codec = TenantCookieCodec::new(*SECRET);
    let value = codec.encode("acc-1", chrono::Utc::now());
    format!("siteward_account={value}")
}

fn app(rpc: Arc<ScriptedRpc>, audit: Arc<MemoryAudit>) -> axum::Router {
    let state = AppState::new(
        rpc,
        audit,
        Arc::new(TenantCookieCodec::new(*SECRET)),
        Arc::new(RateLimiter::new(1000.0, 1000.0)),
    );
    router(state)
}

fn get(uri: &str, token: Option<&str>, cookie: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_unauthenticated_request_is_401() {
    let rpc = Arc::new(ScriptedRpc::new(Ok(Value::Null), json!([])));
    let audit = Arc::new(MemoryAudit::new());
    let app = app(rpc.clone(), audit);

    let response = app.oneshot(get("/materials", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // Snapshot source was never queried without a token.
    assert!(rpc.calls.lock().is_empty());
}

#[tokio::test]
async fn test_worker_without_read_key_is_403() {
    // Scenario: worker can create daily reports but not read them.
    let rpc = Arc::new(ScriptedRpc::new(
        Ok(snapshot_row("worker", &["daily_reports:create"])),
        json!([]),
    ));
    let audit = Arc::new(MemoryAudit::new());
    let app = app(rpc.clone(), audit.clone());

    let response = app
        .oneshot(get("/daily-reports", Some("tok"), Some(account_cookie())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The privileged read never happened.
    let calls = rpc.calls.lock();
    assert_eq!(calls.as_slice(), ["my_permissions_snapshot"]);
    let records = audit.records.lock();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].role.as_deref(), Some("worker"));
}

#[tokio::test]
async fn test_metrics_reader_reaches_pvr_overview() {
    let rpc = Arc::new(ScriptedRpc::new(
        Ok(snapshot_row("manager", &["metrics:read"])),
        json!([]),
    ));
    let audit = Arc::new(MemoryAudit::new());
    let app = app(rpc.clone(), audit);

    let response = app
        .oneshot(get(
            "/reports/plan-vs-actual",
            Some("tok"),
            Some(account_cookie()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(rpc.calls.lock().contains(&"pvr_summary_overview".to_string()));
}

#[tokio::test]
async fn test_snapshot_source_failure_denies_instead_of_500() {
    let rpc = Arc::new(ScriptedRpc::new(
        Err("connection reset".to_string()),
        json!([]),
    ));
    let audit = Arc::new(MemoryAudit::new());
    let app = app(rpc, audit);

    for uri in ["/materials", "/deliveries", "/team"] {
        let response = app
            .clone()
            .oneshot(get(uri, Some("tok"), Some(account_cookie())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri {uri}");
    }
}

#[tokio::test]
async fn test_tampered_cookie_means_no_tenant() {
    let rpc = Arc::new(ScriptedRpc::new(
        Ok(snapshot_row("owner", &["materials:read"])),
        json!([]),
    ));
    let audit = Arc::new(MemoryAudit::new());
    let app = app(rpc.clone(), audit);

    let response = app
        .oneshot(get(
            "/materials",
            Some("tok"),
            Some("siteward_account=forged.value".to_string()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // Fetch short-circuits before the backend.
    assert!(rpc.calls.lock().is_empty());
}

#[tokio::test]
async fn test_account_select_round_trip() {
    let rpc = Arc::new(ScriptedRpc::new(
        Ok(snapshot_row("storeman", &["materials:read"])),
        json!([]),
    ));
    let audit = Arc::new(MemoryAudit::new());
    let app = app(rpc.clone(), audit);

    // Select the account; the handler answers with the signed cookie.
    let request = Request::builder()
        .method("POST")
        .uri("/account/select")
        .header(header::AUTHORIZATION, "Bearer tok")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"account_id": "acc-1"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    // Replay the cookie on a gated read.
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let response = app
        .oneshot(get("/materials", Some("tok"), Some(cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(rpc.calls.lock().contains(&"materials_list".to_string()));
}

#[tokio::test]
async fn test_account_select_requires_identity() {
    let rpc = Arc::new(ScriptedRpc::new(Ok(Value::Null), json!([])));
    let audit = Arc::new(MemoryAudit::new());
    let app = app(rpc, audit);

    let request = Request::builder()
        .method("POST")
        .uri("/account/select")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"account_id": "acc-1"}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let rpc = Arc::new(ScriptedRpc::new(
        Ok(snapshot_row("owner", &["materials:read"])),
        json!([]),
    ));
    let audit = Arc::new(MemoryAudit::new());
    let state = AppState::new(
        rpc,
        audit,
        Arc::new(TenantCookieCodec::new(*SECRET)),
        Arc::new(RateLimiter::new(0.001, 1.0)),
    );
    let app = router(state);

    let first = app
        .clone()
        .oneshot(get("/materials", Some("tok"), Some(account_cookie())))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(get("/materials", Some("tok"), Some(account_cookie())))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_denial_body_is_opaque() {
    let rpc = Arc::new(ScriptedRpc::new(
        Ok(snapshot_row("worker", &["daily_reports:create"])),
        json!([]),
    ));
    let audit = Arc::new(MemoryAudit::new());
    let app = app(rpc, audit);

    let response = app
        .oneshot(get("/materials", Some("tok"), Some(account_cookie())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, json!({"error": "access_denied"}));
}
