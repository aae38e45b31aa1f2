use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use quire::CacheClient;
use serde_json::{json, Value};
use server_http::{build_router, AppState};
use shared::config::HttpConfig;
use std::sync::Arc;
use std::time::Duration;
use storage_engine::{MemoryTodoStore, MokaCache, MokaConnector};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<MemoryTodoStore>,
    connector: Arc<MokaConnector>,
}

impl TestApp {
    async fn new() -> Self {
        let connector = Arc::new(MokaConnector::new(MokaCache::new_unbounded()));
        let cache = Arc::new(CacheClient::new(
            "redis",
            connector.clone(),
            Duration::from_secs(1),
        ));
        cache.connect().await.unwrap();
        Self::build(cache, connector)
    }

    fn without_cache() -> Self {
        let connector = Arc::new(MokaConnector::new(MokaCache::new_unbounded()));
        Self::build(Arc::new(CacheClient::disabled("redis")), connector)
    }

    fn build(cache: Arc<CacheClient>, connector: Arc<MokaConnector>) -> Self {
        let store = Arc::new(MemoryTodoStore::new());
        let state = AppState::new(store.clone(), cache);
        let config = HttpConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origins: vec!["*".to_string()],
        };
        Self {
            router: build_router(state, &config),
            store,
            connector,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn json(&self, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

// --- todos ---

#[tokio::test]
async fn todo_lifecycle_scenario() {
    let app = TestApp::new().await;

    let (status, created) = app.json("POST", "/todos", r#"{"title":"buy milk"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["title"], "buy milk");
    assert_eq!(created["completed"], false);
    assert!(created["created_at"].is_string());

    let (status, updated) = app
        .json("PUT", "/todos/1", r#"{"title":"buy milk","completed":true}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, body) = app.delete("/todos/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = app.get("/todos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_returns_newest_first() {
    let app = TestApp::new().await;

    for title in ["first", "second", "third"] {
        let (status, _) = app
            .json("POST", "/todos", &json!({ "title": title }).to_string())
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.get("/todos").await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn create_honours_completed_flag() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json("POST", "/todos", r#"{"title":"done already","completed":true}"#)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["completed"], true);
}

#[tokio::test]
async fn invalid_create_never_reaches_the_store() {
    let app = TestApp::new().await;

    let cases = [
        (r#"{}"#, Some("title")),
        (r#"{"title":""}"#, Some("title")),
        (r#"{"title":"   "}"#, Some("title")),
        (r#"{"title":42}"#, None),
        (r#"{"title":"x","completed":"yes"}"#, None),
        (r#"not json"#, None),
    ];

    for (body, field) in cases {
        let (status, response) = app.json("POST", "/todos", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert!(response["error"].is_string(), "body: {}", body);
        match field {
            Some(field) => assert_eq!(response["field"], field),
            None => assert!(response.get("field").is_none()),
        }
    }

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn update_requires_both_fields() {
    let app = TestApp::new().await;
    app.json("POST", "/todos", r#"{"title":"a"}"#).await;

    let (status, body) = app.json("PUT", "/todos/1", r#"{"title":"a"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "completed");

    let (status, body) = app.json("PUT", "/todos/1", r#"{"completed":true}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "title");

    let (_, list) = app.get("/todos").await;
    assert_eq!(list[0]["completed"], false);
}

#[tokio::test]
async fn update_is_idempotent_on_value() {
    let app = TestApp::new().await;
    app.json("POST", "/todos", r#"{"title":"a"}"#).await;

    let body = r#"{"title":"b","completed":true}"#;
    let (_, first) = app.json("PUT", "/todos/1", body).await;
    let (_, second) = app.json("PUT", "/todos/1", body).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn update_of_missing_todo_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json("PUT", "/todos/99", r#"{"title":"x","completed":false}"#)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "todo 99 not found");
}

#[tokio::test]
async fn delete_of_missing_todo_succeeds() {
    let app = TestApp::new().await;

    let (status, body) = app.delete("/todos/12345").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn invalid_path_id_is_rejected() {
    let app = TestApp::new().await;

    for uri in ["/todos/abc", "/todos/0", "/todos/-1"] {
        let (status, body) = app.delete(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {}", uri);
        assert_eq!(body["field"], "id");
    }
}

#[tokio::test]
async fn storage_outage_is_503_without_detail() {
    let app = TestApp::new().await;
    app.store.set_available(false);

    let (status, body) = app.get("/todos").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"error": "database unavailable"}));

    let (status, _) = app.json("POST", "/todos", r#"{"title":"a"}"#).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    app.store.set_available(true);
    let (status, _) = app.json("POST", "/todos", r#"{"title":"a"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
}

// --- cache ---

#[tokio::test]
async fn cache_probe_reports_connected() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/redis/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "connected", "ping": "PONG"}));
}

#[tokio::test]
async fn cache_set_get_delete() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json("POST", "/redis", r#"{"key":"greeting","value":"hello"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = app.get("/redis/greeting").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"key": "greeting", "value": "hello"}));

    let (status, body) = app.delete("/redis/greeting").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, body) = app.get("/redis/greeting").await;
    assert_eq!(body, json!({"key": "greeting", "value": null}));

    // Deleting again is still a success
    let (status, _) = app.delete("/redis/greeting").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn cache_get_of_unset_key_is_null() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/redis/nothing-here").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], Value::Null);
}

#[tokio::test]
async fn cache_set_with_ttl_is_queryable() {
    let app = TestApp::new().await;

    app.json("POST", "/redis", r#"{"key":"session","value":"v","ttl":30}"#)
        .await;

    let (_, body) = app.get("/redis/session").await;
    assert_eq!(body["value"], "v");

    let (status, body) = app.get("/redis/session/ttl").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], true);
    let ttl = body["ttl"].as_u64().unwrap();
    assert!(ttl > 0 && ttl <= 30);
}

#[tokio::test]
async fn cache_ttl_of_persistent_and_missing_keys() {
    let app = TestApp::new().await;
    app.json("POST", "/redis", r#"{"key":"k","value":"v"}"#).await;

    let (_, body) = app.get("/redis/k/ttl").await;
    assert_eq!(body, json!({"key": "k", "exists": true, "ttl": null}));

    let (_, body) = app.get("/redis/missing/ttl").await;
    assert_eq!(body, json!({"key": "missing", "exists": false, "ttl": null}));
}

#[tokio::test]
async fn cache_expire_reports_whether_key_existed() {
    let app = TestApp::new().await;
    app.json("POST", "/redis", r#"{"key":"k","value":"v"}"#).await;

    let (status, body) = app.json("POST", "/redis/k/expire", r#"{"ttl":10}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, body) = app.get("/redis/k/ttl").await;
    assert!(body["ttl"].as_u64().unwrap() <= 10);

    let (_, body) = app
        .json("POST", "/redis/missing/expire", r#"{"ttl":10}"#)
        .await;
    assert_eq!(body, json!({"success": false}));
}

#[tokio::test]
async fn cache_rejects_invalid_input() {
    let app = TestApp::new().await;

    let cases = [
        (r#"{"value":"v"}"#, "key"),
        (r#"{"key":"","value":"v"}"#, "key"),
        (r#"{"key":"k"}"#, "value"),
        (r#"{"key":"k","value":"v","ttl":0}"#, "ttl"),
        (r#"{"key":"k","value":"v","ttl":-1}"#, "ttl"),
        (r#"{"key":"k","value":"v","ttl":2147483648}"#, "ttl"),
        (r#"{"key":"k","value":"v","ttl":9223372036854775807}"#, "ttl"),
    ];
    for (body, field) in cases {
        let (status, response) = app.json("POST", "/redis", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response["field"], field, "body: {}", body);
    }

    let (status, _) = app.json("POST", "/redis/k/expire", r#"{}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .json("POST", "/redis/k/expire", r#"{"ttl":9223372036854775807}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "ttl");

    let (_, body) = app.get("/redis/k").await;
    assert_eq!(body["value"], Value::Null);
}

#[tokio::test]
async fn disabled_cache_fails_explicitly() {
    let app = TestApp::without_cache();

    let (status, body) = app.get("/redis/test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "disconnected"}));

    let (status, body) = app.get("/redis/k").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"error": "cache not connected"}));

    let (status, _) = app.json("POST", "/redis", r#"{"key":"k","value":"v"}"#).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.delete("/redis/k").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = app.get("/redis/k/ttl").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Todo routes are unaffected
    let (status, _) = app.json("POST", "/todos", r#"{"title":"a"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn dropped_cache_connection_degrades() {
    let app = TestApp::new().await;
    app.connector.cache().set_online(false);

    let (status, body) = app.get("/redis/k").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "cache not connected");

    let (_, body) = app.get("/redis/test").await;
    assert_eq!(body["status"], "disconnected");

    let (_, body) = app.get("/health").await;
    assert_eq!(body["redis"], "disconnected");
}

// --- health ---

#[tokio::test]
async fn health_ok() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["redis"], "connected");
    assert!(body["postgres_time"].is_string());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn health_reports_backends_independently() {
    let app = TestApp::new().await;
    app.store.set_available(false);

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["database"], "disconnected");
    assert_eq!(body["redis"], "connected");
    assert!(body["error"].is_string());
    assert!(body.get("postgres_time").is_none());
}

#[tokio::test]
async fn health_with_cache_disabled() {
    let app = TestApp::without_cache();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["redis"], "disconnected");
}
