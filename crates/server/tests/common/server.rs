//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use liftsheet_core::config::AppConfig;
use liftsheet_server::bootstrap::ensure_tables;
use liftsheet_server::{AppState, create_router};
use liftsheet_storage::{MemoryBackend, SheetStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// A test server over an in-memory spreadsheet.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with the catalog tables provisioned.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = AppConfig::for_testing();
        modifier(&mut config);
        Self::with_store(config, Arc::new(MemoryBackend::new("liftsheet-test"))).await
    }

    /// Create a test server over a caller-supplied store.
    pub async fn with_store(config: AppConfig, store: Arc<dyn SheetStore>) -> Self {
        let state = AppState::new(config, store);
        ensure_tables(&state)
            .await
            .expect("Failed to provision catalog tables");
        let router = create_router(state.clone());
        Self { router, state }
    }

    /// Get access to the underlying store.
    pub fn store(&self) -> Arc<dyn SheetStore> {
        self.state.store.clone()
    }

    /// Create an exercise and return its id.
    pub async fn create_exercise(&self, name: &str) -> String {
        let (status, body) = json_request(
            &self.router,
            "POST",
            "/api/exercises",
            Some(serde_json::json!({
                "name": name,
                "description": "",
                "muscleGroup": "chest"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "create exercise failed: {body}");
        body["id"].as_str().expect("id missing").to_string()
    }
}

/// Helper to make JSON requests.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    send(router, request).await
}

/// Send a prebuilt request and decode the JSON response body.
#[allow(dead_code)]
pub async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
