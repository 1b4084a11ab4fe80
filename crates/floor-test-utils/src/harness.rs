//! Router harness for integration tests.
//!
//! Builds the real router over the in-memory store and mock notifier so
//! tests drive it with `tower::ServiceExt::oneshot`. The Prometheus
//! recorder is built unattached (not installed globally), so any number
//! of harnesses can coexist in one test binary.

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use floor_service::config::Config;
use floor_service::routes::{build_routes, AppState};
use floor_service::services::notifier::mock::MockNotifier;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use uuid::Uuid;

use crate::memory_store::InMemoryFloorStore;
use crate::tokens::{self, TEST_TOKEN_SECRET};

/// A floor service wired to in-memory collaborators.
pub struct TestApp {
    pub store: Arc<InMemoryFloorStore>,
    pub notifier: Arc<MockNotifier>,
    pub config: Config,
    router: Router,
}

impl TestApp {
    /// Build with default configuration (15 minute wait rate, 3 passes).
    pub fn new() -> Self {
        Self::with_notifier(MockNotifier::succeeding())
    }

    pub fn with_notifier(notifier: MockNotifier) -> Self {
        let store = Arc::new(InMemoryFloorStore::new());
        let notifier = Arc::new(notifier);

        let config = Config {
            database_url: "postgresql://unused".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
            token_secret: TEST_TOKEN_SECRET.to_vec(),
            wait_per_position_minutes: 15,
            max_passes: 3,
        };

        let state = Arc::new(AppState {
            store: store.clone(),
            notifier: notifier.clone(),
            config: config.clone(),
        });

        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();
        let router = build_routes(state, metrics_handle);

        Self {
            store,
            notifier,
            config,
            router,
        }
    }

    /// A clone of the router, ready for `oneshot`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn staff_token(&self, venue_id: Option<Uuid>) -> String {
        tokens::staff_token(&self.config.token_secret, venue_id)
    }

    pub fn player_token(&self, player_id: Uuid) -> String {
        tokens::player_token(&self.config.token_secret, player_id)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a JSON request with an optional bearer token.
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };

    builder.body(body).expect("request builder should succeed")
}

/// Read a response body as JSON.
pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
