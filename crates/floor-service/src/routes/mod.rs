//! HTTP routes for the floor service.
//!
//! Defines the Axum router and application state.

use crate::auth::TokenValidator;
use crate::config::Config;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_auth, AuthState};
use crate::services::notifier::Notifier;
use crate::store::FloorStore;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend.
    pub store: Arc<dyn FloorStore>,

    /// Notification transport.
    pub notifier: Arc<dyn Notifier>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health`, `/ready`, `/metrics` - public, unversioned operational endpoints
/// - `POST /api/v1/waitlist` - join (player or staff)
/// - `GET /api/v1/venues/{venue_id}/waitlist` - venue queue (staff)
/// - `POST /api/v1/waitlist/{id}/call` - call a player (staff)
/// - `POST /api/v1/waitlist/{id}/pass` - decline a call (player or staff)
/// - `POST /api/v1/waitlist/{id}/seat` - seat a player (staff)
/// - `POST /api/v1/squads/{id}/submit` - queue a squad (leader)
/// - `GET /api/v1/venues/{venue_id}/balance` - balance advice (staff)
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let validator = Arc::new(TokenValidator::new(&state.config.token_secret));
    let auth_state = Arc::new(AuthState { validator });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::health::metrics_handler))
        .with_state(metrics_handle);

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/api/v1/waitlist", post(handlers::waitlist::join_waitlist))
        .route(
            "/api/v1/venues/:venue_id/waitlist",
            get(handlers::waitlist::venue_waitlist),
        )
        .route(
            "/api/v1/waitlist/:id/call",
            post(handlers::waitlist::call_player),
        )
        .route(
            "/api/v1/waitlist/:id/pass",
            post(handlers::waitlist::pass_player),
        )
        .route(
            "/api/v1/waitlist/:id/seat",
            post(handlers::seating::seat_player),
        )
        .route(
            "/api/v1/squads/:id/submit",
            post(handlers::squads::submit_squad),
        )
        .route(
            "/api/v1/venues/:venue_id/balance",
            get(handlers::balance::suggest_balance),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ))
        .with_state(state);

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
