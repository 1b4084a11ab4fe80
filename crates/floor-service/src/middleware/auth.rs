//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, validates it
//! against the shared signing key, and injects `Claims` into request
//! extensions for downstream handlers. Role and venue scoping are checked
//! per handler, not here.

use crate::auth::{Claims, TokenValidator};
use crate::errors::FloorError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<TokenValidator>,
}

/// Extract Bearer token from the Authorization header.
fn extract_bearer_token(req: &Request) -> Result<&str, FloorError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "floor.middleware.auth", "Missing Authorization header");
            FloorError::InvalidToken("Missing Authorization header".to_string())
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(target: "floor.middleware.auth", "Invalid Authorization header format");
        FloorError::InvalidToken("Invalid Authorization header format".to_string())
    })
}

/// Authentication middleware.
///
/// # Response
///
/// - Returns 401 Unauthorized if the token is missing or invalid
/// - Continues to the next handler with `Claims` in extensions otherwise
#[instrument(skip_all, name = "floor.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, FloorError> {
    let token = extract_bearer_token(&req)?;

    let claims = state.validator.validate(token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extension trait for extracting claims from a request.
pub trait ClaimsExt {
    /// Get the authenticated claims from request extensions.
    ///
    /// Returns `None` if auth middleware was not applied to this request.
    fn claims(&self) -> Option<&Claims>;
}

impl<B> ClaimsExt for axum::extract::Request<B> {
    fn claims(&self) -> Option<&Claims> {
        self.extensions().get::<Claims>()
    }
}
