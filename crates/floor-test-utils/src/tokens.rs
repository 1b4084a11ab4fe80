//! Token signing helpers for tests.

use floor_service::auth::{Claims, ROLE_PLAYER, ROLE_STAFF};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

/// Signing key used by the test harness (matches `TestApp`).
pub const TEST_TOKEN_SECRET: [u8; 32] = [7u8; 32];

fn sign(claims: &Claims, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("token signing should succeed")
}

/// Sign a staff token, optionally scoped to one venue.
pub fn staff_token(secret: &[u8], venue_id: Option<Uuid>) -> String {
    let now = chrono::Utc::now().timestamp();
    sign(
        &Claims {
            sub: "test-floor-desk".to_string(),
            role: ROLE_STAFF.to_string(),
            venue_id: venue_id.map(|v| v.to_string()),
            iat: now,
            exp: now + 3600,
        },
        secret,
    )
}

/// Sign a player token.
pub fn player_token(secret: &[u8], player_id: Uuid) -> String {
    let now = chrono::Utc::now().timestamp();
    sign(
        &Claims {
            sub: player_id.to_string(),
            role: ROLE_PLAYER.to_string(),
            venue_id: None,
            iat: now,
            exp: now + 3600,
        },
        secret,
    )
}

/// Sign an already-expired staff token.
pub fn expired_staff_token(secret: &[u8]) -> String {
    let now = chrono::Utc::now().timestamp();
    sign(
        &Claims {
            sub: "test-floor-desk".to_string(),
            role: ROLE_STAFF.to_string(),
            venue_id: None,
            iat: now - 7200,
            exp: now - 3600,
        },
        secret,
    )
}
