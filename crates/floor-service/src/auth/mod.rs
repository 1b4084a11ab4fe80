//! Token validation for floor staff and players.
//!
//! Tokens are HS256 JWTs signed with the shared `FLOOR_TOKEN_SECRET` key.
//! Two roles exist: `staff` (floor personnel, optionally scoped to one
//! venue) and `player` (self-service, `sub` is the player id).

use crate::errors::FloorError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Tokens larger than this are rejected before any parsing.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

pub const ROLE_STAFF: &str = "staff";
pub const ROLE_PLAYER: &str = "player";

/// Validated token claims.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff identifier or player id. Redacted in Debug output.
    pub sub: String,

    /// `staff` or `player`.
    pub role: String,

    /// For staff tokens, the venue this token is scoped to.
    /// None means house-wide staff access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("role", &self.role)
            .field("venue_id", &self.venue_id)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

impl Claims {
    pub fn is_staff(&self) -> bool {
        self.role == ROLE_STAFF
    }

    /// Staff access check for a venue. A staff token without a venue scope
    /// is valid for every venue.
    pub fn is_staff_for(&self, venue_id: Uuid) -> bool {
        self.is_staff()
            && self
                .venue_id
                .as_deref()
                .is_none_or(|scoped| scoped == venue_id.to_string())
    }

    /// The player id carried by a player token, if this is one.
    pub fn player_uuid(&self) -> Option<Uuid> {
        if self.role == ROLE_PLAYER {
            Uuid::parse_str(&self.sub).ok()
        } else {
            None
        }
    }
}

/// Validates bearer tokens against the shared signing key.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Validate a token and return its claims.
    ///
    /// Failure reasons are logged at debug level; callers receive a
    /// generic error.
    pub fn validate(&self, token: &str) -> Result<Claims, FloorError> {
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(
                target: "floor.auth",
                token_size = token.len(),
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(FloorError::InvalidToken(
                "The access token is invalid or expired".to_string(),
            ));
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(target: "floor.auth", error = %e, "Token validation failed");
            FloorError::InvalidToken("The access token is invalid or expired".to_string())
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const TEST_SECRET: &[u8] = &[42u8; 32];

    fn sign(claims: &Claims, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn staff_claims(venue_id: Option<Uuid>) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: "floor-desk-1".to_string(),
            role: ROLE_STAFF.to_string(),
            venue_id: venue_id.map(|v| v.to_string()),
            iat: now,
            exp: now + 3600,
        }
    }

    #[test]
    fn test_validate_accepts_valid_staff_token() {
        let venue = Uuid::new_v4();
        let token = sign(&staff_claims(Some(venue)), TEST_SECRET);

        let validator = TokenValidator::new(TEST_SECRET);
        let claims = validator.validate(&token).expect("Token should validate");

        assert!(claims.is_staff());
        assert!(claims.is_staff_for(venue));
        assert!(!claims.is_staff_for(Uuid::new_v4()));
    }

    #[test]
    fn test_unscoped_staff_token_covers_any_venue() {
        let token = sign(&staff_claims(None), TEST_SECRET);
        let validator = TokenValidator::new(TEST_SECRET);
        let claims = validator.validate(&token).unwrap();

        assert!(claims.is_staff_for(Uuid::new_v4()));
    }

    #[test]
    fn test_validate_rejects_wrong_key() {
        let token = sign(&staff_claims(None), &[1u8; 32]);
        let validator = TokenValidator::new(TEST_SECRET);

        let result = validator.validate(&token);
        assert!(matches!(result, Err(FloorError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "floor-desk-1".to_string(),
            role: ROLE_STAFF.to_string(),
            venue_id: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = sign(&claims, TEST_SECRET);

        let validator = TokenValidator::new(TEST_SECRET);
        assert!(matches!(
            validator.validate(&token),
            Err(FloorError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_token() {
        let validator = TokenValidator::new(TEST_SECRET);
        let oversized = "a".repeat(MAX_TOKEN_SIZE_BYTES + 1);

        assert!(matches!(
            validator.validate(&oversized),
            Err(FloorError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let validator = TokenValidator::new(TEST_SECRET);
        assert!(matches!(
            validator.validate("not-a-jwt"),
            Err(FloorError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_player_uuid() {
        let player = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: player.to_string(),
            role: ROLE_PLAYER.to_string(),
            venue_id: None,
            iat: now,
            exp: now + 3600,
        };

        assert_eq!(claims.player_uuid(), Some(player));
        assert!(!claims.is_staff());
        assert!(!claims.is_staff_for(Uuid::new_v4()));

        // Staff subs are not player ids.
        assert_eq!(staff_claims(None).player_uuid(), None);
    }

    #[test]
    fn test_debug_redacts_sub() {
        let claims = staff_claims(None);
        let debug_str = format!("{claims:?}");

        assert!(!debug_str.contains("floor-desk-1"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
