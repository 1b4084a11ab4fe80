use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default estimated wait per queue position, in minutes.
///
/// Venues may override this with `venues.wait_per_position_minutes`.
pub const DEFAULT_WAIT_PER_POSITION_MINUTES: i32 = 15;

/// Default number of tolerated calls before a pass removes the entry.
pub const DEFAULT_MAX_PASSES: i32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// HS256 key for staff/player tokens (32 bytes, base64 in env).
    pub token_secret: Vec<u8>,
    /// Service-wide fallback for `estimated_wait_minutes = position * rate`.
    pub wait_per_position_minutes: i32,
    /// Pass budget: calls tolerated before a pass removes the entry.
    pub max_passes: i32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid token secret: {0}")]
    InvalidTokenSecret(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8084".to_string());

        let token_secret_base64 = vars
            .get("FLOOR_TOKEN_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("FLOOR_TOKEN_SECRET".to_string()))?;

        let token_secret = general_purpose::STANDARD
            .decode(token_secret_base64)
            .map_err(ConfigError::Base64Error)?;

        if token_secret.len() != 32 {
            return Err(ConfigError::InvalidTokenSecret(format!(
                "Expected 32 bytes, got {}",
                token_secret.len()
            )));
        }

        let wait_per_position_minutes = parse_positive_i32(
            vars,
            "DEFAULT_WAIT_PER_POSITION_MINUTES",
            DEFAULT_WAIT_PER_POSITION_MINUTES,
        )?;

        let max_passes = parse_positive_i32(vars, "MAX_PASSES", DEFAULT_MAX_PASSES)?;

        Ok(Config {
            database_url,
            bind_address,
            token_secret,
            wait_per_position_minutes,
            max_passes,
        })
    }
}

fn parse_positive_i32(
    vars: &HashMap<String, String>,
    key: &'static str,
    default: i32,
) -> Result<i32, ConfigError> {
    match vars.get(key) {
        None => Ok(default),
        Some(raw) => {
            let value: i32 = raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))?;
            if value < 1 {
                return Err(ConfigError::InvalidValue(key, raw.clone()));
            }
            Ok(value)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_secret_base64() -> String {
        general_purpose::STANDARD.encode([7u8; 32])
    }

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://localhost/floor".to_string(),
            ),
            ("FLOOR_TOKEN_SECRET".to_string(), test_secret_base64()),
        ])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load");

        assert_eq!(config.database_url, "postgresql://localhost/floor");
        assert_eq!(config.bind_address, "0.0.0.0:8084");
        assert_eq!(config.token_secret.len(), 32);
        assert_eq!(config.wait_per_position_minutes, 15);
        assert_eq!(config.max_passes, 3);
    }

    #[test]
    fn test_from_vars_missing_database_url() {
        let vars = HashMap::from([("FLOOR_TOKEN_SECRET".to_string(), test_secret_base64())]);

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "DATABASE_URL"));
    }

    #[test]
    fn test_from_vars_missing_token_secret() {
        let vars = HashMap::from([(
            "DATABASE_URL".to_string(),
            "postgresql://localhost/floor".to_string(),
        )]);

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "FLOOR_TOKEN_SECRET"));
    }

    #[test]
    fn test_from_vars_invalid_base64_secret() {
        let mut vars = base_vars();
        vars.insert(
            "FLOOR_TOKEN_SECRET".to_string(),
            "not-valid-base64!@#$".to_string(),
        );

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::Base64Error(_))));
    }

    #[test]
    fn test_from_vars_secret_wrong_length() {
        let mut vars = base_vars();
        vars.insert(
            "FLOOR_TOKEN_SECRET".to_string(),
            general_purpose::STANDARD.encode([0u8; 16]),
        );

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidTokenSecret(msg)) if msg.contains("got 16"))
        );
    }

    #[test]
    fn test_from_vars_custom_wait_rate() {
        let mut vars = base_vars();
        vars.insert(
            "DEFAULT_WAIT_PER_POSITION_MINUTES".to_string(),
            "20".to_string(),
        );

        let config = Config::from_vars(&vars).expect("Config should load");
        assert_eq!(config.wait_per_position_minutes, 20);
    }

    #[test]
    fn test_from_vars_rejects_zero_max_passes() {
        let mut vars = base_vars();
        vars.insert("MAX_PASSES".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("MAX_PASSES", _))
        ));
    }

    #[test]
    fn test_from_vars_rejects_garbage_max_passes() {
        let mut vars = base_vars();
        vars.insert("MAX_PASSES".to_string(), "plenty".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("MAX_PASSES", _))
        ));
    }

    #[test]
    fn test_from_vars_custom_bind_address() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());

        let config = Config::from_vars(&vars).expect("Config should load");
        assert_eq!(config.bind_address, "127.0.0.1:9000");
    }
}
