use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::infrastructure::paddle::api_base_for_key;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub paddle_client_token: Option<String>,
    pub paddle_api_key: Option<String>,
    pub paddle_api_base: Option<String>,
    pub paddle_timeout: Duration,
    pub session_secret: Option<String>,
    pub admin_initial_password: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value,
            })?,
            None => 8080,
        };
        let timeout_secs: u64 = match get("PADDLE_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: "PADDLE_TIMEOUT_SECS",
                value,
            })?,
            None => 10,
        };

        Ok(Settings {
            database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            paddle_client_token: get("PADDLE_CLIENT_TOKEN"),
            paddle_api_key: get("PADDLE_API_KEY"),
            paddle_api_base: get("PADDLE_API_BASE"),
            paddle_timeout: Duration::from_secs(timeout_secs),
            session_secret: get("SESSION_SECRET"),
            admin_initial_password: get("ADMIN_INITIAL_PASSWORD"),
        })
    }

    /// Processor API base: explicit override, else derived from the key.
    pub fn resolved_paddle_api_base(&self) -> Option<String> {
        let key = self.paddle_api_key.as_deref()?;
        Some(
            self.paddle_api_base
                .clone()
                .unwrap_or_else(|| api_base_for_key(key).to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let s = settings(&[("DATABASE_URL", "postgres://x")]).unwrap();
        assert_eq!(s.host, "0.0.0.0");
        assert_eq!(s.port, 8080);
        assert_eq!(s.paddle_timeout, Duration::from_secs(10));
        assert!(s.paddle_api_key.is_none());
        assert!(s.resolved_paddle_api_base().is_none());
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(
            settings(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn blank_secrets_count_as_unset() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://x"),
            ("PADDLE_API_KEY", "   "),
            ("SESSION_SECRET", ""),
        ])
        .unwrap();
        assert!(s.paddle_api_key.is_none());
        assert!(s.session_secret.is_none());
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = settings(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "PORT must be a valid number, got 'eighty'");
    }

    #[test]
    fn api_base_follows_key_unless_overridden() {
        let s = settings(&[("DATABASE_URL", "d"), ("PADDLE_API_KEY", "test_123")]).unwrap();
        assert_eq!(
            s.resolved_paddle_api_base().as_deref(),
            Some("https://sandbox-api.paddle.com")
        );

        let s = settings(&[
            ("DATABASE_URL", "d"),
            ("PADDLE_API_KEY", "live_123"),
            ("PADDLE_API_BASE", "http://localhost:9999"),
        ])
        .unwrap();
        assert_eq!(
            s.resolved_paddle_api_base().as_deref(),
            Some("http://localhost:9999")
        );
    }
}
