//! Configuration module for loading environment variables and settings.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Default location of the rspotify token cache.
pub const DEFAULT_TOKEN_CACHE: &str = ".spotify_token_cache.json";

/// Application configuration loaded from environment variables.
///
/// The HTTP bind address and port are not part of this: they belong to the
/// command line (`TransportArgs`, which also reads `HOST` and `PORT`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Spotify application client ID (required)
    pub client_id: String,
    /// Spotify application client secret (required)
    pub client_secret: String,
    /// Redirect URI registered for the authorization-code flow (required)
    pub redirect_uri: String,
    /// Where rspotify caches the OAuth token
    pub token_cache_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if CLIENT_ID, CLIENT_SECRET or
    /// REDIRECT_URI is not set, and `ConfigError::InvalidValue` if one of them
    /// is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::missing_env_var(name))
        };

        let client_id = required("CLIENT_ID")?;
        let client_secret = required("CLIENT_SECRET")?;
        let redirect_uri = required("REDIRECT_URI")?;

        if !(redirect_uri.starts_with("http://") || redirect_uri.starts_with("https://")) {
            return Err(ConfigError::invalid_value(
                "REDIRECT_URI",
                format!("expected an http:// or https:// URL, got '{}'", redirect_uri),
            ));
        }

        let token_cache_path = lookup("SPOTIFY_TOKEN_CACHE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_CACHE));

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            token_cache_path,
        })
    }
}
