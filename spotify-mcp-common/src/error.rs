//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` for consistent
//! error handling between the Spotify session, the API client and the server.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration
//! - `AuthError`: Token cache and OAuth failures
//! - `Error::Api`: Spotify Web API errors (includes HTTP status and reason)
//! - `Error::Transport`: Requests that never produced an API response
//! - `Error::Io`: File system operations

use serde::Deserialize;
use thiserror::Error;

/// Unified error type for the common library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Authentication errors (no cached token, OAuth failures)
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Spotify Web API errors with HTTP status context
    #[error("Spotify API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Machine-readable reason, e.g. `NO_ACTIVE_DEVICE`
        reason: Option<String>,
        /// Error message from the API
        message: String,
    },

    /// Request failures that produced no API response
    #[error("Spotify request failed: {0}")]
    Transport(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Spotify's regular error envelope: `{"error": {"status", "message", "reason"}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Accounts-service errors: `{"error": "invalid_grant", "error_description": "..."}`.
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl Error {
    /// Create a new API error with status code, optional reason and message.
    ///
    /// # Example
    ///
    /// ```
    /// use spotify_mcp_common::error::Error;
    ///
    /// let err = Error::api(404, Some("NO_ACTIVE_DEVICE"), "Player command failed");
    /// assert!(err.to_string().contains("404"));
    /// assert_eq!(err.reason(), Some("NO_ACTIVE_DEVICE"));
    /// ```
    pub fn api(status: u16, reason: Option<&str>, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            reason: reason.map(str::to_string),
            message: message.into(),
        }
    }

    /// Build an API error from a raw HTTP status and response body.
    ///
    /// Understands both the Web API envelope and the accounts-service OAuth
    /// error shape; any other body is kept verbatim as the message.
    ///
    /// # Example
    ///
    /// ```
    /// use spotify_mcp_common::error::Error;
    ///
    /// let body = r#"{"error":{"status":404,"message":"Player command failed: No active device found","reason":"NO_ACTIVE_DEVICE"}}"#;
    /// let err = Error::from_response(404, body);
    /// assert_eq!(err.status(), Some(404));
    /// assert_eq!(err.reason(), Some("NO_ACTIVE_DEVICE"));
    /// ```
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
            let message = envelope
                .error
                .message
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Error::Api {
                status,
                reason: envelope.error.reason,
                message,
            };
        }

        if let Ok(oauth) = serde_json::from_str::<OAuthErrorBody>(body) {
            let message = match oauth.error_description {
                Some(description) => format!("{}: {}", oauth.error, description),
                None => oauth.error.clone(),
            };
            return Error::Api {
                status,
                reason: Some(oauth.error),
                message,
            };
        }

        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body.trim().to_string()
        };
        Error::Api {
            status,
            reason: None,
            message,
        }
    }

    /// Create a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport(message.into())
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable reason of an API error, if Spotify sent one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Error::Api { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    /// The message without the HTTP framing added by `Display`.
    pub fn message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            Error::Transport(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Authentication errors.
///
/// These errors occur while bootstrapping the Spotify session from the
/// token cache or the interactive authorization prompt.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable token in the cache
    #[error("No cached Spotify token at {0}. Run 'spotify-mcp login' first")]
    MissingToken(String),

    /// The OAuth client failed (bad authorize URL, prompt aborted, cache unwritable)
    #[error("Spotify OAuth error: {0}")]
    Client(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// The client holds no token, or an expired one it cannot refresh
    #[error("Spotify token is not valid. Run 'spotify-mcp login' again")]
    InvalidToken,
}

impl AuthError {
    /// Create a new OAuth client error.
    pub fn client(message: impl Into<String>) -> Self {
        AuthError::Client(message.into())
    }

    /// Create a new token refresh failed error.
    pub fn refresh_failed(message: impl Into<String>) -> Self {
        AuthError::RefreshFailed(message.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
