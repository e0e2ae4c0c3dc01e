//! Error taxonomy and formatting for tool results.
//!
//! Tool failures are reported as data, never as MCP protocol errors: a result
//! is either a success record or an [`ErrorResult`] whose single `error`
//! field holds a message built by [`format_error`].

use serde::{Deserialize, Serialize};
use spotify_mcp_common::Error;

/// Detail attached to `NoActiveDevice` failures.
pub const NO_ACTIVE_DEVICE_DETAIL: &str = "Please open Spotify on a device and try again.";

/// Detail attached to `NothingPlaying` failures.
pub const NOTHING_PLAYING_DETAIL: &str = "Start playback on a device first.";

/// Closed set of failure categories a tool can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NoActiveDevice,
    NoTracksFound,
    NothingPlaying,
    InvalidVolume,
    AuthenticationError,
    Unknown,
}

impl ErrorCategory {
    /// Every category, in declaration order.
    pub const ALL: [ErrorCategory; 6] = [
        ErrorCategory::NoActiveDevice,
        ErrorCategory::NoTracksFound,
        ErrorCategory::NothingPlaying,
        ErrorCategory::InvalidVolume,
        ErrorCategory::AuthenticationError,
        ErrorCategory::Unknown,
    ];

    /// Fixed human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCategory::NoActiveDevice => "No active device found",
            ErrorCategory::NoTracksFound => "No tracks found",
            ErrorCategory::NothingPlaying => "Nothing is currently playing",
            ErrorCategory::InvalidVolume => "Invalid volume",
            ErrorCategory::AuthenticationError => "Authentication failed",
            ErrorCategory::Unknown => "Unexpected error",
        }
    }

    /// Map a client failure to the nearest category.
    ///
    /// Only checks that hold for every endpoint live here; player-specific
    /// rules are applied by [`ErrorCategory::classify_player`].
    pub fn classify(err: &Error) -> Self {
        if is_auth_failure(err) {
            return ErrorCategory::AuthenticationError;
        }

        let no_device_reason = err.reason() == Some("NO_ACTIVE_DEVICE");
        if no_device_reason || err.message().to_lowercase().contains("no active device") {
            return ErrorCategory::NoActiveDevice;
        }

        ErrorCategory::Unknown
    }

    /// Classification for player commands, where a bare 404 means Spotify
    /// found no device to send the command to.
    pub fn classify_player(err: &Error) -> Self {
        match Self::classify(err) {
            ErrorCategory::Unknown if err.status() == Some(404) => ErrorCategory::NoActiveDevice,
            category => category,
        }
    }
}

fn is_auth_failure(err: &Error) -> bool {
    match err {
        Error::Auth(_) => true,
        Error::Api { status: 401, .. } => true,
        Error::Api { reason: Some(reason), .. } if reason == "invalid_grant" || reason == "invalid_client" => true,
        Error::Api { message, .. } | Error::Transport(message) => {
            let message = message.to_lowercase();
            message.contains("invalid access token")
                || message.contains("access token expired")
                || message.contains("token expired")
                || message.contains("token revoked")
        }
        _ => false,
    }
}

/// Build the message for a category, with an optional detail.
///
/// Returns `"<description>: <detail>"`, or just the description when there
/// is no detail.
///
/// ```
/// use spotify_mcp::error::{ErrorCategory, format_error};
///
/// assert_eq!(format_error(ErrorCategory::NoTracksFound, None), "No tracks found");
/// assert_eq!(
///     format_error(ErrorCategory::InvalidVolume, Some("got 150")),
///     "Invalid volume: got 150"
/// );
/// ```
pub fn format_error(category: ErrorCategory, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("{}: {}", category.description(), detail),
        None => category.description().to_string(),
    }
}

/// Failure payload: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    /// Failure for a category with an optional detail.
    pub fn new(category: ErrorCategory, detail: Option<&str>) -> Self {
        Self {
            error: format_error(category, detail),
        }
    }

    /// Failure built from a classified client error.
    ///
    /// Categories with a canonical detail use it; everything else carries
    /// the client's own message.
    pub fn from_client_error(category: ErrorCategory, err: &Error) -> Self {
        match category {
            ErrorCategory::NoActiveDevice => Self::new(category, Some(NO_ACTIVE_DEVICE_DETAIL)),
            ErrorCategory::NothingPlaying => Self::new(category, Some(NOTHING_PLAYING_DETAIL)),
            _ => Self::new(category, Some(&err.message())),
        }
    }

    /// Shorthand for the no-active-device failure.
    pub fn no_active_device() -> Self {
        Self::new(ErrorCategory::NoActiveDevice, Some(NO_ACTIVE_DEVICE_DETAIL))
    }

    /// Shorthand for the nothing-playing failure.
    pub fn nothing_playing() -> Self {
        Self::new(ErrorCategory::NothingPlaying, Some(NOTHING_PLAYING_DETAIL))
    }
}
