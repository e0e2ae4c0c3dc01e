//! Operation handlers for the Spotify MCP server.
//!
//! Each handler validates its parameters, makes the call through
//! [`SpotifyApi`] and shapes the outcome into a [`ToolResponse`]. Handlers
//! never return a Rust error: every failure becomes an [`ErrorResult`].

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use spotify_mcp_common::Error;
use tracing::{debug, info, instrument, warn};

use crate::client::SpotifyApi;
use crate::error::{ErrorCategory, ErrorResult};
use crate::models::{
    Confirmation, PlaybackStatus, PlayerAction, PlaylistSummary, SearchResult, UserProfile,
};

/// Maximum number of tracks `search` returns.
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// Lowest accepted volume percentage.
pub const MIN_VOLUME: i64 = 0;

/// Highest accepted volume percentage.
pub const MAX_VOLUME: i64 = 100;

/// Parameters for the `search` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SearchParams {
    /// Free-text search, e.g. a song title and artist
    pub query: String,
}

/// Parameters for the `start_playback` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct StartPlaybackParams {
    /// Name of the track to look up and play
    pub track_name: String,
}

/// Parameters for the `set_player_volume` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SetVolumeParams {
    /// Volume percentage (0-100)
    pub volume: i64,
}

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct NoParams {}

/// Outcome of a tool call: a success shape or an error record, never both.
///
/// Serializes untagged, so callers see either the success value itself or
/// `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResponse<T> {
    Success(T),
    Failure(ErrorResult),
}

impl<T> ToolResponse<T> {
    /// Whether the call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResponse::Success(_))
    }

    /// The error message, if the call failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ToolResponse::Success(_) => None,
            ToolResponse::Failure(failure) => Some(&failure.error),
        }
    }

    /// The success value, if any.
    pub fn into_success(self) -> Option<T> {
        match self {
            ToolResponse::Success(value) => Some(value),
            ToolResponse::Failure(_) => None,
        }
    }
}

impl<T> From<ErrorResult> for ToolResponse<T> {
    fn from(failure: ErrorResult) -> Self {
        ToolResponse::Failure(failure)
    }
}

/// Reject blank text parameters before any network call.
fn validate_text<'a>(value: &'a str, what: &str) -> Result<&'a str, ErrorResult> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ErrorResult::new(
            ErrorCategory::NoTracksFound,
            Some(&format!("{} cannot be empty", what)),
        ));
    }
    Ok(trimmed)
}

/// Check a requested volume against `MIN_VOLUME..=MAX_VOLUME`.
pub fn validate_volume(volume: i64) -> Result<u8, ErrorResult> {
    if !(MIN_VOLUME..=MAX_VOLUME).contains(&volume) {
        return Err(ErrorResult::new(
            ErrorCategory::InvalidVolume,
            Some(&format!(
                "Volume must be an integer between {} and {}, got {}",
                MIN_VOLUME, MAX_VOLUME, volume
            )),
        ));
    }
    u8::try_from(volume).map_err(|_| {
        ErrorResult::new(ErrorCategory::InvalidVolume, Some(&volume.to_string()))
    })
}

fn no_matches(query: &str) -> ErrorResult {
    ErrorResult::new(
        ErrorCategory::NoTracksFound,
        Some(&format!("no matches for '{}'", query)),
    )
}

/// Spotify answers 403 "Restriction violated" when a player command does not
/// apply to the current state (pausing while paused, resuming while playing).
fn is_restriction_violation(err: &Error) -> bool {
    err.status() == Some(403) && err.message().to_lowercase().contains("restriction violated")
}

/// Handler for the ten Spotify tools.
///
/// Holds only the shared client, so one handler serves any number of
/// concurrent calls.
#[derive(Clone)]
pub struct SpotifyHandler {
    api: Arc<dyn SpotifyApi>,
}

impl SpotifyHandler {
    /// Create a handler around an authenticated client.
    pub fn new(api: Arc<dyn SpotifyApi>) -> Self {
        Self { api }
    }

    fn failure(&self, operation: &str, category: ErrorCategory, err: &Error) -> ErrorResult {
        warn!(operation, ?category, error = %err, "Spotify call failed");
        ErrorResult::from_client_error(category, err)
    }

    /// Search tracks; at most five, in Spotify's order.
    #[instrument(level = "info", name = "search", skip(self))]
    pub async fn search(&self, query: &str) -> ToolResponse<Vec<SearchResult>> {
        let query = match validate_text(query, "search query") {
            Ok(query) => query,
            Err(failure) => return failure.into(),
        };

        debug!("Calling Spotify search");
        match self.api.search_tracks(query, SEARCH_RESULT_LIMIT as u32).await {
            Ok(tracks) if tracks.is_empty() => no_matches(query).into(),
            Ok(mut tracks) => {
                tracks.truncate(SEARCH_RESULT_LIMIT);
                info!(count = tracks.len(), "Search returned tracks");
                ToolResponse::Success(tracks)
            }
            Err(e) => self.failure("search", ErrorCategory::classify(&e), &e).into(),
        }
    }

    /// Look up the best match for `track_name` and play it.
    ///
    /// If the lookup succeeds but playback fails, only the failure is
    /// reported.
    #[instrument(level = "info", name = "start_playback", skip(self))]
    pub async fn start_playback(&self, track_name: &str) -> ToolResponse<Confirmation> {
        let track_name = match validate_text(track_name, "track name") {
            Ok(name) => name,
            Err(failure) => return failure.into(),
        };

        let track = match self.api.search_tracks(track_name, 1).await {
            Ok(tracks) => match tracks.into_iter().next() {
                Some(track) => track,
                None => return no_matches(track_name).into(),
            },
            Err(e) => {
                return self
                    .failure("start_playback", ErrorCategory::classify(&e), &e)
                    .into();
            }
        };

        debug!(uri = %track.uri, "Resolved track");
        match self.api.start_track(&track.uri).await {
            Ok(()) => {
                info!(track = %track.name, artist = %track.artist, "Playback started");
                ToolResponse::Success(Confirmation::playing(&track))
            }
            Err(e) => {
                warn!(track = %track.name, uri = %track.uri, "Resolved track but could not start it");
                self.failure("start_playback", ErrorCategory::classify_player(&e), &e)
                    .into()
            }
        }
    }

    /// Pause playback. Pausing when nothing is playing is reported as
    /// `NothingPlaying`.
    #[instrument(level = "info", name = "pause_playback", skip(self))]
    pub async fn pause_playback(&self) -> ToolResponse<Confirmation> {
        match self.api.pause().await {
            Ok(()) => ToolResponse::Success(Confirmation::new(PlayerAction::Paused, "Playback paused")),
            Err(e) if is_restriction_violation(&e) => {
                self.failure("pause_playback", ErrorCategory::NothingPlaying, &e)
                    .into()
            }
            Err(e) => self
                .failure("pause_playback", ErrorCategory::classify_player(&e), &e)
                .into(),
        }
    }

    /// Resume playback. Resuming while already playing succeeds without
    /// changing anything.
    #[instrument(level = "info", name = "resume_playback", skip(self))]
    pub async fn resume_playback(&self) -> ToolResponse<Confirmation> {
        let resumed = Confirmation::new(PlayerAction::Resumed, "Playback resumed");
        match self.api.resume().await {
            Ok(()) => ToolResponse::Success(resumed),
            Err(e) if is_restriction_violation(&e) => {
                debug!("Already playing, nothing to resume");
                ToolResponse::Success(resumed)
            }
            Err(e) => self
                .failure("resume_playback", ErrorCategory::classify_player(&e), &e)
                .into(),
        }
    }

    /// Skip to the next track.
    #[instrument(level = "info", name = "next_track", skip(self))]
    pub async fn next_track(&self) -> ToolResponse<Confirmation> {
        match self.api.next_track().await {
            Ok(()) => ToolResponse::Success(Confirmation::new(
                PlayerAction::SkippedNext,
                "Skipped to next track",
            )),
            Err(e) => self
                .failure("next_track", ErrorCategory::classify_player(&e), &e)
                .into(),
        }
    }

    /// Go back to the previous track.
    #[instrument(level = "info", name = "previous_track", skip(self))]
    pub async fn previous_track(&self) -> ToolResponse<Confirmation> {
        match self.api.previous_track().await {
            Ok(()) => ToolResponse::Success(Confirmation::new(
                PlayerAction::SkippedPrevious,
                "Returned to previous track",
            )),
            Err(e) => self
                .failure("previous_track", ErrorCategory::classify_player(&e), &e)
                .into(),
        }
    }

    /// Set the volume. Out-of-range values are rejected without calling Spotify.
    #[instrument(level = "info", name = "set_player_volume", skip(self))]
    pub async fn set_player_volume(&self, volume: i64) -> ToolResponse<Confirmation> {
        let volume = match validate_volume(volume) {
            Ok(volume) => volume,
            Err(failure) => {
                debug!("Rejected out-of-range volume");
                return failure.into();
            }
        };

        match self.api.set_volume(volume).await {
            Ok(()) => ToolResponse::Success(Confirmation::volume_set(volume)),
            Err(e) => self
                .failure("set_player_volume", ErrorCategory::classify_player(&e), &e)
                .into(),
        }
    }

    /// What is playing right now.
    #[instrument(level = "info", name = "current_playback", skip(self))]
    pub async fn current_playback(&self) -> ToolResponse<PlaybackStatus> {
        match self.api.current_playback().await {
            Ok(Some(state)) => match state.item {
                Some(item) => ToolResponse::Success(PlaybackStatus::from_state(
                    state.is_playing,
                    state.progress_ms,
                    item,
                )),
                None => ErrorResult::nothing_playing().into(),
            },
            Ok(None) => ErrorResult::nothing_playing().into(),
            Err(e) => self
                .failure("current_playback", ErrorCategory::classify(&e), &e)
                .into(),
        }
    }

    /// The user's playlists. An empty list is a success.
    #[instrument(level = "info", name = "get_user_playlists", skip(self))]
    pub async fn get_user_playlists(&self) -> ToolResponse<Vec<PlaylistSummary>> {
        match self.api.current_user_playlists().await {
            Ok(playlists) => {
                info!(count = playlists.len(), "Fetched playlists");
                ToolResponse::Success(playlists)
            }
            Err(e) => self
                .failure("get_user_playlists", ErrorCategory::classify(&e), &e)
                .into(),
        }
    }

    /// The authenticated user's profile.
    #[instrument(level = "info", name = "get_current_user", skip(self))]
    pub async fn get_current_user(&self) -> ToolResponse<UserProfile> {
        match self.api.current_user().await {
            Ok(profile) => ToolResponse::Success(profile),
            Err(e) => self
                .failure("get_current_user", ErrorCategory::classify(&e), &e)
                .into(),
        }
    }
}
