//! Flat result records returned by the tools.
//!
//! Every type here serializes to a plain JSON object. None of them has an
//! `error` field, which is what keeps success and failure distinguishable.

use serde::{Deserialize, Serialize};

/// One track from a search, in the order Spotify ranked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Track name
    pub name: String,
    /// First credited artist
    pub artist: String,
    /// Album name
    pub album: String,
    /// Spotify URI, e.g. `spotify:track:...`
    pub uri: String,
    /// Link to the track on open.spotify.com
    pub url: String,
}

/// Raw playback state as reported by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    /// `None` when a context is active but nothing is loaded (or the item
    /// type is one we cannot describe)
    pub item: Option<PlayingItem>,
}

/// The track or episode currently loaded on the active device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayingItem {
    pub name: String,
    /// Artist for tracks; publisher for episodes
    pub artist: String,
    /// Album for tracks; show name for episodes
    pub album: String,
    pub duration_ms: u64,
}

/// Snapshot of what is playing right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub track_name: String,
    pub artist: String,
    pub album: String,
    pub progress_ms: u64,
    pub duration_ms: u64,
}

/// One of the user's playlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub url: String,
    pub id: String,
    pub tracks_total: u32,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: Option<String>,
    /// Withheld unless the `user-read-email` scope was granted
    pub email: Option<String>,
    pub id: String,
}

/// Which state change a confirmation acknowledges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Playing,
    Paused,
    Resumed,
    SkippedNext,
    SkippedPrevious,
    VolumeSet,
}

/// Minimal success payload for state-changing tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub status: PlayerAction,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u8>,
}

impl Confirmation {
    /// A confirmation carrying only a status and message.
    pub fn new(status: PlayerAction, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            track: None,
            artist: None,
            uri: None,
            volume: None,
        }
    }

    /// Confirmation for a track that started playing.
    pub fn playing(track: &SearchResult) -> Self {
        Self {
            track: Some(track.name.clone()),
            artist: Some(track.artist.clone()),
            uri: Some(track.uri.clone()),
            ..Self::new(
                PlayerAction::Playing,
                format!("Playing {} by {}", track.name, track.artist),
            )
        }
    }

    /// Confirmation for an applied volume level.
    pub fn volume_set(volume: u8) -> Self {
        Self {
            volume: Some(volume),
            ..Self::new(PlayerAction::VolumeSet, format!("Volume set to {}", volume))
        }
    }
}

impl PlaybackStatus {
    /// Combine the client's state with its loaded item.
    pub fn from_state(is_playing: bool, progress_ms: Option<u64>, item: PlayingItem) -> Self {
        Self {
            is_playing,
            track_name: item.name,
            artist: item.artist,
            album: item.album,
            progress_ms: progress_ms.unwrap_or(0),
            duration_ms: item.duration_ms,
        }
    }
}
