//! Static registry of the tools this server exposes.

use std::sync::Arc;

use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

use crate::handler::{NoParams, SearchParams, SetVolumeParams, StartPlaybackParams};

/// The ten Spotify tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Search,
    StartPlayback,
    PausePlayback,
    ResumePlayback,
    NextTrack,
    PreviousTrack,
    SetPlayerVolume,
    CurrentPlayback,
    GetUserPlaylists,
    GetCurrentUser,
}

impl ToolKind {
    /// Every tool, in listing order.
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Search,
        ToolKind::StartPlayback,
        ToolKind::GetCurrentUser,
        ToolKind::PausePlayback,
        ToolKind::ResumePlayback,
        ToolKind::NextTrack,
        ToolKind::PreviousTrack,
        ToolKind::GetUserPlaylists,
        ToolKind::SetPlayerVolume,
        ToolKind::CurrentPlayback,
    ];

    /// Wire name of the tool.
    pub const fn name(self) -> &'static str {
        match self {
            ToolKind::Search => "search",
            ToolKind::StartPlayback => "start_playback",
            ToolKind::PausePlayback => "pause_playback",
            ToolKind::ResumePlayback => "resume_playback",
            ToolKind::NextTrack => "next_track",
            ToolKind::PreviousTrack => "previous_track",
            ToolKind::SetPlayerVolume => "set_player_volume",
            ToolKind::CurrentPlayback => "current_playback",
            ToolKind::GetUserPlaylists => "get_user_playlists",
            ToolKind::GetCurrentUser => "get_current_user",
        }
    }

    /// Human-readable description shown to MCP clients.
    pub const fn description(self) -> &'static str {
        match self {
            ToolKind::Search => {
                "Search for a song on Spotify. Returns up to 5 tracks with name, artist, \
                 album, uri and url."
            }
            ToolKind::StartPlayback => {
                "Play a song on Spotify. Searches for the track name and starts the best \
                 match on the active device."
            }
            ToolKind::PausePlayback => "Pause the current playback",
            ToolKind::ResumePlayback => "Resume the current playback",
            ToolKind::NextTrack => "Skip to the next track",
            ToolKind::PreviousTrack => "Go back to the previous track",
            ToolKind::SetPlayerVolume => "Set the volume (0-100)",
            ToolKind::CurrentPlayback => "Get information about what's currently playing",
            ToolKind::GetUserPlaylists => "Get user's playlists",
            ToolKind::GetCurrentUser => "Get current user information",
        }
    }

    /// Look a tool up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// JSON Schema for the tool's arguments.
    pub fn input_schema(self) -> Arc<Map<String, Value>> {
        match self {
            ToolKind::Search => schema_of::<SearchParams>(),
            ToolKind::StartPlayback => schema_of::<StartPlaybackParams>(),
            ToolKind::SetPlayerVolume => schema_of::<SetVolumeParams>(),
            _ => schema_of::<NoParams>(),
        }
    }
}

fn schema_of<T: JsonSchema>() -> Arc<Map<String, Value>> {
    match serde_json::to_value(schema_for!(T)) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(Map::new()),
    }
}
