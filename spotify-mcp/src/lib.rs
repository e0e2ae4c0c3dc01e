//! Spotify MCP Server Library
//!
//! Exposes Spotify search, playback control, playlists and the user profile
//! as MCP tools. Failures are normalized into a small set of categories and
//! returned as `{"error": "..."}` records instead of protocol errors.

pub mod client;
pub mod error;
pub mod handler;
pub mod models;
pub mod server;
pub mod tools;

pub use client::{RspotifyClient, SpotifyApi};
pub use error::{ErrorCategory, ErrorResult, format_error};
pub use handler::{SEARCH_RESULT_LIMIT, SpotifyHandler, ToolResponse};
pub use models::{
    Confirmation, PlaybackState, PlaybackStatus, PlayerAction, PlayingItem, PlaylistSummary,
    SearchResult, UserProfile,
};
pub use server::SpotifyServer;
pub use tools::ToolKind;
