//! External Service Client seam.
//!
//! Handlers talk to Spotify only through [`SpotifyApi`]. The production
//! implementation, [`RspotifyClient`], wraps an authenticated rspotify client;
//! tests substitute a recording mock.

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use rspotify::{
    AuthCodeSpotify, ClientError,
    http::HttpError,
    model::{
        AdditionalType, CurrentPlaybackContext, FullTrack, PlayableId, PlayableItem,
        SearchResult as ApiSearchResult, SearchType, SimplifiedPlaylist, TrackId,
    },
    prelude::*,
};
use spotify_mcp_common::{AuthError, Error, Result, SpotifySession};
use tracing::{debug, instrument};

use crate::models::{PlaybackState, PlayingItem, PlaylistSummary, SearchResult, UserProfile};

/// Operations the handlers need from Spotify.
///
/// Implementations must be safe to share across concurrent tool calls.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Search tracks, returning at most `limit` results in relevance order.
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>>;

    /// Start playing a single track URI on the active device.
    async fn start_track(&self, uri: &str) -> Result<()>;

    /// Pause playback on the active device.
    async fn pause(&self) -> Result<()>;

    /// Resume playback on the active device.
    async fn resume(&self) -> Result<()>;

    /// Skip to the next track.
    async fn next_track(&self) -> Result<()>;

    /// Go back to the previous track.
    async fn previous_track(&self) -> Result<()>;

    /// Set the volume percentage on the active device.
    async fn set_volume(&self, volume: u8) -> Result<()>;

    /// Current playback context, `None` when no device is playing anything.
    async fn current_playback(&self) -> Result<Option<PlaybackState>>;

    /// Every playlist owned or followed by the user.
    async fn current_user_playlists(&self) -> Result<Vec<PlaylistSummary>>;

    /// The authenticated user's profile.
    async fn current_user(&self) -> Result<UserProfile>;
}

/// [`SpotifyApi`] backed by the Spotify Web API through rspotify.
#[derive(Clone, Debug)]
pub struct RspotifyClient {
    client: Arc<AuthCodeSpotify>,
}

impl RspotifyClient {
    /// Wrap an authenticated session.
    pub fn new(session: SpotifySession) -> Self {
        Self {
            client: Arc::new(session.into_client()),
        }
    }
}

#[async_trait]
impl SpotifyApi for RspotifyClient {
    #[instrument(level = "debug", skip(self))]
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        let result = match self
            .client
            .search(query, SearchType::Track, None, None, Some(limit), None)
            .await
        {
            Ok(result) => result,
            Err(e) => return Err(convert_error(e).await),
        };

        let tracks = match result {
            ApiSearchResult::Tracks(page) => page.items.into_iter().map(search_result).collect(),
            _ => Vec::new(),
        };
        Ok(tracks)
    }

    #[instrument(level = "debug", skip(self))]
    async fn start_track(&self, uri: &str) -> Result<()> {
        let id = TrackId::from_uri(uri)
            .map_err(|e| Error::transport(format!("invalid track URI '{}': {}", uri, e)))?
            .into_static();

        let played = self
            .client
            .start_uris_playback([PlayableId::Track(id)], None, None, None)
            .await;
        finish(played).await
    }

    async fn pause(&self) -> Result<()> {
        debug!("API: pause_playback");
        finish(self.client.pause_playback(None).await).await
    }

    async fn resume(&self) -> Result<()> {
        debug!("API: resume_playback");
        finish(self.client.resume_playback(None, None).await).await
    }

    async fn next_track(&self) -> Result<()> {
        debug!("API: next_track");
        finish(self.client.next_track(None).await).await
    }

    async fn previous_track(&self) -> Result<()> {
        debug!("API: previous_track");
        finish(self.client.previous_track(None).await).await
    }

    async fn set_volume(&self, volume: u8) -> Result<()> {
        debug!(volume, "API: volume");
        finish(self.client.volume(volume, None).await).await
    }

    async fn current_playback(&self) -> Result<Option<PlaybackState>> {
        debug!("API: current_playback");
        let types = [&AdditionalType::Track, &AdditionalType::Episode];
        match self.client.current_playback(None, Some(types)).await {
            Ok(context) => Ok(context.map(playback_state)),
            Err(e) => Err(convert_error(e).await),
        }
    }

    async fn current_user_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        debug!("API: current_user_playlists");
        let playlists: Vec<SimplifiedPlaylist> =
            match self.client.current_user_playlists().try_collect().await {
                Ok(playlists) => playlists,
                Err(e) => return Err(convert_error(e).await),
            };

        debug!(count = playlists.len(), "Fetched playlists");
        Ok(playlists.into_iter().map(playlist_summary).collect())
    }

    async fn current_user(&self) -> Result<UserProfile> {
        debug!("API: me");
        let user = match self.client.me().await {
            Ok(user) => user,
            Err(e) => return Err(convert_error(e).await),
        };

        Ok(UserProfile {
            display_name: user.display_name,
            email: user.email,
            id: user.id.id().to_string(),
        })
    }
}

async fn finish(result: std::result::Result<(), ClientError>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => Err(convert_error(e).await),
    }
}

/// Turn an rspotify failure into the common error type.
///
/// HTTP status failures keep their status and Spotify's error body; the body
/// has to be read here because the response is consumed with the error.
/// A missing or unrefreshable token is an auth failure, not a transport one.
async fn convert_error(err: ClientError) -> Error {
    match err {
        ClientError::InvalidToken => AuthError::InvalidToken.into(),
        ClientError::Http(http) => match *http {
            HttpError::StatusCode(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                debug!(status, body = %body, "Spotify API returned an error");
                Error::from_response(status, &body)
            }
            other => Error::transport(other.to_string()),
        },
        other => Error::transport(other.to_string()),
    }
}

fn search_result(track: FullTrack) -> SearchResult {
    SearchResult {
        uri: track.id.as_ref().map(|id| id.uri()).unwrap_or_default(),
        url: track.external_urls.get("spotify").cloned().unwrap_or_default(),
        artist: track.artists.first().map(|a| a.name.clone()).unwrap_or_default(),
        album: track.album.name,
        name: track.name,
    }
}

fn playback_state(context: CurrentPlaybackContext) -> PlaybackState {
    let item = match context.item {
        Some(PlayableItem::Track(track)) => Some(PlayingItem {
            artist: track.artists.first().map(|a| a.name.clone()).unwrap_or_default(),
            duration_ms: millis(track.duration.num_milliseconds()),
            album: track.album.name,
            name: track.name,
        }),
        Some(PlayableItem::Episode(episode)) => Some(PlayingItem {
            duration_ms: millis(episode.duration.num_milliseconds()),
            artist: episode.show.publisher,
            album: episode.show.name,
            name: episode.name,
        }),
        _ => None,
    };

    PlaybackState {
        is_playing: context.is_playing,
        progress_ms: context.progress.map(|p| millis(p.num_milliseconds())),
        item,
    }
}

fn playlist_summary(playlist: SimplifiedPlaylist) -> PlaylistSummary {
    PlaylistSummary {
        url: playlist.external_urls.get("spotify").cloned().unwrap_or_default(),
        id: playlist.id.id().to_string(),
        tracks_total: playlist.tracks.total,
        name: playlist.name,
    }
}

fn millis(ms: i64) -> u64 {
    u64::try_from(ms).unwrap_or(0)
}
