//! Spotify session bootstrap.
//!
//! The authorization-code flow itself is handled by `rspotify`. This module
//! only wires the configured credentials into an `AuthCodeSpotify` client and
//! decides where its token comes from:
//!
//! - `SpotifySession::connect` reuses the token cached by a previous login
//!   (refreshing it if it has expired)
//! - `SpotifySession::login` runs rspotify's interactive prompt and caches
//!   the resulting token

use rspotify::{AuthCodeSpotify, Config as ClientConfig, Credentials, OAuth, prelude::*};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::AuthError;

/// OAuth scopes requested for every session.
pub const SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-library-read",
    "user-read-playback-state",
    "user-modify-playback-state",
    "playlist-read-private",
];

/// An authenticated Spotify Web API session.
///
/// Cloning is cheap: the underlying client shares its token and HTTP pool.
#[derive(Clone, Debug)]
pub struct SpotifySession {
    client: AuthCodeSpotify,
}

impl SpotifySession {
    /// Build an unauthenticated client from the configuration.
    ///
    /// Token caching and automatic refresh are always enabled so a single
    /// `login` keeps the server usable across restarts.
    pub fn build_client(config: &Config) -> AuthCodeSpotify {
        let creds = Credentials::new(&config.client_id, &config.client_secret);
        let oauth = OAuth {
            redirect_uri: config.redirect_uri.clone(),
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let client_config = ClientConfig {
            token_cached: true,
            token_refreshing: true,
            cache_path: config.token_cache_path.clone(),
            ..Default::default()
        };

        AuthCodeSpotify::with_config(creds, oauth, client_config)
    }

    /// Restore a session from the token cache.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` if no cached token exists (or it was
    /// issued for a narrower scope set), `AuthError::RefreshFailed` if an
    /// expired token cannot be refreshed, and `AuthError::Client` if the
    /// cache cannot be read.
    #[instrument(level = "debug", name = "spotify_session_connect", skip_all)]
    pub async fn connect(config: &Config) -> Result<Self, AuthError> {
        let cache_path = config.token_cache_path.display().to_string();
        if !config.token_cache_path.exists() {
            debug!(path = %cache_path, "Token cache not found");
            return Err(AuthError::MissingToken(cache_path));
        }

        let client = Self::build_client(config);
        let token = client
            .read_token_cache(true)
            .await
            .map_err(|e| AuthError::client(format!("failed to read token cache: {}", e)))?
            .ok_or_else(|| AuthError::MissingToken(cache_path.clone()))?;

        let expired = token.is_expired();
        *client
            .token
            .lock()
            .await
            .map_err(|_| AuthError::client("token lock poisoned"))? = Some(token);

        if expired {
            info!("Cached token expired, refreshing");
            client.refresh_token().await.map_err(|e| {
                warn!(error = %e, "Token refresh failed");
                AuthError::refresh_failed(e.to_string())
            })?;
        }

        debug!(path = %cache_path, "Spotify session restored from cache");
        Ok(Self { client })
    }

    /// Run the interactive authorization prompt and cache the token.
    ///
    /// Opens the authorize URL in a browser (or prints it) and reads the
    /// redirected URL from stdin, so this must never run while stdin is
    /// carrying the MCP stdio transport.
    #[instrument(level = "debug", name = "spotify_session_login", skip_all)]
    pub async fn login(config: &Config) -> Result<Self, AuthError> {
        let client = Self::build_client(config);
        let url = client
            .get_authorize_url(false)
            .map_err(|e| AuthError::client(format!("failed to build authorize URL: {}", e)))?;

        client
            .prompt_for_token(&url)
            .await
            .map_err(|e| AuthError::client(e.to_string()))?;

        info!(path = %config.token_cache_path.display(), "Spotify token cached");
        Ok(Self { client })
    }

    /// Consume the session, returning the rspotify client.
    pub fn into_client(self) -> AuthCodeSpotify {
        self.client
    }
}
