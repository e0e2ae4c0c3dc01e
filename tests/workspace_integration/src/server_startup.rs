//! Server startup integration tests.
//!
//! Tests that the server can be built from configuration and advertises the
//! tools capability over either transport.

use std::collections::HashMap;

use spotify_mcp_common::Config;

/// Test configuration for integration tests.
fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("CLIENT_ID", "test-client"),
        ("CLIENT_SECRET", "test-secret"),
        ("REDIRECT_URI", "http://127.0.0.1:8888/callback"),
    ]
    .into_iter()
    .collect();
    Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
        .unwrap_or_else(|e| panic!("test config should be valid: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeSpotify, server_with};
    use rmcp::ServerHandler;
    use spotify_mcp_common::{SpotifySession, Transport, TransportArgs, TransportMode};

    #[test]
    fn test_config_defaults() {
        let config = test_config();
        assert!(config.token_cache_path.ends_with(".spotify_token_cache.json"));
    }

    #[test]
    fn test_server_startup() {
        let (server, _) = server_with(FakeSpotify::with_device());
        let info = server.get_info();

        assert!(info.instructions.is_some());
        let instructions = info.instructions.as_ref().unwrap().to_lowercase();
        assert!(
            instructions.contains("spotify"),
            "Server instructions should mention 'spotify'"
        );
    }

    #[test]
    fn test_server_has_tools_capability_only() {
        let (server, _) = server_with(FakeSpotify::with_device());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
    }

    #[test]
    fn test_session_client_uses_configured_redirect() {
        let config = test_config();
        let client = SpotifySession::build_client(&config);
        assert_eq!(client.oauth.redirect_uri, "http://127.0.0.1:8888/callback");
    }

    #[tokio::test]
    async fn test_connect_without_token_cache_fails() {
        let mut config = test_config();
        config.token_cache_path = "does/not/exist/token.json".into();
        let err = SpotifySession::connect(&config).await.unwrap_err();
        assert!(err.to_string().contains("spotify-mcp login"));
    }

    #[test]
    fn test_transport_selection() {
        let defaults = TransportArgs::default();
        assert_eq!(defaults.port, 8080);
        let stdio = defaults.into_transport();
        assert_eq!(stdio, Transport::Stdio);

        let http = TransportArgs {
            transport: TransportMode::Http,
            port: 3000,
            ..Default::default()
        }
        .into_transport();
        assert_eq!(http.port(), Some(3000));
        assert!(http.is_http());
    }
}
