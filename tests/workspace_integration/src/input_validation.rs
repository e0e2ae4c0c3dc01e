//! Input parameter validation tests.
//!
//! Arguments that cannot be decoded are rejected at the protocol boundary.
//! Arguments that decode but are out of range come back as error records,
//! and in both cases nothing is sent to Spotify.

use rmcp::model::{CallToolResult, JsonObject, RawContent};
use serde_json::Value;

/// Wrap a JSON value as tool arguments.
pub fn arguments(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Decode the JSON payload of a tool result.
pub fn payload(result: &CallToolResult) -> Option<Value> {
    match &result.content.first()?.raw {
        RawContent::Text(text) => serde_json::from_str(&text.text).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeSpotify, server_with};
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_tool_rejected() {
        let (server, fake) = server_with(FakeSpotify::with_device());
        let err = server.dispatch("queue_track", None).await.unwrap_err();
        assert!(err.message.contains("queue_track"));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_arguments_rejected() {
        let (server, fake) = server_with(FakeSpotify::with_device());
        for tool in ["search", "start_playback", "set_player_volume"] {
            assert!(server.dispatch(tool, None).await.is_err(), "{} accepted no arguments", tool);
        }
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_wrongly_typed_arguments_rejected() {
        let (server, fake) = server_with(FakeSpotify::with_device());
        let cases = [
            ("search", json!({"query": 42})),
            ("start_playback", json!({"track": "Money Trees"})),
            ("set_player_volume", json!({"volume": "50"})),
            ("set_player_volume", json!({"volume": 50.5})),
        ];
        for (tool, args) in cases {
            let result = server.dispatch(tool, arguments(args.clone())).await;
            assert!(result.is_err(), "{} accepted {}", tool, args);
        }
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_volume_150_is_error_record() {
        let (server, fake) = server_with(FakeSpotify::with_device());
        let result = server
            .dispatch("set_player_volume", arguments(json!({"volume": 150})))
            .await
            .unwrap();
        let error = payload(&result).unwrap()["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Invalid volume: "), "got {}", error);
        assert!(error.contains("150"));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_is_error_record() {
        let (server, fake) = server_with(FakeSpotify::with_device());
        let result = server
            .dispatch("search", arguments(json!({"query": "  "})))
            .await
            .unwrap();
        assert!(payload(&result).unwrap()["error"].as_str().unwrap().starts_with("No tracks found"));
        assert!(fake.calls().is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::fake::{FakeSpotify, server_with};
    use proptest::prelude::*;
    use serde_json::json;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    proptest! {
        /// Any integer outside 0-100 yields InvalidVolume without a call.
        #[test]
        fn out_of_range_volume_rejected(
            volume in prop_oneof![i64::MIN..0i64, 101i64..=i64::MAX],
        ) {
            let (server, fake) = server_with(FakeSpotify::with_device());
            let result = runtime()
                .block_on(server.dispatch("set_player_volume", arguments(json!({"volume": volume}))))
                .unwrap();
            let value = payload(&result).unwrap();
            prop_assert!(value["error"].as_str().unwrap().starts_with("Invalid volume: "));
            prop_assert!(fake.calls().is_empty());
        }

        /// Any integer in 0-100 is forwarded exactly.
        #[test]
        fn in_range_volume_forwarded(volume in 0i64..=100) {
            let (server, fake) = server_with(FakeSpotify::with_device());
            let result = runtime()
                .block_on(server.dispatch("set_player_volume", arguments(json!({"volume": volume}))))
                .unwrap();
            let value = payload(&result).unwrap();
            prop_assert_eq!(value["volume"].as_i64(), Some(volume));
            prop_assert_eq!(fake.calls(), vec![format!("volume:{}", volume)]);
        }
    }
}
