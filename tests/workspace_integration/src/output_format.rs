//! Output format tests.
//!
//! Every tool answers with exactly one text content item holding JSON that
//! is either a success shape or `{"error": "<message>"}`, never both.

use rmcp::model::{CallToolResult, RawContent};
use serde_json::Value;

/// Validates the structure of a tool result and returns its JSON payload.
fn validate_tool_result(result: &CallToolResult) -> Result<Value, String> {
    if result.is_error.unwrap_or(false) {
        return Err("Tool failures must be reported as data, not isError".to_string());
    }
    if result.content.len() != 1 {
        return Err(format!("Expected one content item, got {}", result.content.len()));
    }

    let text = match &result.content[0].raw {
        RawContent::Text(text_content) => &text_content.text,
        other => return Err(format!("Expected text content, got {:?}", other)),
    };
    let value: Value =
        serde_json::from_str(text).map_err(|e| format!("Content is not JSON: {}", e))?;
    validate_shape(&value)?;
    Ok(value)
}

/// A payload is an error record (one string `error` field) or a success
/// shape with no `error` field anywhere at the top level.
fn validate_shape(value: &Value) -> Result<(), String> {
    match value {
        Value::Object(obj) if obj.contains_key("error") => {
            if obj.len() != 1 || !obj["error"].is_string() {
                return Err(format!("Malformed error record: {}", value));
            }
            Ok(())
        }
        Value::Object(obj) if obj.is_empty() => Err("Empty success object".to_string()),
        Value::Object(_) => Ok(()),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(obj) if !obj.contains_key("error") => {}
                    other => return Err(format!("Unexpected list item: {}", other)),
                }
            }
            Ok(())
        }
        other => Err(format!("Unexpected payload: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeSpotify, server_with};
    use crate::input_validation::arguments;
    use serde_json::json;
    use spotify_mcp::PlayingItem;

    #[test]
    fn test_shape_validation() {
        assert!(validate_shape(&json!({"error": "No tracks found"})).is_ok());
        assert!(validate_shape(&json!([])).is_ok());
        assert!(validate_shape(&json!({"status": "paused", "message": "Playback paused"})).is_ok());
        assert!(validate_shape(&json!({"error": "x", "status": "paused"})).is_err());
        assert!(validate_shape(&json!({"error": 1})).is_err());
        assert!(validate_shape(&json!("Playback paused")).is_err());
    }

    #[tokio::test]
    async fn test_search_money_trees() {
        let (server, _) = server_with(FakeSpotify::with_device());
        let result = server
            .dispatch("search", arguments(json!({"query": "Money Trees"})))
            .await
            .unwrap();
        let value = validate_tool_result(&result).unwrap();

        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["name"], "Money Trees");
        for item in items {
            for field in ["name", "artist", "album", "uri", "url"] {
                assert!(!item[field].as_str().unwrap().is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let (server, _) = server_with(FakeSpotify::with_device());
        let result = server
            .dispatch("search", arguments(json!({"query": "Alright"})))
            .await
            .unwrap();
        assert_eq!(
            validate_tool_result(&result).unwrap(),
            json!({"error": "No tracks found: no matches for 'Alright'"})
        );
    }

    #[tokio::test]
    async fn test_start_playback_confirms_track() {
        let (server, fake) = server_with(FakeSpotify::with_device());
        let result = server
            .dispatch("start_playback", arguments(json!({"track_name": "Money Trees"})))
            .await
            .unwrap();
        let value = validate_tool_result(&result).unwrap();
        assert_eq!(value["status"], "playing");
        assert_eq!(value["uri"], "spotify:track:2HbKqm4o0w5wEeEFXm2sD4");
        assert_eq!(
            fake.calls().last().map(String::as_str),
            Some("start:spotify:track:2HbKqm4o0w5wEeEFXm2sD4")
        );
    }

    #[tokio::test]
    async fn test_pause_without_device() {
        let fake = FakeSpotify {
            has_device: false,
            ..FakeSpotify::with_device()
        };
        let (server, _) = server_with(fake);
        let result = server.dispatch("pause_playback", None).await.unwrap();
        assert_eq!(
            validate_tool_result(&result).unwrap(),
            json!({"error": "No active device found: Please open Spotify on a device and try again."})
        );
    }

    #[tokio::test]
    async fn test_current_playback_nothing_playing() {
        let (server, _) = server_with(FakeSpotify::with_device());
        let result = server.dispatch("current_playback", None).await.unwrap();
        let value = validate_tool_result(&result).unwrap();
        assert!(value["error"].as_str().unwrap().starts_with("Nothing is currently playing"));
    }

    #[tokio::test]
    async fn test_current_playback_reports_item() {
        let fake = FakeSpotify {
            now_playing: Some(PlayingItem {
                name: "Money Trees".to_string(),
                artist: "Kendrick Lamar".to_string(),
                album: "good kid, m.A.A.d city".to_string(),
                duration_ms: 386_906,
            }),
            ..FakeSpotify::with_device()
        };
        let (server, _) = server_with(fake);
        let result = server.dispatch("current_playback", None).await.unwrap();
        let value = validate_tool_result(&result).unwrap();
        assert_eq!(value["track_name"], "Money Trees");
        assert_eq!(value["is_playing"], true);
        assert_eq!(value["duration_ms"], 386_906);
    }

    #[tokio::test]
    async fn test_playlists_and_profile() {
        let (server, _) = server_with(FakeSpotify::with_device());

        let playlists = server.dispatch("get_user_playlists", None).await.unwrap();
        let value = validate_tool_result(&playlists).unwrap();
        assert_eq!(value[0]["tracks_total"], 42);

        let profile = server.dispatch("get_current_user", None).await.unwrap();
        let value = validate_tool_result(&profile).unwrap();
        assert_eq!(value["id"], "listener");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::fake::{FakeSpotify, server_with};
    use crate::input_validation::arguments;
    use proptest::prelude::*;
    use serde_json::json;
    use spotify_mcp::ToolKind;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn arguments_for(tool: ToolKind, text: &str, volume: i64) -> serde_json::Value {
        match tool {
            ToolKind::Search => json!({"query": text}),
            ToolKind::StartPlayback => json!({"track_name": text}),
            ToolKind::SetPlayerVolume => json!({"volume": volume}),
            _ => json!({}),
        }
    }

    proptest! {
        /// Every tool, with or without a device, yields exactly one valid shape.
        #[test]
        fn every_tool_output_is_well_formed(
            tool in proptest::sample::select(ToolKind::ALL.to_vec()),
            has_device in any::<bool>(),
            text in "[A-Za-z ]{0,30}",
            volume in -20i64..130,
        ) {
            let fake = FakeSpotify { has_device, ..FakeSpotify::with_device() };
            let (server, _) = server_with(fake);
            let result = runtime()
                .block_on(server.dispatch(tool.name(), arguments(arguments_for(tool, &text, volume))))
                .unwrap();
            let checked = validate_tool_result(&result);
            prop_assert!(checked.is_ok(), "{}: {:?}", tool.name(), checked.err());
        }
    }
}
