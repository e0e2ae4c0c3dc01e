//! MCP server for the Spotify tools.
//!
//! Implements the transport boundary: the server lists the tool registry,
//! decodes arguments and hands them to [`SpotifyHandler`]. Every known tool
//! answers with one JSON text item. Tool failures are data inside that item.
//! Only unknown tools and undecodable arguments are protocol errors.

use std::borrow::Cow;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Content, JsonObject, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
    },
    service::{RequestContext, RoleServer},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::handler::{
    SearchParams, SetVolumeParams, SpotifyHandler, StartPlaybackParams, ToolResponse,
};
use crate::tools::ToolKind;

/// MCP server exposing Spotify search, playback, playlists and profile.
#[derive(Clone)]
pub struct SpotifyServer {
    handler: SpotifyHandler,
}

impl SpotifyServer {
    /// Create a server around a ready handler.
    pub fn new(handler: SpotifyHandler) -> Self {
        Self { handler }
    }

    /// Tool descriptors for every registered tool.
    pub fn tools() -> Vec<Tool> {
        ToolKind::ALL
            .into_iter()
            .map(|tool| Tool {
                name: Cow::Borrowed(tool.name()),
                description: Some(Cow::Borrowed(tool.description())),
                input_schema: tool.input_schema(),
                annotations: None,
                icons: None,
                meta: None,
                output_schema: None,
                title: None,
            })
            .collect()
    }

    /// Run a tool by name.
    ///
    /// # Errors
    ///
    /// `invalid_params` for an unknown tool or arguments that do not match
    /// the tool's schema.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let tool = ToolKind::from_name(name)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {}", name), None))?;
        info!(tool = tool.name(), "Calling tool");

        match tool {
            ToolKind::Search => {
                let params: SearchParams = parse_arguments(tool, arguments)?;
                respond(self.handler.search(&params.query).await)
            }
            ToolKind::StartPlayback => {
                let params: StartPlaybackParams = parse_arguments(tool, arguments)?;
                respond(self.handler.start_playback(&params.track_name).await)
            }
            ToolKind::SetPlayerVolume => {
                let params: SetVolumeParams = parse_arguments(tool, arguments)?;
                respond(self.handler.set_player_volume(params.volume).await)
            }
            ToolKind::PausePlayback => respond(self.handler.pause_playback().await),
            ToolKind::ResumePlayback => respond(self.handler.resume_playback().await),
            ToolKind::NextTrack => respond(self.handler.next_track().await),
            ToolKind::PreviousTrack => respond(self.handler.previous_track().await),
            ToolKind::CurrentPlayback => respond(self.handler.current_playback().await),
            ToolKind::GetUserPlaylists => respond(self.handler.get_user_playlists().await),
            ToolKind::GetCurrentUser => respond(self.handler.get_current_user().await),
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(
    tool: ToolKind,
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    let arguments = arguments.ok_or_else(|| {
        McpError::invalid_params(format!("Missing parameters for {}", tool.name()), None)
    })?;
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))
}

fn respond<T: Serialize>(response: ToolResponse<T>) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string(&response).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize tool result: {}", e), None)
    })?;
    debug!(success = response.is_success(), "Tool finished");
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

impl ServerHandler for SpotifyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Spotify control server. Search for tracks, start playback, pause, resume, \
                 skip, set the volume, and read the current playback, playlists and profile. \
                 Failures come back as {\"error\": \"...\"}."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: Self::tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.dispatch(params.name.as_ref(), params.arguments).await }
    }
}
