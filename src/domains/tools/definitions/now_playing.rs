//! Current playback state tool.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::domains::spotify::SpotifyClient;
use crate::domains::spotify::models::PlaybackState;

use super::common::{error_result, format_duration, join_artists, success_result};

/// Parameters for the now playing tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NowPlayingParams {}

/// Current playback state tool implementation.
#[derive(Debug, Clone)]
pub struct NowPlayingTool;

impl NowPlayingTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "spotify_now_playing";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the current playback state: the playing track, progress, active device, and shuffle/repeat settings.";

    /// Execute the tool logic.
    pub async fn execute(_params: &NowPlayingParams, client: &SpotifyClient) -> CallToolResult {
        info!("Fetching current playback state");
        match client.playback_state().await {
            Ok(Some(state)) => success_result(Self::format_state(&state)),
            Ok(None) => success_result("Nothing is playing right now.".to_string()),
            Err(e) => error_result(&format!("Failed to fetch playback state: {}", e)),
        }
    }

    fn format_state(state: &PlaybackState) -> String {
        let mut lines = Vec::new();

        match &state.item {
            Some(track) => {
                let status = if state.is_playing { "Playing" } else { "Paused" };
                lines.push(format!(
                    "{}: {} — {}",
                    status,
                    track.name,
                    join_artists(&track.artists)
                ));
                if let Some(album) = &track.album {
                    lines.push(format!("Album: {}", album.name));
                }
                if let Some(progress) = state.progress_ms {
                    lines.push(format!(
                        "Progress: {} / {}",
                        format_duration(progress),
                        format_duration(track.duration_ms)
                    ));
                }
            }
            None => lines.push("Nothing is playing right now.".to_string()),
        }

        if let Some(device) = &state.device {
            let volume = device
                .volume_percent
                .map(|v| format!(", volume {}%", v))
                .unwrap_or_default();
            lines.push(format!("Device: {}{}", device.name, volume));
        }

        if let Some(shuffle) = state.shuffle_state {
            lines.push(format!(
                "Shuffle: {}",
                if shuffle { "on" } else { "off" }
            ));
        }
        if let Some(repeat) = &state.repeat_state {
            lines.push(format!("Repeat: {}", repeat));
        }

        lines.join("\n")
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<NowPlayingParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the router.
    pub fn create_route<S>(client: Arc<SpotifyClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                let params: NowPlayingParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
