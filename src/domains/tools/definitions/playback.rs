//! Playback control tool.
//!
//! Play, pause, and track skipping on the user's active (or a named) device.

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

use super::common::{error_result, success_result};

/// Parameters for playback control.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlaybackParams {
    /// The playback action to perform.
    #[schemars(description = "Action: 'play', 'pause', 'next' or 'previous'")]
    pub action: String,

    /// Context to play (album/playlist/artist URI). Only used with 'play'.
    #[schemars(description = "Optional context URI to play (spotify:album:..., spotify:playlist:...)")]
    #[serde(default)]
    pub context_uri: Option<String>,

    /// Specific track URIs to play. Only used with 'play'.
    #[schemars(description = "Optional track URIs to play (spotify:track:...)")]
    #[serde(default)]
    pub uris: Vec<String>,

    /// Target device id; defaults to the active device.
    #[schemars(description = "Optional device id to target")]
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Playback control tool implementation.
#[derive(Debug, Clone)]
pub struct PlaybackTool;

impl PlaybackTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "spotify_playback";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Control playback: play or resume (optionally a specific context or tracks), pause, or skip to the next/previous track. Targets the active device unless a device id is given.";

    /// Execute the tool logic.
    pub async fn execute(params: &PlaybackParams, client: &SpotifyClient) -> CallToolResult {
        let device_id = params.device_id.as_deref();
        let action = params.action.to_lowercase();
        info!("Playback action: {}", action);

        let outcome = match action.as_str() {
            "play" => client
                .play(device_id, params.context_uri.as_deref(), &params.uris)
                .await
                .map(|_| Self::play_confirmation(params)),
            "pause" => client.pause(device_id).await.map(|_| "Playback paused.".to_string()),
            "next" => client
                .next_track(device_id)
                .await
                .map(|_| "Skipped to the next track.".to_string()),
            "previous" => client
                .previous_track(device_id)
                .await
                .map(|_| "Returned to the previous track.".to_string()),
            _ => {
                return error_result(&format!(
                    "Unknown action: {}. Use 'play', 'pause', 'next' or 'previous'",
                    params.action
                ));
            }
        };

        match outcome {
            Ok(message) => success_result(message),
            Err(e) => error_result(&format!("Playback control failed: {}", e)),
        }
    }

    fn play_confirmation(params: &PlaybackParams) -> String {
        if let Some(context) = &params.context_uri {
            format!("Playing {}.", context)
        } else if !params.uris.is_empty() {
            format!("Playing {} track(s).", params.uris.len())
        } else {
            "Playback resumed.".to_string()
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PlaybackParams>(),
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
                let params: PlaybackParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_params_minimal() {
        let json = r#"{"action": "pause"}"#;
        let params: PlaybackParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.action, "pause");
        assert!(params.context_uri.is_none());
        assert!(params.uris.is_empty());
        assert!(params.device_id.is_none());
    }

    #[test]
    fn test_playback_params_with_context() {
        let json = r#"{"action": "play", "context_uri": "spotify:album:abc", "device_id": "dev1"}"#;
        let params: PlaybackParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.context_uri.as_deref(), Some("spotify:album:abc"));
        assert_eq!(params.device_id.as_deref(), Some("dev1"));
    }

    #[test]
    fn test_play_confirmation_variants() {
        let mut params: PlaybackParams = serde_json::from_str(r#"{"action": "play"}"#).unwrap();
        assert_eq!(PlaybackTool::play_confirmation(&params), "Playback resumed.");

        params.uris = vec!["spotify:track:a".to_string(), "spotify:track:b".to_string()];
        assert_eq!(PlaybackTool::play_confirmation(&params), "Playing 2 track(s).");

        params.context_uri = Some("spotify:album:abc".to_string());
        assert_eq!(
            PlaybackTool::play_confirmation(&params),
            "Playing spotify:album:abc."
        );
    }
}
