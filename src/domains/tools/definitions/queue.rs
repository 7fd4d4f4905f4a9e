//! Playback queue tool.

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
use crate::domains::spotify::models::QueueResponse;

use super::common::{error_result, format_track_line, success_result};

/// Parameters for the queue tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueueParams {
    /// The queue operation to perform.
    #[schemars(description = "Action: 'add' (queue a track) or 'list' (show the queue)")]
    pub action: String,

    /// Track URI to queue. Required for 'add'.
    #[schemars(description = "Track URI to add (spotify:track:...), required for 'add'")]
    #[serde(default)]
    pub uri: Option<String>,

    /// Target device id; defaults to the active device.
    #[schemars(description = "Optional device id to target")]
    #[serde(default)]
    pub device_id: Option<String>,
}

/// Playback queue tool implementation.
#[derive(Debug, Clone)]
pub struct QueueTool;

impl QueueTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "spotify_queue";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Manage the playback queue: add a track to the end of the queue, or list the currently queued tracks.";

    /// Execute the tool logic.
    pub async fn execute(params: &QueueParams, client: &SpotifyClient) -> CallToolResult {
        match params.action.to_lowercase().as_str() {
            "add" => {
                let Some(uri) = params.uri.as_deref() else {
                    return error_result("The 'add' action requires a 'uri' parameter");
                };
                info!("Queueing {}", uri);
                match client.add_to_queue(uri, params.device_id.as_deref()).await {
                    Ok(()) => success_result(format!("Added {} to the queue.", uri)),
                    Err(e) => error_result(&format!("Failed to queue track: {}", e)),
                }
            }
            "list" => match client.queue().await {
                Ok(queue) => success_result(Self::format_queue(&queue)),
                Err(e) => error_result(&format!("Failed to fetch queue: {}", e)),
            },
            _ => error_result(&format!(
                "Unknown action: {}. Use 'add' or 'list'",
                params.action
            )),
        }
    }

    fn format_queue(queue: &QueueResponse) -> String {
        let mut lines = Vec::new();

        if let Some(current) = &queue.currently_playing {
            lines.push(format!("Now playing: {}", format_track_line(current)));
        }

        if queue.queue.is_empty() {
            lines.push("The queue is empty.".to_string());
        } else {
            lines.push(format!("Up next ({} track(s)):", queue.queue.len()));
            for (index, track) in queue.queue.iter().enumerate() {
                lines.push(format!("{:2}. {}", index + 1, format_track_line(track)));
            }
        }

        lines.join("\n")
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<QueueParams>(),
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
                let params: QueueParams = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
