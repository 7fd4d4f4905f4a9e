//! Recently played history tool.

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
use crate::domains::spotify::models::{CursorPage, PlayHistory};

use super::common::{default_limit, error_result, format_track_line, success_result, validate_limit};

/// Parameters for the recently played tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RecentlyPlayedParams {
    /// Maximum number of entries to return (default: 10, max: 50).
    #[schemars(description = "Maximum number of history entries (default: 10, max: 50)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Recently played history tool implementation.
#[derive(Debug, Clone)]
pub struct RecentlyPlayedTool;

impl RecentlyPlayedTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "spotify_recently_played";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List the user's recently played tracks, most recent first, with play timestamps.";

    /// Execute the tool logic.
    pub async fn execute(params: &RecentlyPlayedParams, client: &SpotifyClient) -> CallToolResult {
        let limit = validate_limit(params.limit);
        info!("Fetching recently played tracks");
        match client.recently_played(limit).await {
            Ok(history) => success_result(Self::format_history(&history)),
            Err(e) => error_result(&format!("Failed to fetch play history: {}", e)),
        }
    }

    fn format_history(history: &CursorPage<PlayHistory>) -> String {
        if history.items.is_empty() {
            return "No recently played tracks.".to_string();
        }

        let mut lines = vec![format!("Last {} played track(s):", history.items.len())];
        for (index, entry) in history.items.iter().enumerate() {
            let played_at = entry
                .played_at
                .as_deref()
                .map(|at| format!(" [{}]", at))
                .unwrap_or_default();
            lines.push(format!(
                "{:2}. {}{}",
                index + 1,
                format_track_line(&entry.track),
                played_at
            ));
        }
        lines.join("\n")
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<RecentlyPlayedParams>(),
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
                let params: RecentlyPlayedParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
