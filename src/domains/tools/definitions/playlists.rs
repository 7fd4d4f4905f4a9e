//! Playlist management tool.
//!
//! Listing, reading, creating, and extending the user's playlists.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domains::spotify::SpotifyClient;
use crate::domains::spotify::models::{Page, Playlist, PlaylistItem};

use super::common::{
    default_limit, error_result, format_track_line, structured_result, success_result,
    validate_limit,
};

/// Parameters for playlist operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlaylistParams {
    /// The playlist operation to perform.
    #[schemars(description = "Action: 'list', 'get', 'create' or 'add_tracks'")]
    pub action: String,

    /// Playlist id. Required for 'get' and 'add_tracks'.
    #[schemars(description = "Playlist id, required for 'get' and 'add_tracks'")]
    #[serde(default)]
    pub playlist_id: Option<String>,

    /// New playlist name. Required for 'create'.
    #[schemars(description = "Playlist name, required for 'create'")]
    #[serde(default)]
    pub name: Option<String>,

    /// New playlist description. Only used with 'create'.
    #[schemars(description = "Optional playlist description for 'create'")]
    #[serde(default)]
    pub description: Option<String>,

    /// Whether a created playlist is public (default: false).
    #[schemars(description = "Whether the created playlist is public (default: false)")]
    #[serde(default)]
    pub public: bool,

    /// Track URIs to add. Required for 'add_tracks'.
    #[schemars(description = "Track URIs to add (spotify:track:...), required for 'add_tracks'")]
    #[serde(default)]
    pub uris: Vec<String>,

    /// Maximum number of results for 'list' and 'get' (default: 10, max: 50).
    #[schemars(description = "Maximum number of results (default: 10, max: 50)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Structured output for a playlist listing.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistInfo {
    pub id: String,
    pub name: String,
    pub owner: Option<String>,
    pub tracks: Option<u32>,
    pub uri: String,
}

/// Playlist management tool implementation.
#[derive(Debug, Clone)]
pub struct PlaylistTool;

impl PlaylistTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "spotify_playlists";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Manage playlists: list the user's playlists, read a playlist's tracks, create a new playlist, or add tracks to an existing one.";

    /// Execute the tool logic.
    pub async fn execute(params: &PlaylistParams, client: &SpotifyClient) -> CallToolResult {
        match params.action.to_lowercase().as_str() {
            "list" => Self::list(params, client).await,
            "get" => Self::get(params, client).await,
            "create" => Self::create(params, client).await,
            "add_tracks" => Self::add_tracks(params, client).await,
            _ => error_result(&format!(
                "Unknown action: {}. Use 'list', 'get', 'create' or 'add_tracks'",
                params.action
            )),
        }
    }

    async fn list(params: &PlaylistParams, client: &SpotifyClient) -> CallToolResult {
        let limit = validate_limit(params.limit);
        info!("Listing playlists");
        match client.current_user_playlists(limit).await {
            Ok(page) => {
                if page.items.is_empty() {
                    return success_result("You have no playlists.".to_string());
                }
                let total = page.total;
                let infos = Self::playlist_infos(page);
                let summary = match total {
                    Some(total) => format!("Showing {} of {} playlist(s)", infos.len(), total),
                    None => format!("Found {} playlist(s)", infos.len()),
                };
                structured_result(summary, infos)
            }
            Err(e) => error_result(&format!("Failed to list playlists: {}", e)),
        }
    }

    async fn get(params: &PlaylistParams, client: &SpotifyClient) -> CallToolResult {
        let Some(playlist_id) = params.playlist_id.as_deref() else {
            return error_result("The 'get' action requires a 'playlist_id' parameter");
        };
        let limit = validate_limit(params.limit);
        info!("Reading playlist {}", playlist_id);
        match client.playlist_items(playlist_id, limit).await {
            Ok(page) => success_result(Self::format_items(playlist_id, &page)),
            Err(e) => error_result(&format!("Failed to read playlist: {}", e)),
        }
    }

    async fn create(params: &PlaylistParams, client: &SpotifyClient) -> CallToolResult {
        let Some(name) = params.name.as_deref() else {
            return error_result("The 'create' action requires a 'name' parameter");
        };
        info!("Creating playlist '{}'", name);
        match client
            .create_playlist(name, params.description.as_deref(), params.public)
            .await
        {
            Ok(playlist) => success_result(format!(
                "Created playlist '{}' (id: {}, uri: {}).",
                playlist.name, playlist.id, playlist.uri
            )),
            Err(e) => error_result(&format!("Failed to create playlist: {}", e)),
        }
    }

    async fn add_tracks(params: &PlaylistParams, client: &SpotifyClient) -> CallToolResult {
        let Some(playlist_id) = params.playlist_id.as_deref() else {
            return error_result("The 'add_tracks' action requires a 'playlist_id' parameter");
        };
        if params.uris.is_empty() {
            return error_result("The 'add_tracks' action requires at least one entry in 'uris'");
        }
        info!("Adding {} track(s) to playlist {}", params.uris.len(), playlist_id);
        match client.add_items_to_playlist(playlist_id, &params.uris).await {
            Ok(()) => success_result(format!(
                "Added {} track(s) to playlist {}.",
                params.uris.len(),
                playlist_id
            )),
            Err(e) => error_result(&format!("Failed to add tracks: {}", e)),
        }
    }

    fn playlist_infos(page: Page<Playlist>) -> Vec<PlaylistInfo> {
        page.items
            .into_iter()
            .map(|p| PlaylistInfo {
                id: p.id,
                name: p.name,
                owner: p.owner.and_then(|o| o.display_name),
                tracks: p.tracks.map(|t| t.total),
                uri: p.uri,
            })
            .collect()
    }

    fn format_items(playlist_id: &str, page: &Page<PlaylistItem>) -> String {
        if page.items.is_empty() {
            return format!("Playlist {} has no tracks.", playlist_id);
        }

        let mut lines = match page.total {
            Some(total) => vec![format!(
                "Playlist {} — showing {} of {} track(s):",
                playlist_id,
                page.items.len(),
                total
            )],
            None => vec![format!("Playlist {} track(s):", playlist_id)],
        };

        for (index, item) in page.items.iter().enumerate() {
            match &item.track {
                Some(track) => lines.push(format!("{:2}. {}", index + 1, format_track_line(track))),
                None => lines.push(format!("{:2}. (unavailable)", index + 1)),
            }
        }

        lines.join("\n")
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PlaylistParams>(),
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
                let params: PlaylistParams =
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
    use crate::domains::spotify::models::{ArtistRef, PlaylistTracksRef, Track, UserRef};

    #[test]
    fn test_playlist_params_defaults() {
        let json = r#"{"action": "list"}"#;
        let params: PlaylistParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.limit, 10);
        assert!(!params.public);
        assert!(params.uris.is_empty());
    }

    #[test]
    fn test_playlist_infos_mapping() {
        let page = Page {
            items: vec![Playlist {
                id: "pl1".to_string(),
                name: "Road trip".to_string(),
                uri: "spotify:playlist:pl1".to_string(),
                description: None,
                public: Some(false),
                owner: Some(UserRef {
                    display_name: Some("alice".to_string()),
                }),
                tracks: Some(PlaylistTracksRef { total: 42 }),
            }],
            total: Some(1),
        };
        let infos = PlaylistTool::playlist_infos(page);
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].owner.as_deref(), Some("alice"));
        assert_eq!(infos[0].tracks, Some(42));
    }

    #[test]
    fn test_format_items_handles_unavailable_tracks() {
        let page = Page {
            items: vec![
                PlaylistItem {
                    track: Some(Track {
                        name: "Airbag".to_string(),
                        uri: "spotify:track:a".to_string(),
                        duration_ms: 284_000,
                        artists: vec![ArtistRef {
                            name: "Radiohead".to_string(),
                        }],
                        album: None,
                    }),
                },
                PlaylistItem { track: None },
            ],
            total: Some(2),
        };
        let text = PlaylistTool::format_items("pl1", &page);
        assert!(text.contains("1. Airbag"));
        assert!(text.contains("2. (unavailable)"));
    }
}
