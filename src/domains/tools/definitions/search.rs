//! Catalog search tool.
//!
//! Searches the Spotify catalog for tracks, albums, artists, or playlists
//! and returns a concise summary plus structured details.

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
use crate::domains::spotify::models::SearchResponse;

use super::common::{
    default_limit, error_result, format_duration, join_artists, structured_result, validate_limit,
};

/// Parameters for catalog search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// The search query string.
    #[schemars(description = "Search query (track title, artist name, album, ...)")]
    pub query: String,

    /// What to search for.
    #[schemars(description = "Result type: 'track', 'album', 'artist' or 'playlist'")]
    #[serde(default = "default_search_type")]
    pub search_type: String,

    /// Maximum number of results to return (default: 10, max: 50).
    #[schemars(description = "Maximum number of results (default: 10, max: 50)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_search_type() -> String {
    "track".to_string()
}

/// Structured output for track search results.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSearchInfo {
    pub name: String,
    pub artists: String,
    pub album: Option<String>,
    pub duration: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumSearchInfo {
    pub name: String,
    pub artists: String,
    pub release_date: Option<String>,
    pub total_tracks: Option<u32>,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistSearchInfo {
    pub name: String,
    pub genres: Vec<String>,
    pub followers: Option<u64>,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSearchInfo {
    pub name: String,
    pub owner: Option<String>,
    pub tracks: Option<u32>,
    pub uri: String,
}

/// Catalog search tool implementation.
#[derive(Debug, Clone)]
pub struct SearchTool;

impl SearchTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "spotify_search";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search the Spotify catalog for tracks, albums, artists or playlists. Returns a summary plus structured details with Spotify URIs usable by the playback and queue tools.";

    /// Execute the tool logic.
    pub async fn execute(params: &SearchParams, client: &SpotifyClient) -> CallToolResult {
        let search_type = params.search_type.to_lowercase();
        let limit = validate_limit(params.limit);

        if !matches!(search_type.as_str(), "track" | "album" | "artist" | "playlist") {
            return error_result(&format!(
                "Unknown search type: {}. Use 'track', 'album', 'artist' or 'playlist'",
                params.search_type
            ));
        }

        info!("Searching for {}s matching: {}", search_type, params.query);
        match client.search(&params.query, &search_type, limit).await {
            Ok(response) => Self::format_response(&params.query, &search_type, &response),
            Err(e) => error_result(&format!("Search failed: {}", e)),
        }
    }

    fn format_response(query: &str, search_type: &str, response: &SearchResponse) -> CallToolResult {
        match search_type {
            "track" => {
                let items = response.tracks.as_ref().map(|p| &p.items[..]).unwrap_or(&[]);
                if items.is_empty() {
                    return error_result(&format!("No tracks found for query: {}", query));
                }
                let infos: Vec<TrackSearchInfo> = items
                    .iter()
                    .map(|t| TrackSearchInfo {
                        name: t.name.clone(),
                        artists: join_artists(&t.artists),
                        album: t.album.as_ref().map(|a| a.name.clone()),
                        duration: format_duration(t.duration_ms),
                        uri: t.uri.clone(),
                    })
                    .collect();
                structured_result(
                    format!("Found {} track(s) matching '{}'", infos.len(), query),
                    infos,
                )
            }
            "album" => {
                let items = response.albums.as_ref().map(|p| &p.items[..]).unwrap_or(&[]);
                if items.is_empty() {
                    return error_result(&format!("No albums found for query: {}", query));
                }
                let infos: Vec<AlbumSearchInfo> = items
                    .iter()
                    .map(|a| AlbumSearchInfo {
                        name: a.name.clone(),
                        artists: join_artists(&a.artists),
                        release_date: a.release_date.clone(),
                        total_tracks: a.total_tracks,
                        uri: a.uri.clone(),
                    })
                    .collect();
                structured_result(
                    format!("Found {} album(s) matching '{}'", infos.len(), query),
                    infos,
                )
            }
            "artist" => {
                let items = response.artists.as_ref().map(|p| &p.items[..]).unwrap_or(&[]);
                if items.is_empty() {
                    return error_result(&format!("No artists found for query: {}", query));
                }
                let infos: Vec<ArtistSearchInfo> = items
                    .iter()
                    .map(|a| ArtistSearchInfo {
                        name: a.name.clone(),
                        genres: a.genres.clone(),
                        followers: a.followers.as_ref().map(|f| f.total),
                        uri: a.uri.clone(),
                    })
                    .collect();
                structured_result(
                    format!("Found {} artist(s) matching '{}'", infos.len(), query),
                    infos,
                )
            }
            _ => {
                let items = response
                    .playlists
                    .as_ref()
                    .map(|p| &p.items[..])
                    .unwrap_or(&[]);
                if items.is_empty() {
                    return error_result(&format!("No playlists found for query: {}", query));
                }
                let infos: Vec<PlaylistSearchInfo> = items
                    .iter()
                    .map(|p| PlaylistSearchInfo {
                        name: p.name.clone(),
                        owner: p.owner.as_ref().and_then(|o| o.display_name.clone()),
                        tracks: p.tracks.as_ref().map(|t| t.total),
                        uri: p.uri.clone(),
                    })
                    .collect();
                structured_result(
                    format!("Found {} playlist(s) matching '{}'", infos.len(), query),
                    infos,
                )
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchParams>(),
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
                let params: SearchParams = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}
