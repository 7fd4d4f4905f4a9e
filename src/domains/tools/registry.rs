//! Tool Registry - central catalog of all available tools.
//!
//! The single source of truth for tool names and metadata; the router and the
//! server info both derive from it.

use rmcp::model::Tool;

use super::definitions::{
    NowPlayingTool, PlaybackTool, PlaylistTool, QueueTool, RecentlyPlayedTool, SearchTool,
};

/// Tool registry - lists all available tools.
pub struct ToolRegistry;

impl ToolRegistry {
    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        vec![
            NowPlayingTool::NAME,
            PlaybackTool::NAME,
            PlaylistTool::NAME,
            QueueTool::NAME,
            RecentlyPlayedTool::NAME,
            SearchTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            NowPlayingTool::to_tool(),
            PlaybackTool::to_tool(),
            PlaylistTool::to_tool(),
            QueueTool::to_tool(),
            RecentlyPlayedTool::to_tool(),
            SearchTool::to_tool(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_tool_names() {
        let names = ToolRegistry::tool_names();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"spotify_search"));
        assert!(names.contains(&"spotify_now_playing"));
        assert!(names.contains(&"spotify_playback"));
        assert!(names.contains(&"spotify_queue"));
        assert!(names.contains(&"spotify_playlists"));
        assert!(names.contains(&"spotify_recently_played"));
    }

    #[test]
    fn test_registry_metadata_has_descriptions() {
        for tool in ToolRegistry::get_all_tools() {
            assert!(tool.description.is_some(), "{} lacks a description", tool.name);
        }
    }
}
