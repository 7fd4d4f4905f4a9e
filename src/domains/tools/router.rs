//! Tool Router - builds the rmcp ToolRouter from the definitions.
//!
//! Each tool knows how to create its own route; this module only wires them
//! together around the shared API client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::spotify::SpotifyClient;

use super::definitions::{
    NowPlayingTool, PlaybackTool, PlaylistTool, QueueTool, RecentlyPlayedTool, SearchTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<SpotifyClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(NowPlayingTool::create_route(client.clone()))
        .with_route(PlaybackTool::create_route(client.clone()))
        .with_route(PlaylistTool::create_route(client.clone()))
        .with_route(QueueTool::create_route(client.clone()))
        .with_route(RecentlyPlayedTool::create_route(client.clone()))
        .with_route(SearchTool::create_route(client))
}
