//! Common utilities shared across Spotify tools.
//!
//! This module provides shared functionality like result formatting,
//! limit validation, and display helpers for tracks and artists.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

use crate::domains::spotify::models::{ArtistRef, Track};

/// Spotify caps most collection endpoints at 50 items per request.
const MAX_LIMIT: usize = 50;

/// Default limit for listing results.
pub fn default_limit() -> usize {
    10
}

/// Validate and clamp limit to the allowed range (1-50).
pub fn validate_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_LIMIT)
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Create a success result with a summary line followed by a JSON payload.
pub fn structured_result<T: Serialize>(summary: String, data: T) -> CallToolResult {
    let payload = serde_json::to_string_pretty(&data)
        .unwrap_or_else(|e| format!("<serialization failed: {}>", e));
    CallToolResult::success(vec![Content::text(format!("{}\n\n{}", summary, payload))])
}

/// Format a duration in milliseconds to MM:SS format.
pub fn format_duration(length_ms: u64) -> String {
    let duration_secs = length_ms / 1000;
    let minutes = duration_secs / 60;
    let seconds = duration_secs % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Join artist credits for display.
pub fn join_artists(artists: &[ArtistRef]) -> String {
    if artists.is_empty() {
        return "Unknown Artist".to_string();
    }
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line display form of a track.
pub fn format_track_line(track: &Track) -> String {
    format!(
        "{} — {} ({})",
        track.name,
        join_artists(&track.artists),
        format_duration(track.duration_ms)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str, artist: &str, duration_ms: u64) -> Track {
        Track {
            name: name.to_string(),
            uri: format!("spotify:track:{}", name),
            duration_ms,
            artists: vec![ArtistRef {
                name: artist.to_string(),
            }],
            album: None,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(180000), "3:00");
        assert_eq!(format_duration(245000), "4:05");
        assert_eq!(format_duration(61000), "1:01");
        assert_eq!(format_duration(59000), "0:59");
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(10), 10);
        assert_eq!(validate_limit(0), 1);
        assert_eq!(validate_limit(200), 50);
        assert_eq!(validate_limit(50), 50);
    }

    #[test]
    fn test_join_artists() {
        assert_eq!(join_artists(&[]), "Unknown Artist");
        let artists = vec![
            ArtistRef {
                name: "Daft Punk".to_string(),
            },
            ArtistRef {
                name: "Pharrell Williams".to_string(),
            },
        ];
        assert_eq!(join_artists(&artists), "Daft Punk, Pharrell Williams");
    }

    #[test]
    fn test_format_track_line() {
        let t = track("Get Lucky", "Daft Punk", 248000);
        assert_eq!(format_track_line(&t), "Get Lucky — Daft Punk (4:08)");
    }

    #[test]
    fn test_structured_result_contains_summary_and_payload() {
        let result = structured_result(
            "Found 1 track".to_string(),
            serde_json::json!({"tracks": ["Get Lucky"]}),
        );
        assert!(!result.is_error.unwrap_or(true));
        if let rmcp::model::RawContent::Text(text) = &result.content[0].raw {
            assert!(text.text.starts_with("Found 1 track"));
            assert!(text.text.contains("Get Lucky"));
        } else {
            panic!("expected text content");
        }
    }
}
