//! Wire models for the subset of the Spotify Web API the tool catalog uses.
//!
//! Only the fields the tools format are declared; everything else in the API
//! replies is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Offset-paged collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    #[serde(default)]
    pub total: Option<u32>,
}

/// Cursor-paged collection (play history).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,

    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,

    #[serde(default)]
    pub duration_ms: u64,

    #[serde(default)]
    pub artists: Vec<ArtistRef>,

    #[serde(default)]
    pub album: Option<AlbumRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub uri: String,

    #[serde(default)]
    pub release_date: Option<String>,

    #[serde(default)]
    pub total_tracks: Option<u32>,

    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub uri: String,

    #[serde(default)]
    pub genres: Vec<String>,

    #[serde(default)]
    pub followers: Option<Followers>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub uri: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub public: Option<bool>,

    #[serde(default)]
    pub owner: Option<UserRef>,

    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
}

/// One entry of a playlist's item listing; `track` is null for episodes
/// removed from the market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<Track>,
}

/// `GET /search` reply; only the sections matching the requested types are
/// present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<Page<Track>>,

    #[serde(default)]
    pub albums: Option<Page<Album>>,

    #[serde(default)]
    pub artists: Option<Page<Artist>>,

    #[serde(default)]
    pub playlists: Option<Page<Playlist>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub volume_percent: Option<u8>,
}

/// `GET /me/player` reply; the endpoint answers 204 with no body when nothing
/// is playing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackState {
    #[serde(default)]
    pub device: Option<Device>,

    #[serde(default)]
    pub is_playing: bool,

    #[serde(default)]
    pub progress_ms: Option<u64>,

    #[serde(default)]
    pub item: Option<Track>,

    #[serde(default)]
    pub shuffle_state: Option<bool>,

    #[serde(default)]
    pub repeat_state: Option<String>,
}

/// `GET /me/player/queue` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueResponse {
    #[serde(default)]
    pub currently_playing: Option<Track>,

    #[serde(default = "Vec::new")]
    pub queue: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    pub track: Track,

    #[serde(default)]
    pub played_at: Option<String>,
}

/// `GET /me` reply, used to resolve the user id for playlist creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateUser {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parses_partial_sections() {
        let json = r#"{
            "tracks": {
                "items": [{
                    "name": "Karma Police",
                    "uri": "spotify:track:63OQupATfueTdZMWTxW03A",
                    "duration_ms": 264066,
                    "artists": [{"name": "Radiohead"}],
                    "album": {"name": "OK Computer", "release_date": "1997-06-16"}
                }],
                "total": 1
            }
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let tracks = response.tracks.unwrap();
        assert_eq!(tracks.items.len(), 1);
        assert_eq!(tracks.items[0].artists[0].name, "Radiohead");
        assert!(response.albums.is_none());
    }

    #[test]
    fn test_playback_state_tolerates_missing_fields() {
        let json = r#"{"is_playing": true}"#;
        let state: PlaybackState = serde_json::from_str(json).unwrap();
        assert!(state.is_playing);
        assert!(state.item.is_none());
        assert!(state.device.is_none());
    }

    #[test]
    fn test_playlist_item_with_null_track() {
        let json = r#"{"track": null}"#;
        let item: PlaylistItem = serde_json::from_str(json).unwrap();
        assert!(item.track.is_none());
    }

    #[test]
    fn test_queue_response_defaults_to_empty() {
        let json = r#"{}"#;
        let queue: QueueResponse = serde_json::from_str(json).unwrap();
        assert!(queue.queue.is_empty());
        assert!(queue.currently_playing.is_none());
    }
}
