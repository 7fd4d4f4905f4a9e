//! Spotify Web API domain.
//!
//! A thin typed client over the endpoints the tool catalog proxies, plus the
//! wire models for their replies. Authentication is delegated entirely to the
//! credential manager in `core::auth`.

mod client;
mod error;
pub mod models;

pub use client::SpotifyClient;
pub use error::SpotifyError;
