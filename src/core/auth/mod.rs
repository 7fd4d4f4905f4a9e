//! Credential lifecycle management.
//!
//! The one subsystem with real state: acquiring an OAuth2 access/refresh
//! token pair, persisting it, detecting staleness, transparently refreshing
//! before use, and handling refresh failure.
//!
//! ## Architecture
//!
//! - `record.rs` - the persisted credential record and its expiry/rotation logic
//! - `store.rs` - atomic JSON persistence, the single source of truth
//! - `refresher.rs` - the token endpoint exchange behind a trait seam
//! - `manager.rs` - the façade every tool call goes through for a valid token
//! - `bootstrap.rs` - the one-time authorization-code exchange
//! - `error.rs` - the error taxonomy callers dispatch on

mod bootstrap;
mod error;
mod manager;
mod record;
mod refresher;
mod store;

pub use bootstrap::{AuthBootstrapper, DEFAULT_AUTHORIZE_URL, SCOPES};
pub use error::{AuthError, AuthResult};
pub use manager::{CredentialManager, EXPIRY_SKEW_MS};
pub use record::{ClientIdentity, CredentialRecord};
pub use refresher::{
    DEFAULT_TOKEN_URL, HttpTokenEndpoint, RefreshError, TokenEndpoint, TokenGrant,
};
pub use store::CredentialStore;
