//! Durable storage for the credential record.
//!
//! The store reads the record at the start of every operation and persists it
//! after any mutation. There is no in-memory caching across calls: every
//! `load` reflects the latest durable state, so multiple process instances
//! sharing the same file stay consistent modulo the documented cross-process
//! refresh race.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{AuthError, AuthResult};
use super::record::{ClientIdentity, CredentialRecord};

/// File-backed credential store holding one JSON document.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,

    /// Identity from configuration, used to seed an identity-only record when
    /// no document exists yet.
    identity: Option<ClientIdentity>,
}

impl CredentialStore {
    /// Create a store over the given document path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            identity: None,
        }
    }

    /// Create a store that can seed a fresh record from configured identity.
    pub fn with_identity(path: impl Into<PathBuf>, identity: ClientIdentity) -> Self {
        Self {
            path: path.into(),
            identity: Some(identity),
        }
    }

    /// Path of the persisted document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the credential record from durable storage.
    ///
    /// A missing document falls back to an identity-only record when identity
    /// is available from configuration; otherwise the caller must supply
    /// configuration first (`ConfigMissing`). A document with no identity
    /// fields at all is also `ConfigMissing`.
    pub fn load(&self) -> AuthResult<CredentialRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no credentials file at {:?}", self.path);
                return match &self.identity {
                    Some(identity) => Ok(CredentialRecord::from_identity(identity.clone())),
                    None => Err(AuthError::ConfigMissing),
                };
            }
            Err(err) => {
                return Err(AuthError::persistence(format!(
                    "failed to read {:?}: {}",
                    self.path, err
                )));
            }
        };

        let record: CredentialRecord = serde_json::from_str(&raw).map_err(|err| {
            AuthError::persistence(format!("failed to parse {:?}: {}", self.path, err))
        })?;

        if !record.has_identity() {
            return Err(AuthError::ConfigMissing);
        }

        Ok(record)
    }

    /// Persist the full record.
    ///
    /// The document is written to a sibling temp file and renamed into place
    /// so a concurrent reader never observes a half-written document. On Unix
    /// the file is restricted to owner read/write.
    pub fn save(&self, record: &CredentialRecord) -> AuthResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| {
                AuthError::persistence(format!("failed to create {:?}: {}", parent, err))
            })?;
        }

        let serialized = serde_json::to_string_pretty(record)
            .map_err(|err| AuthError::persistence(format!("failed to serialize record: {}", err)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized).map_err(|err| {
            AuthError::persistence(format!("failed to write {:?}: {}", tmp_path, err))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600)).map_err(|err| {
                AuthError::persistence(format!("failed to set permissions on {:?}: {}", tmp_path, err))
            })?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|err| {
            AuthError::persistence(format!(
                "failed to move {:?} into place: {}",
                tmp_path, err
            ))
        })?;

        debug!("credentials saved to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn identity() -> ClientIdentity {
        ClientIdentity {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        }
    }

    fn temp_store() -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::with_identity(dir.path().join("credentials.json"), identity());
        (dir, store)
    }

    #[test]
    fn test_missing_file_seeds_identity_only_record() {
        let (_dir, store) = temp_store();
        let record = store.load().unwrap();
        assert!(record.has_identity());
        assert!(!record.is_bootstrapped());
    }

    #[test]
    fn test_missing_file_without_identity_is_config_missing() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        assert!(matches!(store.load(), Err(AuthError::ConfigMissing)));
    }

    #[test]
    fn test_document_without_identity_is_config_missing() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "{}").unwrap();
        assert!(matches!(store.load(), Err(AuthError::ConfigMissing)));
    }

    #[test]
    fn test_corrupt_document_is_persistence_error() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(AuthError::Persistence(_))));
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = temp_store();
        let mut record = store.load().unwrap();
        record.access_token = Some("A1".to_string());
        record.refresh_token = Some("R1".to_string());
        record.expires_at = Some(12345);
        store.save(&record).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token.as_deref(), Some("A1"));
        assert_eq!(loaded.refresh_token.as_deref(), Some("R1"));
        assert_eq!(loaded.expires_at, Some(12345));
    }

    #[test]
    fn test_save_leaves_no_temp_file_behind() {
        let (_dir, store) = temp_store();
        let record = store.load().unwrap();
        store.save(&record).unwrap();
        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_saved_document_is_human_inspectable_json() {
        let (_dir, store) = temp_store();
        let mut record = store.load().unwrap();
        record.access_token = Some("A1".to_string());
        store.save(&record).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"clientId\""));
        assert!(raw.contains("\"accessToken\""));
        // Pretty-printed, one field per line.
        assert!(raw.lines().count() > 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_document_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        let record = store.load().unwrap();
        store.save(&record).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
