//! Persisted login session.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionData {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    emergency: bool,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Process-wide session shared as `Arc<SessionStore>`.
///
/// The file is read once when opened; every write goes straight back to it.
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    emergency_bypass: bool,
    data: RwLock<SessionData>,
}

impl SessionStore {
    /// Load the session at `path`. A missing or unreadable file yields an
    /// empty session.
    pub fn open(path: impl AsRef<Path>, emergency_bypass: bool) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<SessionData>(&content) {
                Ok(data) => {
                    debug!(path = %path.display(), "Loaded session");
                    data
                }
                Err(e) => {
                    warn!(path = %path.display(), "Ignoring unreadable session file: {}", e);
                    SessionData::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No session file, starting signed out");
                SessionData::default()
            }
            Err(e) => {
                warn!(path = %path.display(), "Failed to read session file: {}", e);
                SessionData::default()
            }
        };

        Self {
            path: Some(path),
            emergency_bypass,
            data: RwLock::new(data),
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory(emergency_bypass: bool) -> Self {
        Self {
            path: None,
            emergency_bypass,
            data: RwLock::new(SessionData::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionData> {
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_emergency(&self) -> bool {
        self.read().emergency
    }

    pub fn emergency_bypass(&self) -> bool {
        self.emergency_bypass
    }

    /// A token is held, or emergency access was granted and bypass is on.
    pub fn is_authenticated(&self) -> bool {
        let data = self.read();
        data.token.is_some() || (self.emergency_bypass && data.emergency)
    }

    pub fn set_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let mut data = self.write();
        data.token = Some(token.into());
        data.updated_at = Some(Utc::now());
        self.persist(&data)
    }

    pub fn grant_emergency(&self) -> Result<(), SessionError> {
        let mut data = self.write();
        data.emergency = true;
        data.updated_at = Some(Utc::now());
        self.persist(&data)
    }

    /// Forget token and emergency flag, and delete the session file.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut data = self.write();
        *data = SessionData::default();

        let Some(path) = &self.path else {
            return Ok(());
        };
        match std::fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: path.clone(),
                source,
            }),
        }
    }

    fn persist(&self, data: &SessionData) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(path, content).map_err(|source| SessionError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"), true);
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_token_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path, true);
        store.set_token("abc123").unwrap();
        assert!(store.is_authenticated());

        let reopened = SessionStore::open(&path, true);
        assert_eq!(reopened.token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_emergency_requires_bypass() {
        let with_bypass = SessionStore::in_memory(true);
        with_bypass.grant_emergency().unwrap();
        assert!(with_bypass.is_emergency());
        assert!(with_bypass.is_authenticated());

        let without_bypass = SessionStore::in_memory(false);
        without_bypass.grant_emergency().unwrap();
        assert!(!without_bypass.is_authenticated());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path, true);
        store.set_token("abc123").unwrap();
        store.grant_emergency().unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(store.token().is_none());
        assert!(!store.is_emergency());

        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = SessionStore::open(&path, true);
        assert!(!store.is_authenticated());
    }
}
