//! Session context for the signed-in back-office user.
//!
//! Loaded once at startup, persisted as JSON next to the binary's working
//! directory, and cleared on logout. It is handed explicitly to whatever
//! needs to gate on it; there is no process-wide store.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What is persisted for a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Payload handed over by the login flow, stored as-is.
    pub user: serde_json::Value,
    pub logged_in_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SessionContext {
    path: PathBuf,
    current: Option<Session>,
}

impl SessionContext {
    /// Load the persisted session. A missing file means logged out.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let current = match std::fs::read_to_string(&path) {
            Ok(raw) => Some(serde_json::from_str(&raw).map_err(|source| {
                SessionError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), logged_in = current.is_some(), "Session loaded");
        Ok(Self { path, current })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Auth gate: the session, or [`SessionError::NotLoggedIn`].
    pub fn require(&self) -> Result<&Session, SessionError> {
        self.current.as_ref().ok_or(SessionError::NotLoggedIn)
    }

    /// Record a login and persist it.
    pub fn login(&mut self, user: serde_json::Value) -> Result<&Session, SessionError> {
        let session = Session {
            user,
            logged_in_at: Utc::now(),
        };
        let raw = serde_json::to_string_pretty(&session).map_err(|source| {
            SessionError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, raw).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "Logged in");
        Ok(self.current.insert(session))
    }

    /// Forget the session and remove the persisted copy.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.current = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        tracing::info!("Logged out");
        Ok(())
    }
}
