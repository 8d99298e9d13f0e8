//! Session-scoped persistence of the form state
//!
//! The form keeps one JSON document per session. A missing document is a new
//! session and loads as empty state; a document that fails to decode is
//! logged and treated the same way so the applicant can keep going.

use super::FormState;
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Session key the form has always stored its state under
pub const DEFAULT_SESSION_KEY: &str = "financialAidFormState";

/// Persistence for one session's form state
pub trait StateStore {
    /// Current state; empty on first load
    fn load(&self) -> Result<FormState, StoreError>;

    /// Replace the stored state
    fn save(&mut self, state: &FormState) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<FormState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<FormState, StoreError> {
        Ok(self.state.clone().unwrap_or_default())
    }

    fn save(&mut self, state: &FormState) -> Result<(), StoreError> {
        self.state = Some(state.clone());
        Ok(())
    }
}

/// On-disk document for one session
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    session: String,
    updated_at: DateTime<Utc>,
    state: FormState,
}

/// One JSON file per session under a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    session: String,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, session: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            session: session.into(),
        }
    }

    /// Store for the default session key
    pub fn default_session(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_SESSION_KEY)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.session))
    }

    /// When the session was last saved, if it ever was
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        let contents = fs::read_to_string(self.path()).ok()?;
        serde_json::from_str::<StoredSession>(&contents)
            .ok()
            .map(|doc| doc.updated_at)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<FormState, StoreError> {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no stored state for session {}, starting empty", self.session);
                return Ok(FormState::new());
            }
            Err(e) => return Err(Self::io_error(&path, e)),
        };

        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(doc) => Ok(doc.state),
            Err(e) => {
                log::warn!("discarding unreadable session state {}: {}", path.display(), e);
                Ok(FormState::new())
            }
        }
    }

    fn save(&mut self, state: &FormState) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
        let doc = StoredSession {
            session: self.session.clone(),
            updated_at: Utc::now(),
            state: state.clone(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        let path = self.path();
        fs::write(&path, json).map_err(|e| Self::io_error(&path, e))
    }
}
