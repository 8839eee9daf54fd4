//! Versioned on-disk persistence for listening profiles.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::models::UserProfile;

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("invalid username: {0}")]
    InvalidUsername(String),
    #[error("profile store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only store of profile snapshots, one history per username.
pub trait ProfileStore: Send + Sync {
    /// Appends a snapshot to the user's history.
    fn save(&self, profile: &UserProfile) -> Result<(), ProfileStoreError>;

    /// Full history for a user, oldest first.
    /// Returns `Ok(None)` if no history exists. Never invents an empty one.
    fn load(&self, username: &str) -> Result<Option<Vec<UserProfile>>, ProfileStoreError>;

    /// Most recent snapshot for a user, `Ok(None)` if none exists.
    fn load_latest(&self, username: &str) -> Result<Option<UserProfile>, ProfileStoreError> {
        Ok(self.load(username)?.and_then(|mut history| history.pop()))
    }
}

/// File-backed [`ProfileStore`]: one JSON array per username.
///
/// Unreadable content is treated as an empty history and overwritten on the
/// next save. That loses the corrupt history, which beats refusing to ever
/// save again for that user.
pub struct JsonProfileStore {
    dir: PathBuf,
    // Serializes read-modify-append per username. Distinct users don't block
    // each other.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl JsonProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn user_lock(&self, username: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(username.to_string()).or_default().clone()
    }

    fn profile_path(&self, username: &str) -> Result<PathBuf, ProfileStoreError> {
        validate_username(username)?;
        Ok(self.dir.join(format!("{username}.json")))
    }

    /// Reads a user's history. Missing file means empty, corrupt file means
    /// empty with a warning.
    fn read_history(&self, username: &str) -> Result<Vec<UserProfile>, ProfileStoreError> {
        let path = self.profile_path(username)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(history) => Ok(history),
            Err(e) => {
                warn!(
                    username,
                    path = %path.display(),
                    "unreadable profile history, starting over: {e}"
                );
                Ok(Vec::new())
            }
        }
    }
}

impl ProfileStore for JsonProfileStore {
    fn save(&self, profile: &UserProfile) -> Result<(), ProfileStoreError> {
        let path = self.profile_path(&profile.username)?;
        let lock = self.user_lock(&profile.username);
        let _guard = lock.lock().unwrap();

        let mut history = self.read_history(&profile.username)?;
        history.push(profile.clone());
        let json = serde_json::to_string_pretty(&history)?;
        fs::write(&path, json)?;
        debug!(
            username = %profile.username,
            versions = history.len(),
            "profile snapshot saved"
        );
        Ok(())
    }

    fn load(&self, username: &str) -> Result<Option<Vec<UserProfile>>, ProfileStoreError> {
        let path = self.profile_path(username)?;
        let lock = self.user_lock(username);
        let _guard = lock.lock().unwrap();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Vec<UserProfile>>(&content) {
            Ok(history) if history.is_empty() => Ok(None),
            Ok(history) => Ok(Some(history)),
            Err(e) => {
                warn!(
                    username,
                    path = %path.display(),
                    "unreadable profile history, treating as absent: {e}"
                );
                Ok(None)
            }
        }
    }
}

fn validate_username(username: &str) -> Result<(), ProfileStoreError> {
    if username.trim().is_empty() {
        return Err(ProfileStoreError::InvalidUsername(
            "username must not be empty".to_string(),
        ));
    }
    // The username becomes a file name.
    if username.contains('/') || username.contains('\\') || username.contains("..") {
        return Err(ProfileStoreError::InvalidUsername(format!(
            "username contains path separators: {username}"
        )));
    }
    Ok(())
}
