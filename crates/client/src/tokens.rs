//! Credential pair storage
//!
//! Holds the access/refresh pair with independent lifetimes: one hour for
//! the access credential, seven days for the refresh credential. Expiry is
//! enforced here, by the storage layer — a read past the recorded
//! expiration yields `None`, the same as never having stored a value. No
//! other code path checks token age.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

fn access_ttl() -> Duration {
    Duration::hours(1)
}

fn refresh_ttl() -> Duration {
    Duration::days(7)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTokens {
    access: String,
    access_expires_at: DateTime<Utc>,
    refresh: String,
    refresh_expires_at: DateTime<Utc>,
}

/// Durable storage for the credential pair.
///
/// At most one pair exists at a time; writing a new pair fully replaces
/// the old one. The store is constructed explicitly and shared by handle
/// with whatever needs it.
#[derive(Debug)]
pub struct TokenStore {
    path: Option<PathBuf>,
    state: Mutex<Option<StoredTokens>>,
}

impl TokenStore {
    /// Open a store backed by a state file, loading whatever it holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load_state(&path);
        Self {
            path: Some(path),
            state: Mutex::new(state),
        }
    }

    /// Ephemeral store for sessions that should not outlive the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(None),
        }
    }

    /// Current access credential; `None` once its hour is up.
    pub fn access(&self) -> Option<String> {
        let state = self.state.lock().expect("token store lock poisoned");
        state
            .as_ref()
            .filter(|stored| stored.access_expires_at > Utc::now())
            .map(|stored| stored.access.clone())
    }

    /// Current refresh credential; `None` once its week is up.
    pub fn refresh(&self) -> Option<String> {
        let state = self.state.lock().expect("token store lock poisoned");
        state
            .as_ref()
            .filter(|stored| stored.refresh_expires_at > Utc::now())
            .map(|stored| stored.refresh.clone())
    }

    /// Replace the credential pair, restamping both lifetimes.
    pub fn set_tokens(&self, access: &str, refresh: &str) {
        let now = Utc::now();
        let stored = StoredTokens {
            access: access.to_string(),
            access_expires_at: now + access_ttl(),
            refresh: refresh.to_string(),
            refresh_expires_at: now + refresh_ttl(),
        };

        let mut state = self.state.lock().expect("token store lock poisoned");
        self.persist(Some(&stored));
        *state = Some(stored);
    }

    /// Remove both credentials. Clearing an empty store is not an error.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("token store lock poisoned");
        *state = None;
        self.persist(None);
    }

    fn persist(&self, stored: Option<&StoredTokens>) {
        let Some(path) = &self.path else { return };

        let result = match stored {
            Some(stored) => write_state(path, stored),
            None => match fs::remove_file(path) {
                Err(error) if error.kind() != std::io::ErrorKind::NotFound => Err(error),
                _ => Ok(()),
            },
        };

        if let Err(error) = result {
            // The in-memory pair stays authoritative for this session.
            warn!("failed to persist token state to {}: {error}", path.display());
        }
    }
}

fn load_state(path: &Path) -> Option<StoredTokens> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<StoredTokens>(&content) {
        Ok(stored)
            if stored.access_expires_at > Utc::now() || stored.refresh_expires_at > Utc::now() =>
        {
            Some(stored)
        }
        Ok(_) => {
            debug!("stored credentials expired, ignoring {}", path.display());
            None
        }
        Err(error) => {
            warn!("unreadable token state at {}: {error}", path.display());
            None
        }
    }
}

fn write_state(path: &Path, stored: &StoredTokens) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(stored).map_err(std::io::Error::other)?;
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_by_default() {
        let store = TokenStore::in_memory();
        assert_eq!(store.access(), None);
        assert_eq!(store.refresh(), None);
    }

    #[test]
    fn set_then_read_back() {
        let store = TokenStore::in_memory();
        store.set_tokens("acc", "ref");
        assert_eq!(store.access().as_deref(), Some("acc"));
        assert_eq!(store.refresh().as_deref(), Some("ref"));
    }

    #[test]
    fn new_pair_fully_replaces_the_old_one() {
        let store = TokenStore::in_memory();
        store.set_tokens("acc-1", "ref-1");
        store.set_tokens("acc-2", "ref-2");
        assert_eq!(store.access().as_deref(), Some("acc-2"));
        assert_eq!(store.refresh().as_deref(), Some("ref-2"));
    }

    #[test]
    fn clear_is_idempotent() {
        let store = TokenStore::in_memory();
        store.set_tokens("acc", "ref");
        store.clear();
        store.clear();
        assert_eq!(store.access(), None);
        assert_eq!(store.refresh(), None);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = TokenStore::open(&path);
        store.set_tokens("acc", "ref");
        drop(store);

        let reopened = TokenStore::open(&path);
        assert_eq!(reopened.access().as_deref(), Some("acc"));
        assert_eq!(reopened.refresh().as_deref(), Some("ref"));
    }

    #[test]
    fn clear_removes_the_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = TokenStore::open(&path);
        store.set_tokens("acc", "ref");
        store.clear();
        assert!(!path.exists());

        let reopened = TokenStore::open(&path);
        assert_eq!(reopened.access(), None);
    }

    #[test]
    fn expired_access_reads_as_absent_while_refresh_survives() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let now = Utc::now();
        let stored = StoredTokens {
            access: "acc".to_string(),
            access_expires_at: now - Duration::minutes(5),
            refresh: "ref".to_string(),
            refresh_expires_at: now + Duration::days(6),
        };
        write_state(&path, &stored).unwrap();

        let store = TokenStore::open(&path);
        assert_eq!(store.access(), None);
        assert_eq!(store.refresh().as_deref(), Some("ref"));
    }

    #[test]
    fn fully_expired_state_is_ignored_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let now = Utc::now();
        let stored = StoredTokens {
            access: "acc".to_string(),
            access_expires_at: now - Duration::hours(2),
            refresh: "ref".to_string(),
            refresh_expires_at: now - Duration::hours(1),
        };
        write_state(&path, &stored).unwrap();

        let store = TokenStore::open(&path);
        assert_eq!(store.access(), None);
        assert_eq!(store.refresh(), None);
    }

    #[test]
    fn garbage_state_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "not json").unwrap();

        let store = TokenStore::open(&path);
        assert_eq!(store.access(), None);
        assert_eq!(store.refresh(), None);
    }
}
