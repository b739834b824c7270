//! Persistence of the installation's owner scope.
//!
//! An owner scope is generated once per installation and reused for every
//! later key. Stores are synchronous: the value is a few bytes and is read
//! once at startup.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use cloudstate_model::{OWNER_SCOPE_LEN, generate_owner_scope};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StateError, StateResult};

/// Where an owner scope is kept between runs.
pub trait OwnerScopeStore: Send + Sync {
    /// Load the stored scope, if one was saved.
    fn load(&self) -> StateResult<Option<String>>;

    /// Persist `scope`, replacing any earlier value.
    fn save(&self, scope: &str) -> StateResult<()>;
}

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryOwnerScopeStore {
    scope: Mutex<Option<String>>,
}

impl MemoryOwnerScopeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OwnerScopeStore for MemoryOwnerScopeStore {
    fn load(&self) -> StateResult<Option<String>> {
        Ok(self.scope.lock().clone())
    }

    fn save(&self, scope: &str) -> StateResult<()> {
        *self.scope.lock() = Some(scope.to_owned());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerScopeRecord {
    owner_scope: String,
}

/// JSON file store, e.g. `.cloudstate/owner_scope.json`.
#[derive(Debug, Clone)]
pub struct FileOwnerScopeStore {
    path: PathBuf,
}

impl FileOwnerScopeStore {
    /// Create a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OwnerScopeStore for FileOwnerScopeStore {
    fn load(&self) -> StateResult<Option<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StateError::Store(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let record: OwnerScopeRecord = serde_json::from_str(&raw).map_err(|e| {
            StateError::Store(format!("invalid owner scope file {}: {e}", self.path.display()))
        })?;
        Ok(Some(record.owner_scope))
    }

    fn save(&self, scope: &str) -> StateResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StateError::Store(format!("failed to create {}: {e}", parent.display()))
                })?;
            }
        }

        let record = OwnerScopeRecord {
            owner_scope: scope.to_owned(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&self.path, json).map_err(|e| {
            StateError::Store(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

/// Return the stored scope, or generate one from `now` and persist it.
///
/// An empty or blank stored value counts as absent. Any other value that is
/// not exactly six characters long is rejected, as replacing it would orphan
/// every key written under the old scope.
pub fn resolve_owner_scope(store: &dyn OwnerScopeStore, now: DateTime<Utc>) -> StateResult<String> {
    let stored = store.load()?.filter(|scope| !scope.trim().is_empty());
    if let Some(scope) = stored {
        if scope.chars().count() != OWNER_SCOPE_LEN {
            return Err(StateError::Store(format!(
                "stored owner scope {scope:?} is not {OWNER_SCOPE_LEN} characters"
            )));
        }
        debug!(owner_scope = %scope, "Loaded owner scope");
        return Ok(scope);
    }

    let scope = generate_owner_scope(now);
    store.save(&scope)?;
    info!(owner_scope = %scope, "Generated new owner scope");
    Ok(scope)
}
