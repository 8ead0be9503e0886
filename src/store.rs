//! Snapshot store
//!
//! Loads snapshot documents from disk on first request and memoizes them
//! for the lifetime of the store. Snapshots are immutable once published,
//! so they are handed out behind `Arc` and may be read freely; the store
//! itself is single-threaded (callers wanting concurrent population must
//! wrap it in their own mutual exclusion).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, TimelineError};
use crate::snapshot::Snapshot;

/// Placeholder substituted with the release identifier in the filename pattern
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Memoizing loader for snapshot documents
pub struct SnapshotStore {
    root: PathBuf,
    pattern: String,
    cache: HashMap<String, Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Open a store rooted at the given directory, using the default
    /// filename pattern
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::with_config(&StoreConfig {
            root: root.as_ref().to_path_buf(),
            ..StoreConfig::default()
        })
    }

    /// Open a store from configuration
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            root: config.root.clone(),
            pattern: config.pattern.clone(),
            cache: HashMap::new(),
        }
    }

    /// Path of the backing document for a release identifier
    pub fn document_path(&self, version: &str) -> PathBuf {
        self.root.join(self.pattern.replace(VERSION_PLACEHOLDER, version))
    }

    /// Load the snapshot for a release identifier
    ///
    /// The first call reads and parses the backing document; subsequent
    /// calls return the cached snapshot. A missing or unreadable document
    /// is fatal and is not retried.
    pub fn load(&mut self, version: &str) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.cache.get(version) {
            debug!(version, "snapshot cache hit");
            return Ok(Arc::clone(snapshot));
        }

        let path = self.document_path(version);
        let content = fs::read_to_string(&path).map_err(|source| TimelineError::SnapshotRead {
            version: version.to_string(),
            path: path.clone(),
            source,
        })?;

        let snapshot = Arc::new(Snapshot::parse(version, &content)?);
        debug!(
            version,
            packages = snapshot.packages.len(),
            classes = snapshot.classes.len(),
            members = snapshot.members.len(),
            "loaded snapshot"
        );
        self.cache.insert(version.to_string(), Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Publish an already-constructed snapshot into the cache
    ///
    /// Useful when the extraction collaborator hands the document over
    /// in memory instead of through the filesystem.
    pub fn insert(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        let version = snapshot.version().to_string();
        let snapshot = Arc::new(snapshot);
        self.cache.insert(version, Arc::clone(&snapshot));
        snapshot
    }

    /// Whether a snapshot for this release identifier is already cached
    pub fn is_loaded(&self, version: &str) -> bool {
        self.cache.contains_key(version)
    }

    /// Release identifiers currently held in the cache
    pub fn loaded_versions(&self) -> Vec<&str> {
        self.cache.keys().map(String::as_str).collect()
    }
}
