//! API timeline facade
//!
//! Owns the snapshot store and exposes the three operations the
//! orchestration and rendering collaborators consume: `diff`,
//! `resolve_since`, and `load_snapshot`. Computed diffs are retained,
//! keyed by version pair, so rendering can revisit them without
//! recomputation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::TimelineConfig;
use crate::diff::{self, ApiDiff};
use crate::error::Result;
use crate::since::{SinceReport, SinceResolver};
use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;

/// The main timeline entry point
pub struct ApiTimeline {
    store: SnapshotStore,
    /// (older, newer) -> computed diff
    diffs: HashMap<(String, String), ApiDiff>,
}

impl ApiTimeline {
    /// Open a timeline over a snapshot document directory
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::with_store(SnapshotStore::open(root))
    }

    /// Open a timeline from configuration
    pub fn with_config(config: &TimelineConfig) -> Self {
        Self::with_store(SnapshotStore::with_config(&config.store))
    }

    /// Build a timeline over an existing store
    pub fn with_store(store: SnapshotStore) -> Self {
        Self {
            store,
            diffs: HashMap::new(),
        }
    }

    /// Load (or fetch from cache) the snapshot for a release identifier
    ///
    /// Rendering uses this to resolve element display links for names
    /// appearing in diff and since output.
    pub fn load_snapshot(&mut self, version: &str) -> Result<Arc<Snapshot>> {
        self.store.load(version)
    }

    /// Diff two releases, older first
    pub fn diff(&mut self, version_a: &str, version_b: &str) -> Result<&ApiDiff> {
        let key = (version_a.to_string(), version_b.to_string());
        if !self.diffs.contains_key(&key) {
            let older = self.store.load(version_a)?;
            let newer = self.store.load(version_b)?;
            let result = diff::diff(&older, &newer);
            info!(version_a, version_b, empty = result.is_empty(), "diffed releases");
            self.diffs.insert(key.clone(), result);
        }
        Ok(&self.diffs[&key])
    }

    /// Retrieve a previously computed diff
    pub fn diff_for(&self, version_a: &str, version_b: &str) -> Option<&ApiDiff> {
        self.diffs
            .get(&(version_a.to_string(), version_b.to_string()))
    }

    /// Resolve first-appearance versions over an ordered (oldest-first)
    /// version list
    pub fn resolve_since(&mut self, versions: &[String]) -> Result<SinceReport> {
        SinceResolver::new(versions.to_vec()).resolve(&mut self.store)
    }

    /// Access the underlying store
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Mutable access to the underlying store, e.g. to seed snapshots
    pub fn store_mut(&mut self) -> &mut SnapshotStore {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seed(timeline: &mut ApiTimeline, version: &str, members: &[&str]) {
        let children: Vec<serde_json::Value> = members
            .iter()
            .map(|m| json!({ "kind": "METHOD", "name": m, "params": [] }))
            .collect();
        let doc = json!([
            {
                "kind": "PACKAGE",
                "name": "org.bukkit",
                "children": [
                    { "kind": "INTERFACE", "name": "org.bukkit.Server", "children": children }
                ]
            }
        ]);
        timeline
            .store_mut()
            .insert(Snapshot::parse(version, &doc.to_string()).unwrap());
    }

    #[test]
    fn test_diff_is_retained() {
        let dir = tempfile::tempdir().unwrap();
        let mut timeline = ApiTimeline::open(dir.path());
        seed(&mut timeline, "1.21.3", &["getName()"]);
        seed(&mut timeline, "1.21.4", &["getName()", "getPort()"]);

        let result = timeline.diff("1.21.3", "1.21.4").unwrap();
        assert!(!result.is_empty());
        assert!(timeline.diff_for("1.21.3", "1.21.4").is_some());
        assert!(timeline.diff_for("1.21.4", "1.21.3").is_none());
    }

    #[test]
    fn test_since_through_facade() {
        let dir = tempfile::tempdir().unwrap();
        let mut timeline = ApiTimeline::open(dir.path());
        seed(&mut timeline, "1.21.3", &["getName()"]);
        seed(&mut timeline, "1.21.4", &["getName()", "getPort()"]);

        let versions = vec!["1.21.3".to_string(), "1.21.4".to_string()];
        let report = timeline.resolve_since(&versions).unwrap();
        assert_eq!(report.classes.len(), 1);
        assert_eq!(report.members["org.bukkit.Server"].len(), 2);
    }
}
