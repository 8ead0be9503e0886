//! First-appearance ("since") resolution across an ordered version list
//!
//! For every package, class, and member of the latest snapshot, finds the
//! oldest tracked release whose snapshot already contains that name. Each
//! element is resolved independently with a full oldest-first scan; the
//! snapshot store's memoization keeps this to one document read per
//! version.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::OutputFormat;
use crate::error::{Result, TimelineError};
use crate::model::Class;
use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;

/// First appearance of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Since {
    /// First present in this tracked release
    Version(String),
    /// Already present in the oldest tracked release; the true origin
    /// predates the tracking window
    BeforeHistory,
    /// Not found in any tracked release
    Never,
}

impl Since {
    /// Flat wire spelling used in the since document
    pub fn as_wire_str(&self) -> &str {
        match self {
            Self::Version(v) => v,
            Self::BeforeHistory => "pre-history",
            Self::Never => "never",
        }
    }
}

impl Serialize for Since {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire_str())
    }
}

/// Computes a [`SinceReport`] for an ordered (oldest-first) version list
pub struct SinceResolver {
    versions: Vec<String>,
}

impl SinceResolver {
    pub fn new(versions: Vec<String>) -> Self {
        Self { versions }
    }

    /// Resolve first appearance for every element of the latest snapshot
    ///
    /// Members are keyed by `(class name, member name)` in the result;
    /// lookups against older snapshots still go through the flat member
    /// dictionary, matching how the snapshots themselves are keyed.
    pub fn resolve(&self, store: &mut SnapshotStore) -> Result<SinceReport> {
        let latest_version = self.versions.last().ok_or(TimelineError::NoVersions)?;
        let latest = store.load(latest_version)?;

        let mut packages = BTreeMap::new();
        let mut classes = BTreeMap::new();
        let mut members = BTreeMap::new();

        for package in latest.packages.values() {
            let since = self.first_version(store, |s| s.packages.contains_key(&package.name))?;
            packages.insert(package.name.clone(), since);
            for class in &package.classes {
                self.walk_class(store, class, &mut classes, &mut members)?;
            }
        }

        info!(
            latest = latest_version.as_str(),
            packages = packages.len(),
            classes = classes.len(),
            "resolved since report"
        );

        Ok(SinceReport {
            versions: self.versions.clone(),
            generated_at: Utc::now(),
            packages,
            classes,
            members,
        })
    }

    fn walk_class(
        &self,
        store: &mut SnapshotStore,
        class: &Class,
        classes: &mut BTreeMap<String, Since>,
        members: &mut BTreeMap<String, BTreeMap<String, Since>>,
    ) -> Result<()> {
        let since = self.first_version(store, |s| s.classes.contains_key(&class.name))?;
        classes.insert(class.name.clone(), since);

        for member in &class.members {
            let since = self.first_version(store, |s| s.members.contains_key(&member.name))?;
            members
                .entry(class.name.clone())
                .or_default()
                .insert(member.name.clone(), since);
        }

        for inner in &class.inner_classes {
            self.walk_class(store, inner, classes, members)?;
        }

        Ok(())
    }

    /// Oldest-first scan for the first snapshot satisfying `contains`
    fn first_version(
        &self,
        store: &mut SnapshotStore,
        contains: impl Fn(&Snapshot) -> bool,
    ) -> Result<Since> {
        for (index, version) in self.versions.iter().enumerate() {
            let snapshot = store.load(version)?;
            if contains(&snapshot) {
                if index == 0 {
                    return Ok(Since::BeforeHistory);
                }
                return Ok(Since::Version(version.clone()));
            }
        }
        Ok(Since::Never)
    }
}

/// Serializable since document: three flat name -> version mappings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SinceReport {
    /// The tracked versions, oldest first
    pub versions: Vec<String>,
    pub generated_at: DateTime<Utc>,
    /// Package name -> first appearance
    pub packages: BTreeMap<String, Since>,
    /// Class name -> first appearance
    pub classes: BTreeMap<String, Since>,
    /// Class name -> member name -> first appearance. Two-level key so
    /// same-named members of different classes cannot collide here.
    pub members: BTreeMap<String, BTreeMap<String, Since>>,
}

impl SinceReport {
    /// Serialize to JSON in the requested format
    pub fn to_json(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        })
    }

    /// Write the document to a file
    pub fn write_to(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        std::fs::write(path, self.to_json(format)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seed(store: &mut SnapshotStore, version: &str, doc: serde_json::Value) {
        store.insert(Snapshot::parse(version, &doc.to_string()).unwrap());
    }

    fn class_doc(members: &[&str]) -> serde_json::Value {
        let children: Vec<serde_json::Value> = members
            .iter()
            .map(|m| json!({ "kind": "METHOD", "name": m, "params": [] }))
            .collect();
        json!([
            {
                "kind": "PACKAGE",
                "name": "org.bukkit",
                "children": [
                    { "kind": "INTERFACE", "name": "org.bukkit.Server", "children": children }
                ]
            }
        ])
    }

    fn versions(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_since_monotonicity() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::open(dir.path());
        seed(&mut store, "1.21.1", class_doc(&["getName()"]));
        seed(&mut store, "1.21.3", class_doc(&["getName()", "getPort()"]));
        seed(&mut store, "1.21.4", class_doc(&["getName()", "getPort()"]));

        let resolver = SinceResolver::new(versions(&["1.21.1", "1.21.3", "1.21.4"]));
        let report = resolver.resolve(&mut store).unwrap();

        // present from the oldest tracked version onward
        assert_eq!(report.packages["org.bukkit"], Since::BeforeHistory);
        assert_eq!(report.classes["org.bukkit.Server"], Since::BeforeHistory);
        assert_eq!(
            report.members["org.bukkit.Server"]["getName()"],
            Since::BeforeHistory
        );
        // first appeared in 1.21.3: reported as that literal version
        assert_eq!(
            report.members["org.bukkit.Server"]["getPort()"],
            Since::Version("1.21.3".to_string())
        );
    }

    #[test]
    fn test_since_walks_nested_classes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::open(dir.path());
        let nested = json!([
            {
                "kind": "PACKAGE",
                "name": "org.bukkit",
                "children": [
                    {
                        "kind": "INTERFACE",
                        "name": "org.bukkit.Server",
                        "children": [
                            {
                                "kind": "CLASS",
                                "name": "org.bukkit.Server.Spigot",
                                "children": [
                                    {
                                        "kind": "CLASS",
                                        "name": "org.bukkit.Server.Spigot.Config",
                                        "children": [
                                            { "kind": "METHOD", "name": "reload()", "params": [] }
                                        ]
                                    }
                                ]
                            }
                        ]
                    }
                ]
            }
        ]);
        seed(&mut store, "1.21.3", class_doc(&[]));
        seed(&mut store, "1.21.4", nested);

        let resolver = SinceResolver::new(versions(&["1.21.3", "1.21.4"]));
        let report = resolver.resolve(&mut store).unwrap();

        assert_eq!(
            report.classes["org.bukkit.Server.Spigot.Config"],
            Since::Version("1.21.4".to_string())
        );
        assert_eq!(
            report.members["org.bukkit.Server.Spigot.Config"]["reload()"],
            Since::Version("1.21.4".to_string())
        );
    }

    #[test]
    fn test_empty_version_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::open(dir.path());
        let resolver = SinceResolver::new(Vec::new());
        assert!(matches!(
            resolver.resolve(&mut store),
            Err(TimelineError::NoVersions)
        ));
    }

    #[test]
    fn test_report_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::open(dir.path());
        seed(&mut store, "1.21.3", class_doc(&["getName()"]));
        seed(&mut store, "1.21.4", class_doc(&["getName()", "getPort()"]));

        let resolver = SinceResolver::new(versions(&["1.21.3", "1.21.4"]));
        let report = resolver.resolve(&mut store).unwrap();
        let json = report.to_json(OutputFormat::Compact).unwrap();

        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"getName()\":\"pre-history\""));
        assert!(json.contains("\"getPort()\":\"1.21.4\""));
    }

    #[test]
    fn test_wire_spelling() {
        assert_eq!(Since::Version("1.21.4".into()).as_wire_str(), "1.21.4");
        assert_eq!(Since::BeforeHistory.as_wire_str(), "pre-history");
        assert_eq!(Since::Never.as_wire_str(), "never");
    }
}
