//! Structural diffing between two snapshots
//!
//! Classification runs independently at three granularities, with the older
//! snapshot as baseline and the newer as target:
//!
//! - **added**: key present only in the newer dictionary
//! - **removed**: key present only in the older dictionary
//! - **changed**: key present in both with unequal signatures
//!
//! Signatures are deliberately coarse above the member level: a package is
//! "changed" whenever its class list compares unequal by deep structural
//! equality, so a change anywhere inside any of its classes marks the
//! package too. A class is "changed" when its own member list differs. A
//! member is "changed" when `(name, kind, params, apiStatus)` differ.
//!
//! Result lists carry no ordering guarantee; the serializable report sorts
//! names lexicographically for stable rendering.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::model::{Class, Member, Package};
use crate::snapshot::Snapshot;

/// Diff between an older and a newer snapshot
///
/// Element lists hold full nodes (cloned out of the snapshots) so rendering
/// can reach names, statuses, and links without a second lookup. Member
/// results are grouped by enclosing class name.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDiff {
    /// Older release identifier (baseline)
    pub version_a: String,
    /// Newer release identifier (target)
    pub version_b: String,

    pub packages_added: Vec<Package>,
    pub packages_removed: Vec<Package>,
    pub packages_changed: Vec<Package>,

    pub classes_added: Vec<Class>,
    pub classes_removed: Vec<Class>,
    pub classes_changed: Vec<Class>,

    /// Enclosing class name -> members added in the newer snapshot
    pub members_added: BTreeMap<String, Vec<Member>>,
    /// Enclosing class name -> members present only in the older snapshot
    pub members_removed: BTreeMap<String, Vec<Member>>,
    /// Enclosing class name -> members whose signature changed (newer node)
    pub members_changed: BTreeMap<String, Vec<Member>>,
}

/// Compute the structural diff between two snapshots
pub fn diff(older: &Snapshot, newer: &Snapshot) -> ApiDiff {
    let mut packages_added = Vec::new();
    let mut packages_removed = Vec::new();
    let mut packages_changed = Vec::new();

    for (name, package) in &newer.packages {
        match older.packages.get(name) {
            None => packages_added.push(package.clone()),
            Some(old) if old.classes != package.classes => packages_changed.push(package.clone()),
            Some(_) => {}
        }
    }
    for (name, package) in &older.packages {
        if !newer.packages.contains_key(name) {
            packages_removed.push(package.clone());
        }
    }

    let mut classes_added = Vec::new();
    let mut classes_removed = Vec::new();
    let mut classes_changed = Vec::new();

    for (name, class) in &newer.classes {
        match older.classes.get(name) {
            None => classes_added.push(class.clone()),
            Some(old) if old.members != class.members => classes_changed.push(class.clone()),
            Some(_) => {}
        }
    }
    for (name, class) in &older.classes {
        if !newer.classes.contains_key(name) {
            classes_removed.push(class.clone());
        }
    }

    let mut members_added = Vec::new();
    let mut members_removed = Vec::new();
    let mut members_changed = Vec::new();

    for (name, member) in &newer.members {
        match older.members.get(name) {
            None => members_added.push(member.clone()),
            Some(old) if old != member => members_changed.push(member.clone()),
            Some(_) => {}
        }
    }
    for (name, member) in &older.members {
        if !newer.members.contains_key(name) {
            members_removed.push(member.clone());
        }
    }

    debug!(
        version_a = older.version(),
        version_b = newer.version(),
        packages = packages_added.len() + packages_removed.len() + packages_changed.len(),
        classes = classes_added.len() + classes_removed.len() + classes_changed.len(),
        members = members_added.len() + members_removed.len() + members_changed.len(),
        "computed diff"
    );

    ApiDiff {
        version_a: older.version().to_string(),
        version_b: newer.version().to_string(),
        packages_added,
        packages_removed,
        packages_changed,
        classes_added,
        classes_removed,
        classes_changed,
        members_added: group_by_class(members_added),
        members_removed: group_by_class(members_removed),
        members_changed: group_by_class(members_changed),
    }
}

fn group_by_class(members: Vec<Member>) -> BTreeMap<String, Vec<Member>> {
    let mut grouped: BTreeMap<String, Vec<Member>> = BTreeMap::new();
    for member in members {
        grouped
            .entry(member.declaring_class.clone())
            .or_default()
            .push(member);
    }
    grouped
}

impl ApiDiff {
    /// True when nothing was added, removed, or changed at any granularity
    pub fn is_empty(&self) -> bool {
        self.packages_added.is_empty()
            && self.packages_removed.is_empty()
            && self.packages_changed.is_empty()
            && self.classes_added.is_empty()
            && self.classes_removed.is_empty()
            && self.classes_changed.is_empty()
            && self.members_added.is_empty()
            && self.members_removed.is_empty()
            && self.members_changed.is_empty()
    }

    /// All members in a grouped map, ungrouped
    pub fn members_of(grouped: &BTreeMap<String, Vec<Member>>) -> Vec<&Member> {
        grouped.values().flatten().collect()
    }

    /// Build the serializable report document
    pub fn to_report(&self) -> DiffReport {
        DiffReport {
            version_a: self.version_a.clone(),
            version_b: self.version_b.clone(),
            generated_at: Utc::now(),
            packages_added: sorted_names(&self.packages_added, |p| &p.name),
            packages_removed: sorted_names(&self.packages_removed, |p| &p.name),
            packages_changed: sorted_names(&self.packages_changed, |p| &p.name),
            classes_added: sorted_names(&self.classes_added, |c| &c.name),
            classes_removed: sorted_names(&self.classes_removed, |c| &c.name),
            classes_changed: sorted_names(&self.classes_changed, |c| &c.name),
            members_added: grouped_names(&self.members_added),
            members_removed: grouped_names(&self.members_removed),
            members_changed: grouped_names(&self.members_changed),
        }
    }
}

fn sorted_names<T>(elements: &[T], name: impl Fn(&T) -> &String) -> Vec<String> {
    let mut names: Vec<String> = elements.iter().map(|e| name(e).clone()).collect();
    names.sort();
    names
}

fn grouped_names(grouped: &BTreeMap<String, Vec<Member>>) -> BTreeMap<String, Vec<String>> {
    grouped
        .iter()
        .map(|(class, members)| {
            let mut names: Vec<String> = members.iter().map(|m| m.name.clone()).collect();
            names.sort();
            (class.clone(), names)
        })
        .collect()
}

/// Serializable diff document, for the rendering collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub version_a: String,
    pub version_b: String,
    pub generated_at: DateTime<Utc>,

    pub packages_added: Vec<String>,
    pub packages_removed: Vec<String>,
    pub packages_changed: Vec<String>,

    pub classes_added: Vec<String>,
    pub classes_removed: Vec<String>,
    pub classes_changed: Vec<String>,

    pub members_added: BTreeMap<String, Vec<String>>,
    pub members_removed: BTreeMap<String, Vec<String>>,
    pub members_changed: BTreeMap<String, Vec<String>>,
}

impl DiffReport {
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
