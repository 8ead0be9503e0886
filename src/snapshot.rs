//! Snapshot construction from extraction documents
//!
//! A snapshot document is an ordered forest of element records produced by
//! the external extraction tool. Construction is a single top-down pass:
//! each record becomes a Package, Class, or Member node attached to its
//! parent, and every node is additionally registered into the snapshot's
//! flat lookup dictionaries.

use std::collections::HashMap;

use serde::Deserialize;

use crate::checksum::Checksum;
use crate::error::{Result, TimelineError};
use crate::model::{ApiStatus, Class, Element, ElementKind, Member, Package};

/// One record of the snapshot document, as emitted by extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<RawElement>,
    #[serde(default)]
    pub api_status: Option<ApiStatus>,
    #[serde(default)]
    pub params: Option<Vec<String>>,
    #[serde(default)]
    pub link: Option<String>,
}

impl RawElement {
    fn is_internal(&self) -> bool {
        matches!(self.api_status, Some(ApiStatus::Internal))
    }
}

/// An immutable capture of one release's public API surface
///
/// Owns the package tree plus three flat dictionaries keyed by raw element
/// name. The member dictionary is keyed by display name alone, not by
/// declaring class: two members in different classes with the same display
/// name collide and the later record wins. This mirrors the upstream
/// exporter and is relied on by existing consumers; the since resolver's
/// output uses a two-level key instead (see `since`).
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: String,
    /// Package name -> package subtree
    pub packages: HashMap<String, Package>,
    /// Type name -> class subtree, across all nesting depths
    pub classes: HashMap<String, Class>,
    /// Member display name -> member, across all classes (last write wins)
    pub members: HashMap<String, Member>,
    checksum: Option<Checksum>,
}

impl Snapshot {
    /// Parse a snapshot document from its JSON text
    pub fn parse(version: &str, content: &str) -> Result<Self> {
        let records: Vec<RawElement> =
            serde_json::from_str(content).map_err(|source| TimelineError::SnapshotParse {
                version: version.to_string(),
                source,
            })?;
        let mut snapshot = Self::from_records(version, records)?;
        snapshot.checksum = Some(Checksum::from_content(content));
        Ok(snapshot)
    }

    /// Build a snapshot from already-deserialized records
    ///
    /// Top-level records must be `PACKAGE` kind (`TYPE_PARAMETER` is
    /// tolerated and skipped anywhere). `Internal`-status records are
    /// dropped together with their subtree.
    pub fn from_records(version: &str, records: Vec<RawElement>) -> Result<Self> {
        let mut snapshot = Self {
            version: version.to_string(),
            packages: HashMap::new(),
            classes: HashMap::new(),
            members: HashMap::new(),
            checksum: None,
        };

        for record in records {
            if record.is_internal() {
                continue;
            }
            match kind_of(&record)? {
                ElementKind::Package => {
                    let mut node = Element::Package(Package::new(
                        &record.name,
                        record.api_status,
                        record.link,
                    ));
                    snapshot.build_children(record.children, &mut node)?;
                    let Element::Package(package) = node else {
                        unreachable!("package node cannot change variant")
                    };
                    snapshot.packages.insert(package.name.clone(), package);
                }
                ElementKind::TypeParameter => {}
                _ => {
                    return Err(TimelineError::OrphanElement {
                        kind: record.kind,
                        name: record.name,
                    })
                }
            }
        }

        Ok(snapshot)
    }

    fn build_children(&mut self, records: Vec<RawElement>, parent: &mut Element) -> Result<()> {
        for record in records {
            if record.is_internal() {
                continue;
            }
            let kind = kind_of(&record)?;
            if kind == ElementKind::TypeParameter {
                // recognized but carries nothing worth capturing
                continue;
            }
            if kind.is_type() {
                let mut node = Element::Class(Class::new(
                    &record.name,
                    record.api_status,
                    record.link,
                    parent.name(),
                ));
                self.build_children(record.children, &mut node)?;
                let Element::Class(class) = node else {
                    unreachable!("class node cannot change variant")
                };
                self.classes.insert(class.name.clone(), class.clone());
                parent.attach(Element::Class(class))?;
            } else if let Some(member_kind) = kind.member_kind() {
                let member = Member {
                    name: record.name,
                    kind: member_kind,
                    params: record.params,
                    api_status: record.api_status,
                    link: record.link,
                    declaring_class: parent.name().to_string(),
                };
                self.members.insert(member.name.clone(), member.clone());
                parent.attach(Element::Member(member))?;
            } else {
                // a PACKAGE record below the top level; attach rejects it
                parent.attach(Element::Package(Package::new(
                    &record.name,
                    record.api_status,
                    record.link,
                )))?;
            }
        }
        Ok(())
    }

    /// The release identifier this snapshot was captured for
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Checksum of the backing document, when loaded from text
    pub fn checksum(&self) -> Option<&Checksum> {
        self.checksum.as_ref()
    }

    /// Total entries across the three dictionaries
    pub fn element_count(&self) -> usize {
        self.packages.len() + self.classes.len() + self.members.len()
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }
}

fn kind_of(record: &RawElement) -> Result<ElementKind> {
    ElementKind::parse(&record.kind).ok_or_else(|| TimelineError::UnknownKind {
        kind: record.kind.clone(),
        name: record.name.clone(),
    })
}
