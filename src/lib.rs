//! API Timeline
//!
//! Tracks the evolution of a large, versioned public API surface: for every
//! release an external extraction tool captures the shape of packages,
//! classes, and members as a snapshot document; this crate models those
//! snapshots, computes structural diffs between releases, and determines
//! the first release each element appeared in.
//!
//! ## Features
//!
//! - **Snapshot Model**: package/class/member tree with flat name-keyed
//!   lookup dictionaries, built in a single pass over the document
//! - **Snapshot Store**: loads documents on demand and memoizes them for
//!   the lifetime of the run, with document checksums for staleness checks
//! - **Diff Engine**: added/removed/changed classification at package,
//!   class, and member granularity, with member results grouped by class
//! - **Since Resolver**: first-appearance version for every element of the
//!   latest snapshot across an ordered version list
//!
//! ## Architecture
//!
//! ```text
//! source acquisition ──> snapshot extraction (external)
//!                              │ one document per release
//!                              ▼
//!                        SnapshotStore ──> Snapshot (immutable, cached)
//!                              │
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//!          diff engine                  SinceResolver
//!               │                             │
//!               ▼                             ▼
//!          DiffReport                    SinceReport ──> rendering (external)
//! ```

pub mod checksum;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod since;
pub mod snapshot;
pub mod store;
pub mod timeline;

pub use checksum::Checksum;
pub use config::{OutputFormat, StoreConfig, TimelineConfig};
pub use diff::{diff, ApiDiff, DiffReport};
pub use error::{Result, TimelineError};
pub use model::{ApiStatus, Class, Element, ElementKind, Member, MemberKind, Package};
pub use since::{Since, SinceReport, SinceResolver};
pub use snapshot::{RawElement, Snapshot};
pub use store::SnapshotStore;
pub use timeline::ApiTimeline;
