//! ArtifactProgress - section-level progress tracking for document artifacts
//!
//! An artifact is a document made of named sections. Each artifact carries
//! its section list plus two cached counters (`sections_total`,
//! `sections_complete`) so progress can be read without walking the list.
//! This crate keeps those counters honest.
//!
//! # Modules
//!
//! - [`domain`] - `Artifact` and `SectionMetadata`
//! - [`progress`] - pure mutators and progress queries
//! - [`validation`] - section order and counter checks
//! - [`store`] - record store capability plus memory and JSON file stores
//! - [`tracker`] - fetch/transform/write updaters against a store
//!
//! # Example
//!
//! ```ignore
//! use artifactprogress::{MemoryStore, ProgressTracker};
//!
//! let store = Arc::new(MemoryStore::new());
//! store.insert_value(ARTIFACTS_TABLE, &artifact)?;
//! let tracker = ProgressTracker::new(store);
//! tracker.update_section_done_state(&artifact.id, "core-features", true).await?;
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod progress;
pub mod samples;
pub mod store;
pub mod tracker;
pub mod validation;

pub use config::{Config, StorageConfig, TrackerConfig};
pub use domain::{Artifact, ArtifactStatus, SectionMetadata, Stage};
pub use error::TrackerError;
pub use progress::{
    find_section, get_next_incomplete_section, get_progress_display, get_progress_percentage, is_artifact_complete,
    mark_section_done, next_incomplete_by_order, sections_by_order, toggle_section_collapse,
};
pub use store::{Fields, Filter, JsonFileStore, MemoryStore, RecordStore, StoreError};
pub use tracker::{ProgressTracker, UpdateOutcome, update_section_collapse_state, update_section_done_state};
pub use validation::{
    MetadataIssue, check_progress_counts, check_section_metadata, validate_progress_counts, validate_section_metadata,
    validate_section_metadata_value,
};

/// Default table holding artifact records
pub const ARTIFACTS_TABLE: &str = "artifacts";
