//! Domain types for artifact progress tracking
//!
//! Core domain types: Artifact, SectionMetadata

mod artifact;
pub mod section;

pub use artifact::{Artifact, ArtifactStatus, Stage};
pub use section::SectionMetadata;
