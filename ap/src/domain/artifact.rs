//! Artifact record
//!
//! An Artifact is one document made of named sections. It carries the
//! section list plus a denormalized progress cache (`sections_total`,
//! `sections_complete`) so list views never have to walk the sections.

use serde::{Deserialize, Serialize};

use super::section::{SectionMetadata, count_done};

/// Workflow phase an artifact belongs to, in workflow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Discovery,
    Design,
    Environment,
    Workflow,
    Implementation,
}

impl Stage {
    /// All stages in workflow order
    pub const ALL: [Stage; 5] = [
        Stage::Discovery,
        Stage::Design,
        Stage::Environment,
        Stage::Workflow,
        Stage::Implementation,
    ];
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Design => write!(f, "design"),
            Self::Environment => write!(f, "environment"),
            Self::Workflow => write!(f, "workflow"),
            Self::Implementation => write!(f, "implementation"),
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discovery" => Ok(Self::Discovery),
            "design" => Ok(Self::Design),
            "environment" => Ok(Self::Environment),
            "workflow" => Ok(Self::Workflow),
            "implementation" => Ok(Self::Implementation),
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

/// Editorial status of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    #[default]
    Draft,
    Finalized,
}

impl std::fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Finalized => write!(f, "finalized"),
        }
    }
}

impl std::str::FromStr for ArtifactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "finalized" => Ok(Self::Finalized),
            _ => Err(format!("Unknown artifact status: {}", s)),
        }
    }
}

/// A sectioned document with cached progress counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique identifier
    pub id: String,

    /// Owning project
    pub project_id: String,

    /// File-style name: "concept.md"
    pub name: String,

    /// URL-safe name: "concept"
    pub slug: String,

    /// Workflow phase
    pub stage: Stage,

    /// Draft or finalized
    pub status: ArtifactStatus,

    /// Rich document body, passed through untouched
    #[serde(default)]
    pub content: serde_json::Value,

    /// Section descriptors in display order
    #[serde(default)]
    pub section_metadata: Vec<SectionMetadata>,

    /// Cached `section_metadata.len()`
    #[serde(default)]
    pub sections_total: u32,

    /// Cached count of done sections
    #[serde(default)]
    pub sections_complete: u32,

    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_at: String,

    /// Last update timestamp (RFC 3339)
    #[serde(default)]
    pub updated_at: String,
}

impl Artifact {
    /// Create a draft artifact whose counters match `sections`
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
        stage: Stage,
        sections: Vec<SectionMetadata>,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let mut artifact = Self {
            id: id.into(),
            project_id: project_id.into(),
            name: name.into(),
            slug: slug.into(),
            stage,
            status: ArtifactStatus::Draft,
            content: serde_json::Value::Null,
            section_metadata: sections,
            sections_total: 0,
            sections_complete: 0,
            created_at: now.clone(),
            updated_at: now,
        };
        artifact.recount();
        artifact
    }

    /// Set the document body
    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = content;
        self
    }

    /// Recompute both progress counters from `section_metadata`
    pub fn recount(&mut self) {
        self.sections_total = self.section_metadata.len() as u32;
        self.sections_complete = count_done(&self.section_metadata);
    }

    /// Check if the artifact has been finalized
    pub fn is_finalized(&self) -> bool {
        self.status == ArtifactStatus::Finalized
    }
}
