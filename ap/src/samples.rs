//! Sample data: the concept.md template
//!
//! Used by `ap seed` and throughout the tests.

use crate::domain::{Artifact, SectionMetadata, Stage};

/// Sample artifact id
pub const EXAMPLE_ARTIFACT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Sample project id
pub const EXAMPLE_PROJECT_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Section list of a concept.md artifact: 6 sections, first 2 done
pub fn concept_section_metadata() -> Vec<SectionMetadata> {
    vec![
        SectionMetadata::new("what-is-it", "What Is It?", 1).done(),
        SectionMetadata::new("problem-being-solved", "Problem Being Solved", 2).done(),
        SectionMetadata::new("core-features", "Core Features", 3).collapsed(),
        SectionMetadata::new("value-proposition", "Value Proposition", 4).collapsed(),
        SectionMetadata::new("success-looks-like", "Success Looks Like", 5).collapsed(),
        SectionMetadata::new("non-goals", "Non-Goals", 6).collapsed(),
    ]
}

/// Full concept.md artifact built on [`concept_section_metadata`]
pub fn example_artifact() -> Artifact {
    let mut artifact = Artifact::new(
        EXAMPLE_ARTIFACT_ID,
        EXAMPLE_PROJECT_ID,
        "concept.md",
        "concept",
        Stage::Discovery,
        concept_section_metadata(),
    )
    .with_content(serde_json::json!({ "type": "doc", "content": [] }));
    artifact.created_at = "2025-01-01T00:00:00Z".to_string();
    artifact.updated_at = "2025-01-01T12:00:00Z".to_string();
    artifact
}
