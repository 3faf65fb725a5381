//! Progress mutators and queries
//!
//! Pure, synchronous transforms over an [`Artifact`]. Mutators return a new
//! artifact and never touch the input. An unknown slug is not an error here:
//! the artifact comes back with its section list unchanged.

use tracing::debug;

use crate::domain::section::{self, SectionMetadata};
use crate::domain::Artifact;

/// Mark a section as done and recompute the progress counters
///
/// Set-only: there is no way to clear the flag through this function. Use
/// [`crate::tracker::update_section_done_state`] to clear it in a store.
/// Slugs are not checked for uniqueness, so every section carrying
/// `section_slug` is marked and each one counts toward `sections_complete`.
pub fn mark_section_done(artifact: &Artifact, section_slug: &str) -> Artifact {
    debug!(artifact_id = %artifact.id, %section_slug, "mark_section_done: called");
    let mut updated = Artifact {
        section_metadata: section::set_done(&artifact.section_metadata, section_slug, true),
        ..artifact.clone()
    };
    updated.recount();
    updated
}

/// Flip the collapse state of a section
///
/// Collapse is display-only, so the counters are carried over unchanged.
pub fn toggle_section_collapse(artifact: &Artifact, section_slug: &str) -> Artifact {
    debug!(artifact_id = %artifact.id, %section_slug, "toggle_section_collapse: called");
    Artifact {
        section_metadata: section::toggle_collapsed(&artifact.section_metadata, section_slug),
        ..artifact.clone()
    }
}

/// Completion percentage in `0..=100`, rounded half away from zero
///
/// Returns 0 for an artifact without sections. An incomplete artifact never
/// reports 100, even when rounding would get there (199 of 200 sections).
///
/// "100 exactly when [`is_artifact_complete`]" holds only while the counters
/// pass [`crate::validate_progress_counts`]. A stale `sections_complete`
/// above `sections_total` is clamped and reports 100 although the artifact
/// is not complete.
pub fn get_progress_percentage(artifact: &Artifact) -> u8 {
    let total = u64::from(artifact.sections_total);
    if total == 0 {
        return 0;
    }
    let complete = u64::from(artifact.sections_complete).min(total);
    let rounded = (200 * complete + total) / (2 * total);
    if complete < total { rounded.min(99) as u8 } else { 100 }
}

/// Progress as "complete/total", e.g. "2/6"
pub fn get_progress_display(artifact: &Artifact) -> String {
    format!("{}/{}", artifact.sections_complete, artifact.sections_total)
}

/// Check if every section is done
///
/// Vacuously true for an artifact without sections.
pub fn is_artifact_complete(artifact: &Artifact) -> bool {
    artifact.sections_complete == artifact.sections_total
}

/// First section in list order that is not done
pub fn get_next_incomplete_section(artifact: &Artifact) -> Option<&SectionMetadata> {
    artifact.section_metadata.iter().find(|s| !s.is_done)
}

/// Sections sorted by their `order` field (stable for equal orders)
pub fn sections_by_order(artifact: &Artifact) -> Vec<&SectionMetadata> {
    let mut sorted: Vec<&SectionMetadata> = artifact.section_metadata.iter().collect();
    sorted.sort_by_key(|s| s.order);
    sorted
}

/// First section by `order` field that is not done
pub fn next_incomplete_by_order(artifact: &Artifact) -> Option<&SectionMetadata> {
    sections_by_order(artifact).into_iter().find(|s| !s.is_done)
}

/// Look up a section by slug
pub fn find_section<'a>(artifact: &'a Artifact, section_slug: &str) -> Option<&'a SectionMetadata> {
    section::find(&artifact.section_metadata, section_slug)
}
