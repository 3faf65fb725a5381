//! Store-backed section updaters
//!
//! Each update is a fetch of the fields it needs, the same transform the
//! pure mutators apply, and a write of the fields that changed. There is no
//! version check between the two steps: two callers updating the same
//! artifact at once can lose one of the updates.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::domain::section::{self, SectionMetadata, count_done};
use crate::domain::Artifact;
use crate::error::TrackerError;
use crate::store::{Fields, Filter, RecordStore};

const SECTION_METADATA: &str = "section_metadata";
const SECTIONS_COMPLETE: &str = "sections_complete";
const SECTIONS_TOTAL: &str = "sections_total";

/// What an updater did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Changed fields were written
    Written,
    /// Stored state already matched; nothing was written
    Unchanged,
}

/// Set or clear a section's done flag and rewrite `sections_complete`
///
/// Unknown slugs are a silent no-op. Uses the default table.
pub async fn update_section_done_state(
    store: &dyn RecordStore,
    artifact_id: &str,
    section_slug: &str,
    is_done: bool,
) -> Result<UpdateOutcome, TrackerError> {
    apply_done_state(store, &TrackerConfig::default(), artifact_id, section_slug, is_done).await
}

/// Set a section's collapse flag; progress counters are left alone
///
/// Unknown slugs are a silent no-op. Uses the default table.
pub async fn update_section_collapse_state(
    store: &dyn RecordStore,
    artifact_id: &str,
    section_slug: &str,
    is_collapsed: bool,
) -> Result<UpdateOutcome, TrackerError> {
    apply_collapse_state(store, &TrackerConfig::default(), artifact_id, section_slug, is_collapsed).await
}

/// Section updater bound to a store and configuration
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn RecordStore>,
    config: TrackerConfig,
}

impl ProgressTracker {
    /// Create a tracker with default configuration
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_config(store, TrackerConfig::default())
    }

    pub fn with_config(store: Arc<dyn RecordStore>, config: TrackerConfig) -> Self {
        debug!(table = %config.table, strict_slugs = config.strict_slugs, "ProgressTracker::with_config: called");
        Self { store, config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// See [`update_section_done_state`]; honours `strict_slugs`
    pub async fn update_section_done_state(
        &self,
        artifact_id: &str,
        section_slug: &str,
        is_done: bool,
    ) -> Result<UpdateOutcome, TrackerError> {
        apply_done_state(self.store.as_ref(), &self.config, artifact_id, section_slug, is_done).await
    }

    /// See [`update_section_collapse_state`]; honours `strict_slugs`
    pub async fn update_section_collapse_state(
        &self,
        artifact_id: &str,
        section_slug: &str,
        is_collapsed: bool,
    ) -> Result<UpdateOutcome, TrackerError> {
        apply_collapse_state(self.store.as_ref(), &self.config, artifact_id, section_slug, is_collapsed).await
    }

    /// Fetch and decode a whole artifact
    pub async fn load_artifact(&self, artifact_id: &str) -> Result<Artifact, TrackerError> {
        debug!(%artifact_id, "load_artifact: called");
        let fields = self
            .store
            .fetch(&self.config.table, &Filter::id(artifact_id), &[])
            .await
            .map_err(|e| TrackerError::from_fetch(artifact_id, e))?;
        serde_json::from_value(Value::Object(fields)).map_err(|source| TrackerError::Decode {
            artifact_id: artifact_id.to_string(),
            field: "artifact".to_string(),
            source,
        })
    }
}

async fn apply_done_state(
    store: &dyn RecordStore,
    config: &TrackerConfig,
    artifact_id: &str,
    section_slug: &str,
    is_done: bool,
) -> Result<UpdateOutcome, TrackerError> {
    debug!(%artifact_id, %section_slug, is_done, "apply_done_state: called");
    let filter = Filter::id(artifact_id);
    let mut fields = store
        .fetch(&config.table, &filter, &[SECTION_METADATA, SECTIONS_COMPLETE, SECTIONS_TOTAL])
        .await
        .map_err(|e| TrackerError::from_fetch(artifact_id, e))?;

    let sections: Vec<SectionMetadata> = take_field(&mut fields, artifact_id, SECTION_METADATA)?;
    check_slug(config, artifact_id, &sections, section_slug)?;

    let stored_total = fields.get(SECTIONS_TOTAL).and_then(Value::as_u64);
    if stored_total != Some(sections.len() as u64) {
        warn!(%artifact_id, ?stored_total, actual = sections.len(), "sections_total out of sync with section_metadata");
    }

    let updated = section::set_done(&sections, section_slug, is_done);
    let complete = count_done(&updated);
    let stored_complete = fields.get(SECTIONS_COMPLETE).and_then(Value::as_u64);
    if updated == sections && stored_complete == Some(u64::from(complete)) {
        debug!(%artifact_id, %section_slug, "apply_done_state: nothing to write");
        return Ok(UpdateOutcome::Unchanged);
    }

    let mut changes = Fields::new();
    changes.insert(SECTION_METADATA.to_string(), serde_json::json!(updated));
    changes.insert(SECTIONS_COMPLETE.to_string(), Value::from(complete));
    store
        .write(&config.table, &filter, changes)
        .await
        .map_err(|source| TrackerError::WriteFailure {
            artifact_id: artifact_id.to_string(),
            source,
        })?;

    info!(%artifact_id, %section_slug, is_done, sections_complete = complete, "Updated section done state");
    Ok(UpdateOutcome::Written)
}

async fn apply_collapse_state(
    store: &dyn RecordStore,
    config: &TrackerConfig,
    artifact_id: &str,
    section_slug: &str,
    is_collapsed: bool,
) -> Result<UpdateOutcome, TrackerError> {
    debug!(%artifact_id, %section_slug, is_collapsed, "apply_collapse_state: called");
    let filter = Filter::id(artifact_id);
    let mut fields = store
        .fetch(&config.table, &filter, &[SECTION_METADATA])
        .await
        .map_err(|e| TrackerError::from_fetch(artifact_id, e))?;

    let sections: Vec<SectionMetadata> = take_field(&mut fields, artifact_id, SECTION_METADATA)?;
    check_slug(config, artifact_id, &sections, section_slug)?;

    let updated = section::set_collapsed(&sections, section_slug, is_collapsed);
    if updated == sections {
        debug!(%artifact_id, %section_slug, "apply_collapse_state: nothing to write");
        return Ok(UpdateOutcome::Unchanged);
    }

    let mut changes = Fields::new();
    changes.insert(SECTION_METADATA.to_string(), serde_json::json!(updated));
    store
        .write(&config.table, &filter, changes)
        .await
        .map_err(|source| TrackerError::WriteFailure {
            artifact_id: artifact_id.to_string(),
            source,
        })?;

    info!(%artifact_id, %section_slug, is_collapsed, "Updated section collapse state");
    Ok(UpdateOutcome::Written)
}

fn take_field<T: DeserializeOwned>(fields: &mut Fields, artifact_id: &str, field: &str) -> Result<T, TrackerError> {
    let value = fields.remove(field).ok_or_else(|| TrackerError::MissingField {
        artifact_id: artifact_id.to_string(),
        field: field.to_string(),
    })?;
    serde_json::from_value(value).map_err(|source| TrackerError::Decode {
        artifact_id: artifact_id.to_string(),
        field: field.to_string(),
        source,
    })
}

fn check_slug(
    config: &TrackerConfig,
    artifact_id: &str,
    sections: &[SectionMetadata],
    section_slug: &str,
) -> Result<(), TrackerError> {
    if section::find(sections, section_slug).is_some() {
        return Ok(());
    }
    if config.strict_slugs {
        warn!(%artifact_id, %section_slug, "Section not found");
        return Err(TrackerError::SectionNotFound {
            artifact_id: artifact_id.to_string(),
            slug: section_slug.to_string(),
        });
    }
    debug!(%artifact_id, %section_slug, "check_slug: unknown slug, continuing");
    Ok(())
}
