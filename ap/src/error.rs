//! Tracker error types

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by the store-backed section updaters
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Artifact not found: {artifact_id}")]
    NotFound { artifact_id: String },

    #[error("Section '{slug}' not found in artifact {artifact_id}")]
    SectionNotFound { artifact_id: String, slug: String },

    #[error("Failed to fetch artifact {artifact_id}: {source}")]
    FetchFailure {
        artifact_id: String,
        #[source]
        source: StoreError,
    },

    #[error("Artifact {artifact_id} is missing field '{field}'")]
    MissingField { artifact_id: String, field: String },

    #[error("Artifact {artifact_id} has malformed field '{field}': {source}")]
    Decode {
        artifact_id: String,
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write artifact {artifact_id}: {source}")]
    WriteFailure {
        artifact_id: String,
        #[source]
        source: StoreError,
    },
}

impl TrackerError {
    /// Check if the artifact itself was missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, TrackerError::NotFound { .. })
    }

    /// Check if the store rejected the write step
    pub fn is_write_failure(&self) -> bool {
        matches!(self, TrackerError::WriteFailure { .. })
    }

    /// Map a fetch-step store error, keeping missing records distinct
    pub(crate) fn from_fetch(artifact_id: &str, source: StoreError) -> Self {
        if source.is_not_found() {
            TrackerError::NotFound {
                artifact_id: artifact_id.to_string(),
            }
        } else {
            TrackerError::FetchFailure {
                artifact_id: artifact_id.to_string(),
                source,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fetch_not_found() {
        let err = TrackerError::from_fetch(
            "a1",
            StoreError::NotFound {
                table: "artifacts".to_string(),
                filter: "id = \"a1\"".to_string(),
            },
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Artifact not found: a1");
    }

    #[test]
    fn test_from_fetch_other_errors() {
        let err = TrackerError::from_fetch("a1", StoreError::Rejected("offline".to_string()));
        assert!(!err.is_not_found());
        assert!(matches!(err, TrackerError::FetchFailure { .. }));
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn test_write_failure_message() {
        let err = TrackerError::WriteFailure {
            artifact_id: "a1".to_string(),
            source: StoreError::Rejected("constraint violated".to_string()),
        };
        assert!(err.is_write_failure());
        let msg = err.to_string();
        assert!(msg.contains("a1"));
        assert!(msg.contains("constraint violated"));
    }
}
