//! Section list and progress counter validation
//!
//! The boolean validators answer "is this well formed"; `check_*` variants
//! report every problem found, for diagnostics.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::domain::section::count_done;
use crate::domain::{Artifact, SectionMetadata};

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex is valid"));

/// A problem found in a section list or its counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataIssue {
    /// Sorted orders are not exactly `1..=N`
    OrderSequence { orders: Vec<u32> },
    /// Two sections share a slug
    DuplicateSlug { slug: String },
    /// Slug is not lowercase words joined by hyphens
    InvalidSlug { slug: String },
    /// Section has an empty title
    EmptyTitle { slug: String },
    /// `sections_total` disagrees with the list length
    TotalMismatch { cached: u32, actual: u32 },
    /// `sections_complete` disagrees with the done count
    CompleteMismatch { cached: u32, actual: u32 },
}

impl std::fmt::Display for MetadataIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrderSequence { orders } => write!(f, "orders {:?} are not a contiguous 1..N sequence", orders),
            Self::DuplicateSlug { slug } => write!(f, "duplicate slug '{}'", slug),
            Self::InvalidSlug { slug } => write!(f, "slug '{}' is not URL-safe", slug),
            Self::EmptyTitle { slug } => write!(f, "section '{}' has an empty title", slug),
            Self::TotalMismatch { cached, actual } => {
                write!(f, "sections_total is {} but there are {} sections", cached, actual)
            }
            Self::CompleteMismatch { cached, actual } => {
                write!(f, "sections_complete is {} but {} sections are done", cached, actual)
            }
        }
    }
}

/// Check that sorted `order` values are exactly `1..=N`
///
/// Slug uniqueness is not part of this check; see [`check_section_metadata`].
pub fn validate_section_metadata(sections: &[SectionMetadata]) -> bool {
    debug!(count = sections.len(), "validate_section_metadata: called");
    orders_contiguous(sections.iter().map(|s| f64::from(s.order)).collect())
}

/// Validate an untyped section list, as stored in a JSON column
///
/// Every entry must carry `slug`/`title` strings, `is_done`/`is_collapsed`
/// booleans and a numeric `order`, and the orders must be contiguous.
pub fn validate_section_metadata_value(value: &Value) -> bool {
    let Some(entries) = value.as_array() else {
        debug!("validate_section_metadata_value: not an array");
        return false;
    };

    let mut orders = Vec::with_capacity(entries.len());
    for entry in entries {
        let well_typed = entry.get("slug").is_some_and(Value::is_string)
            && entry.get("title").is_some_and(Value::is_string)
            && entry.get("is_done").is_some_and(Value::is_boolean)
            && entry.get("is_collapsed").is_some_and(Value::is_boolean);
        match entry.get("order").and_then(Value::as_f64) {
            Some(order) if well_typed => orders.push(order),
            _ => {
                debug!(?entry, "validate_section_metadata_value: malformed entry");
                return false;
            }
        }
    }
    orders_contiguous(orders)
}

fn orders_contiguous(mut orders: Vec<f64>) -> bool {
    orders.sort_by(f64::total_cmp);
    orders.iter().enumerate().all(|(i, order)| *order == (i + 1) as f64)
}

/// Check that the cached counters match the section list
pub fn validate_progress_counts(artifact: &Artifact) -> bool {
    artifact.sections_total as usize == artifact.section_metadata.len()
        && artifact.sections_complete == count_done(&artifact.section_metadata)
}

/// Report every structural problem in a section list
pub fn check_section_metadata(sections: &[SectionMetadata]) -> Vec<MetadataIssue> {
    let mut issues = Vec::new();

    if !validate_section_metadata(sections) {
        let mut orders: Vec<u32> = sections.iter().map(|s| s.order).collect();
        orders.sort_unstable();
        issues.push(MetadataIssue::OrderSequence { orders });
    }

    let mut seen = HashSet::new();
    for section in sections {
        if !seen.insert(section.slug.as_str()) {
            issues.push(MetadataIssue::DuplicateSlug {
                slug: section.slug.clone(),
            });
        }
        if !SLUG_RE.is_match(&section.slug) {
            issues.push(MetadataIssue::InvalidSlug {
                slug: section.slug.clone(),
            });
        }
        if section.title.trim().is_empty() {
            issues.push(MetadataIssue::EmptyTitle {
                slug: section.slug.clone(),
            });
        }
    }

    issues
}

/// Report counter mismatches for an artifact
pub fn check_progress_counts(artifact: &Artifact) -> Vec<MetadataIssue> {
    let mut issues = Vec::new();
    let actual_total = artifact.section_metadata.len() as u32;
    if artifact.sections_total != actual_total {
        issues.push(MetadataIssue::TotalMismatch {
            cached: artifact.sections_total,
            actual: actual_total,
        });
    }
    let actual_complete = count_done(&artifact.section_metadata);
    if artifact.sections_complete != actual_complete {
        issues.push(MetadataIssue::CompleteMismatch {
            cached: artifact.sections_complete,
            actual: actual_complete,
        });
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{concept_section_metadata, example_artifact};
    use serde_json::json;

    fn with_orders(orders: &[u32]) -> Vec<SectionMetadata> {
        orders
            .iter()
            .enumerate()
            .map(|(i, order)| SectionMetadata::new(format!("s-{}", i), format!("S {}", i), *order))
            .collect()
    }

    #[test]
    fn test_validate_orders() {
        assert!(validate_section_metadata(&concept_section_metadata()));
        assert!(validate_section_metadata(&with_orders(&[2, 1, 3])));
        assert!(validate_section_metadata(&[]));

        assert!(!validate_section_metadata(&with_orders(&[1, 2, 4])));
        assert!(!validate_section_metadata(&with_orders(&[1, 1, 2])));
        assert!(!validate_section_metadata(&with_orders(&[0, 1, 2])));
    }

    #[test]
    fn test_validate_ignores_duplicate_slugs() {
        let mut sections = with_orders(&[1, 2]);
        sections[1].slug = sections[0].slug.clone();
        assert!(validate_section_metadata(&sections));
    }

    #[test]
    fn test_validate_value_accepts_well_typed() {
        let value = serde_json::to_value(concept_section_metadata()).unwrap();
        assert!(validate_section_metadata_value(&value));
        assert!(validate_section_metadata_value(&json!([])));
    }

    #[test]
    fn test_validate_value_rejects_bad_types() {
        let value = json!([
            {"slug": "a", "title": "A", "is_done": "yes", "is_collapsed": false, "order": 1}
        ]);
        assert!(!validate_section_metadata_value(&value));

        let value = json!([{"slug": "a", "title": "A", "is_done": true, "order": 1}]);
        assert!(!validate_section_metadata_value(&value));

        let value = json!([
            {"slug": "a", "title": "A", "is_done": true, "is_collapsed": false, "order": "1"}
        ]);
        assert!(!validate_section_metadata_value(&value));

        assert!(!validate_section_metadata_value(&json!({"slug": "a"})));
    }

    #[test]
    fn test_validate_value_rejects_gap() {
        let value = json!([
            {"slug": "a", "title": "A", "is_done": true, "is_collapsed": false, "order": 1},
            {"slug": "b", "title": "B", "is_done": false, "is_collapsed": false, "order": 3}
        ]);
        assert!(!validate_section_metadata_value(&value));
    }

    #[test]
    fn test_validate_progress_counts() {
        let mut artifact = example_artifact();
        assert!(validate_progress_counts(&artifact));

        artifact.sections_complete = 3;
        assert!(!validate_progress_counts(&artifact));

        artifact.sections_complete = 2;
        artifact.sections_total = 7;
        assert!(!validate_progress_counts(&artifact));
    }

    #[test]
    fn test_check_section_metadata_reports_all() {
        let mut sections = with_orders(&[1, 2, 4]);
        sections[1].slug = sections[0].slug.clone();
        sections[2].slug = "Not Safe".to_string();
        sections[2].title = "  ".to_string();

        let issues = check_section_metadata(&sections);
        assert!(issues.contains(&MetadataIssue::OrderSequence { orders: vec![1, 2, 4] }));
        assert!(issues.contains(&MetadataIssue::DuplicateSlug { slug: "s-0".to_string() }));
        assert!(issues.contains(&MetadataIssue::InvalidSlug {
            slug: "Not Safe".to_string()
        }));
        assert!(issues.contains(&MetadataIssue::EmptyTitle {
            slug: "Not Safe".to_string()
        }));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_check_clean_metadata() {
        assert!(check_section_metadata(&concept_section_metadata()).is_empty());
        assert!(check_progress_counts(&example_artifact()).is_empty());
    }

    #[test]
    fn test_check_progress_counts() {
        let mut artifact = example_artifact();
        artifact.sections_total = 5;
        artifact.sections_complete = 0;

        let issues = check_progress_counts(&artifact);
        assert_eq!(
            issues,
            vec![
                MetadataIssue::TotalMismatch { cached: 5, actual: 6 },
                MetadataIssue::CompleteMismatch { cached: 0, actual: 2 },
            ]
        );
        assert!(issues[0].to_string().contains("6 sections"));
    }
}
