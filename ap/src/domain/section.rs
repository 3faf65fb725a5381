//! Section descriptors
//!
//! One `SectionMetadata` per document section. An artifact keeps them in a
//! list whose insertion order drives default display order.

use serde::{Deserialize, Serialize};

/// Metadata for one section of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMetadata {
    /// URL-safe identifier, unique within an artifact: "what-is-it"
    pub slug: String,

    /// Display title: "What Is It?"
    pub title: String,

    /// Completion checkbox state
    pub is_done: bool,

    /// UI collapse state, never counted towards progress
    pub is_collapsed: bool,

    /// Display order (1-based)
    pub order: u32,
}

impl SectionMetadata {
    /// Create a new, open and expanded section
    pub fn new(slug: impl Into<String>, title: impl Into<String>, order: u32) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            is_done: false,
            is_collapsed: false,
            order,
        }
    }

    /// Mark as done
    pub fn done(mut self) -> Self {
        self.is_done = true;
        self
    }

    /// Mark as collapsed
    pub fn collapsed(mut self) -> Self {
        self.is_collapsed = true;
        self
    }
}

/// Count descriptors with `is_done` set
pub fn count_done(sections: &[SectionMetadata]) -> u32 {
    sections.iter().filter(|s| s.is_done).count() as u32
}

/// Find the first descriptor with the given slug
pub fn find<'a>(sections: &'a [SectionMetadata], slug: &str) -> Option<&'a SectionMetadata> {
    sections.iter().find(|s| s.slug == slug)
}

/// Copy of `sections` with `is_done` set to `is_done` on every slug match
pub fn set_done(sections: &[SectionMetadata], slug: &str, is_done: bool) -> Vec<SectionMetadata> {
    map_matching(sections, slug, |s| s.is_done = is_done)
}

/// Copy of `sections` with `is_collapsed` set to `is_collapsed` on every slug match
pub fn set_collapsed(sections: &[SectionMetadata], slug: &str, is_collapsed: bool) -> Vec<SectionMetadata> {
    map_matching(sections, slug, |s| s.is_collapsed = is_collapsed)
}

/// Copy of `sections` with `is_collapsed` flipped on every slug match
pub fn toggle_collapsed(sections: &[SectionMetadata], slug: &str) -> Vec<SectionMetadata> {
    map_matching(sections, slug, |s| s.is_collapsed = !s.is_collapsed)
}

fn map_matching(
    sections: &[SectionMetadata],
    slug: &str,
    apply: impl Fn(&mut SectionMetadata),
) -> Vec<SectionMetadata> {
    sections
        .iter()
        .cloned()
        .map(|mut s| {
            if s.slug == slug {
                apply(&mut s);
            }
            s
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionMetadata> {
        vec![
            SectionMetadata::new("intro", "Intro", 1).done(),
            SectionMetadata::new("body", "Body", 2).collapsed(),
            SectionMetadata::new("outro", "Outro", 3),
        ]
    }

    #[test]
    fn test_count_done() {
        assert_eq!(count_done(&sections()), 1);
        assert_eq!(count_done(&[]), 0);
    }

    #[test]
    fn test_find() {
        let list = sections();
        assert_eq!(find(&list, "body").map(|s| s.order), Some(2));
        assert!(find(&list, "missing").is_none());
    }

    #[test]
    fn test_set_done_leaves_others_untouched() {
        let list = sections();
        let updated = set_done(&list, "outro", true);

        assert!(updated[2].is_done);
        assert_eq!(updated[0], list[0]);
        assert_eq!(updated[1], list[1]);

        let cleared = set_done(&updated, "intro", false);
        assert!(!cleared[0].is_done);
    }

    #[test]
    fn test_duplicate_slugs_all_updated() {
        let mut list = sections();
        list.push(SectionMetadata::new("body", "Body Again", 4));

        let updated = set_done(&list, "body", true);
        assert!(updated[1].is_done && updated[3].is_done);
        assert_eq!(count_done(&updated), 3);

        let toggled = toggle_collapsed(&list, "body");
        assert!(!toggled[1].is_collapsed);
        assert!(toggled[3].is_collapsed);
        // find still returns the first
        assert_eq!(find(&list, "body").map(|s| s.order), Some(2));
    }

    #[test]
    fn test_set_collapsed() {
        let updated = set_collapsed(&sections(), "body", false);
        assert!(!updated[1].is_collapsed);
        assert!(!updated[1].is_done);
    }

    #[test]
    fn test_toggle_collapsed_unknown_slug_is_noop() {
        let list = sections();
        assert_eq!(toggle_collapsed(&list, "nope"), list);
    }

    #[test]
    fn test_section_serde_field_names() {
        let json = serde_json::to_value(SectionMetadata::new("what-is-it", "What Is It?", 1)).unwrap();
        assert_eq!(json["slug"], "what-is-it");
        assert_eq!(json["is_done"], false);
        assert_eq!(json["is_collapsed"], false);
        assert_eq!(json["order"], 1);
    }
}
