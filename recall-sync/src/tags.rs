//! Tag-delta computation for a single update.
//!
//! The target tag set for a managed note is:
//! managed marker ∪ desired non-manual tags ∪ (remote manual ∪ desired
//! manual). Manual tags are unioned, never replaced, so a tag a human
//! added directly in the collection survives every sync. The removal set
//! is additionally filtered on the manual prefix, a second, categorical
//! guard making manual tags un-removable even if the target computation
//! ever regresses.

use std::collections::BTreeSet;

use recall_core::tags::{is_manual, partition, MANAGED_TAG};

/// Minimal tag operations turning `current` into the target set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDelta {
    /// Tags to add, sorted.
    pub to_add: Vec<String>,
    /// Tags to remove, sorted. Never contains a manual tag.
    pub to_remove: Vec<String>,
}

impl TagDelta {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute the delta between a note's current remote tags and the tags its
/// corpus record declares.
///
/// Applying `to_remove` then `to_add` to `current` yields exactly the
/// target; running again on the result with the same `desired` yields an
/// empty delta.
pub fn delta(current: &BTreeSet<String>, desired: &BTreeSet<String>) -> TagDelta {
    let (current_manual, _) = partition(current);
    let (desired_manual, desired_other) = partition(desired);

    // The marker always belongs to the target, declared or not.
    let mut target: BTreeSet<String> = desired_other;
    target.insert(MANAGED_TAG.to_owned());
    target.extend(current_manual);
    target.extend(desired_manual);

    let to_remove = current
        .difference(&target)
        .filter(|tag| !is_manual(tag))
        .cloned()
        .collect();
    let to_add = target.difference(current).cloned().collect();

    TagDelta { to_add, to_remove }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::tags::parse_tags;

    fn apply(current: &BTreeSet<String>, delta: &TagDelta) -> BTreeSet<String> {
        let mut out = current.clone();
        for tag in &delta.to_remove {
            out.remove(tag);
        }
        for tag in &delta.to_add {
            out.insert(tag.clone());
        }
        out
    }

    #[test]
    fn stale_managed_tag_swapped_manual_and_marker_untouched() {
        let current = parse_tags("managed::recall source::foo my::starred");
        let desired = parse_tags("source::bar");

        let d = delta(&current, &desired);
        assert_eq!(d.to_remove, vec!["source::foo".to_owned()]);
        assert_eq!(d.to_add, vec!["source::bar".to_owned()]);

        let after = apply(&current, &d);
        assert_eq!(after, parse_tags("managed::recall source::bar my::starred"));
    }

    #[test]
    fn delta_is_idempotent() {
        let current = parse_tags("managed::recall source::foo my::starred");
        let desired = parse_tags("source::bar my::new");

        let d = delta(&current, &desired);
        let after = apply(&current, &d);
        let again = delta(&after, &desired);
        assert!(again.is_empty(), "second delta should be empty, got {again:?}");
    }

    #[test]
    fn manual_tags_never_removed_even_when_absent_from_desired() {
        let current = parse_tags("managed::recall my::a my::b my::c");
        let desired = parse_tags("");

        let d = delta(&current, &desired);
        assert!(d.to_remove.is_empty());
        assert!(d.to_add.is_empty());
    }

    #[test]
    fn desired_manual_tags_are_added() {
        let current = parse_tags("managed::recall");
        let desired = parse_tags("my::starred source::x");

        let d = delta(&current, &desired);
        assert_eq!(
            d.to_add,
            vec!["my::starred".to_owned(), "source::x".to_owned()]
        );
        assert!(d.to_remove.is_empty());
    }

    #[test]
    fn marker_added_when_missing_remotely() {
        let current = parse_tags("source::x");
        let desired = parse_tags("source::x");

        let d = delta(&current, &desired);
        assert_eq!(d.to_add, vec![MANAGED_TAG.to_owned()]);
        assert!(d.to_remove.is_empty());
    }

    #[test]
    fn unknown_remote_non_manual_tags_are_removed() {
        let current = parse_tags("managed::recall stray::tag level::A1");
        let desired = parse_tags("level::A2");

        let d = delta(&current, &desired);
        assert_eq!(
            d.to_remove,
            vec!["level::A1".to_owned(), "stray::tag".to_owned()]
        );
        assert_eq!(d.to_add, vec!["level::A2".to_owned()]);
    }

    #[test]
    fn identical_sides_yield_empty_delta() {
        let current = parse_tags("managed::recall source::x my::kept");
        let desired = parse_tags("source::x");

        assert!(delta(&current, &desired).is_empty());
    }

    #[test]
    fn marker_in_desired_is_not_duplicated() {
        let current = parse_tags("");
        let desired = parse_tags("managed::recall source::x");

        let d = delta(&current, &desired);
        assert_eq!(
            d.to_add,
            vec!["managed::recall".to_owned(), "source::x".to_owned()]
        );
    }
}
