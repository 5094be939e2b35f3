//! Tag vocabulary shared by the reconciler, the fetcher, and the corpus
//! normalization pass.
//!
//! Two fixed literals partition the tag space:
//! - [`MANAGED_TAG`] marks a remote note as owned by this tool; notes
//!   without it are invisible to reconciliation.
//! - [`MANUAL_TAG_PREFIX`] marks a tag as user-owned; such tags are never
//!   removed by the engine.

use std::collections::BTreeSet;

/// Marker tag carried by every note this tool manages.
pub const MANAGED_TAG: &str = "managed::recall";

/// Prefix of user-owned tags. Anything under this namespace belongs to the
/// human, not to the corpus.
pub const MANUAL_TAG_PREFIX: &str = "my::";

/// True when a tag is in the user-owned namespace.
pub fn is_manual(tag: &str) -> bool {
    tag.starts_with(MANUAL_TAG_PREFIX)
}

/// Parse the space-separated boundary form (CSV `Tags` column, gateway
/// payloads) into a set. Empty segments collapse away.
pub fn parse_tags(joined: &str) -> BTreeSet<String> {
    joined.split_whitespace().map(str::to_owned).collect()
}

/// Serialize a tag list back to the space-joined boundary form.
pub fn join_tags<'a, I>(tags: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    tags.into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a tag set into `(manual, other)` on the manual prefix.
pub fn partition(tags: &BTreeSet<String>) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut manual = BTreeSet::new();
    let mut other = BTreeSet::new();
    for tag in tags {
        if is_manual(tag) {
            manual.insert(tag.clone());
        } else {
            other.insert(tag.clone());
        }
    }
    (manual, other)
}
