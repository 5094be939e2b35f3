//! Desired-set construction.
//!
//! Folds loaded corpus records into an identity-keyed map, in load order.
//! Records with a blank identity are invisible to reconciliation; they
//! are counted and skipped, never an error. When two records share an
//! identity, the later one in load order wins; the collision is surfaced
//! to a caller-supplied sink instead of being silently dropped or raised.

use indexmap::IndexMap;

use recall_core::types::{CardRecord, Identity};

/// A duplicate-identity collision observed while building the desired set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdentity {
    pub identity: Identity,
    /// The record that won (later in load order).
    pub kept: CardRecord,
    /// The record that was displaced.
    pub dropped: CardRecord,
}

/// The desired side of reconciliation.
#[derive(Debug, Default)]
pub struct DesiredSet {
    /// Identity-keyed records, in first-seen order.
    pub by_identity: IndexMap<Identity, CardRecord>,
    /// Records excluded for having a blank identity.
    pub skipped_blank: usize,
}

/// Build the desired set from records in load order.
///
/// `on_duplicate` receives every collision as it happens; the caller
/// decides whether to warn, count, or ignore.
pub fn build_desired(
    records: Vec<CardRecord>,
    mut on_duplicate: impl FnMut(DuplicateIdentity),
) -> DesiredSet {
    let mut set = DesiredSet::default();
    for record in records {
        if record.identity.is_blank() {
            set.skipped_blank += 1;
            continue;
        }
        let identity = record.identity.clone();
        if let Some(dropped) = set.by_identity.insert(identity.clone(), record.clone()) {
            on_duplicate(DuplicateIdentity {
                identity,
                kept: record,
                dropped,
            });
        }
    }
    set
}
