//! Reconciliation: classify desired vs. observed identities.
//!
//! Pure function over the two views. Each identity lands in exactly one of
//! the three sets; no ordering is guaranteed between different identities
//! beyond determinism of the inputs.

use indexmap::IndexMap;

use recall_core::types::{CardRecord, Identity, NoteHandle, RemoteCard};

use crate::snapshot::RemoteSnapshot;

/// Classified operations for one run.
#[derive(Debug, Default, Clone)]
pub struct SyncPlan {
    /// Desired records with no observed counterpart.
    pub to_add: Vec<CardRecord>,
    /// Desired records paired with their observed counterpart.
    pub to_update: Vec<(CardRecord, RemoteCard)>,
    /// Observed handles whose identity is no longer desired.
    pub to_delete: Vec<NoteHandle>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of planned operations.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_update.len() + self.to_delete.len()
    }
}

/// Diff the desired set against the observed snapshot.
///
/// A desired record with all-empty content fields is still added or
/// updated in full; the engine never suppresses "empty" records.
pub fn reconcile(
    desired: &IndexMap<Identity, CardRecord>,
    observed: &RemoteSnapshot,
) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for (identity, record) in desired {
        match observed.by_identity.get(identity) {
            Some(remote) => plan.to_update.push((record.clone(), remote.clone())),
            None => plan.to_add.push(record.clone()),
        }
    }

    for (identity, remote) in &observed.by_identity {
        if !desired.contains_key(identity) {
            plan.to_delete.push(remote.handle);
        }
    }

    plan
}
