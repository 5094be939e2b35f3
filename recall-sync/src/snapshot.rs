//! Remote state observation.
//!
//! One scoped query for notes carrying the managed marker, then full
//! detail for exactly that result set. Handles are rediscovered on every
//! run and never persisted; identity is the only correlation key.

use std::collections::BTreeMap;

use recall_core::corpus::IDENTITY_COLUMN;
use recall_core::tags::MANAGED_TAG;
use recall_core::types::{Identity, RemoteCard};
use recall_gateway::Gateway;

use crate::error::SyncError;

/// The observed side of reconciliation: identity → remote card, limited to
/// notes carrying the managed marker.
#[derive(Debug, Default, Clone)]
pub struct RemoteSnapshot {
    pub by_identity: BTreeMap<Identity, RemoteCard>,
}

impl RemoteSnapshot {
    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }
}

/// Fetch the current remote state.
///
/// Notes whose embedded identity field is blank are dropped: they cannot
/// be correlated and are left alone, like everything else outside the
/// managed scope.
pub fn fetch(gateway: &dyn Gateway) -> Result<RemoteSnapshot, SyncError> {
    let handles = gateway.find_notes(&format!("tag:{MANAGED_TAG}"))?;
    if handles.is_empty() {
        return Ok(RemoteSnapshot::default());
    }

    let infos = gateway.notes_info(&handles)?;
    let mut by_identity = BTreeMap::new();
    for info in infos {
        let identity = Identity::from(
            info.fields
                .get(IDENTITY_COLUMN)
                .map(|v| v.trim())
                .unwrap_or(""),
        );
        if identity.is_blank() {
            tracing::debug!("ignoring remote note {} with blank identity", info.handle);
            continue;
        }
        by_identity.insert(
            identity.clone(),
            RemoteCard {
                handle: info.handle,
                identity,
                tags: info.tags.into_iter().collect(),
            },
        );
    }

    tracing::debug!("observed {} managed notes", by_identity.len());
    Ok(RemoteSnapshot { by_identity })
}
