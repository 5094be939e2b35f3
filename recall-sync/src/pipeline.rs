//! Shared sync pipeline entrypoint used by the CLI.
//!
//! Load corpus → build desired set → bootstrap model → observe remote →
//! reconcile → apply. Remote state is re-fetched on every run; nothing is
//! cached across invocations and handles never outlive a run.

use std::path::Path;

use recall_core::corpus::load_corpus_at;
use recall_gateway::Gateway;

use crate::apply::{apply, ApplyFailure};
use crate::desired::{build_desired, DuplicateIdentity};
use crate::error::SyncError;
use crate::plan::reconcile;
use crate::{schema, snapshot};

/// Aggregate outcome of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Local records excluded for having a blank identity.
    pub skipped_blank: usize,
    /// True when this run created the note model (first contact).
    pub model_created: bool,
    /// Per-item application failures; empty on a clean run.
    pub failures: Vec<ApplyFailure>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run the full pipeline for the corpus at `root`.
///
/// The corpus is read before the first gateway call, so a missing corpus
/// aborts without touching the remote side. With `dry_run` set, no
/// mutating gateway call is issued (the remote read still happens, so the
/// plan is computed against live state). Duplicate-identity collisions go
/// to `on_duplicate` as they are found.
pub fn run(
    root: &Path,
    gateway: &dyn Gateway,
    dry_run: bool,
    on_duplicate: impl FnMut(DuplicateIdentity),
) -> Result<SyncReport, SyncError> {
    let records = load_corpus_at(root)?;
    tracing::debug!("loaded {} corpus records", records.len());

    let desired = build_desired(records, on_duplicate);

    let model_created = if dry_run {
        false
    } else {
        schema::ensure_model(gateway)?
    };

    let observed = snapshot::fetch(gateway)?;
    let plan = reconcile(&desired.by_identity, &observed);
    tracing::debug!(
        "plan: {} add, {} update, {} delete",
        plan.to_add.len(),
        plan.to_update.len(),
        plan.to_delete.len()
    );

    let applied = apply(gateway, &plan, dry_run);

    Ok(SyncReport {
        added: applied.added,
        updated: applied.updated,
        deleted: applied.deleted,
        skipped_blank: desired.skipped_blank,
        model_created,
        failures: applied.failures,
    })
}
