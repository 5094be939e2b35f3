//! Batch application of a [`SyncPlan`].
//!
//! Fixed order: one batched create, then per-note field overwrite + tag
//! delta, then one batched delete. Field overwrites are unconditional
//! (no content diffing), so a converged corpus re-applies cleanly and the
//! cost is a few redundant writes.
//!
//! Each application (the add batch, every individual update, the delete
//! batch) is isolated: a gateway failure is recorded in the report and the
//! run continues with the remaining items.

use std::fmt;

use recall_core::tags::{join_tags, MANAGED_TAG};
use recall_core::types::{CardRecord, Identity};
use recall_gateway::{Gateway, GatewayError, NewNote};

use crate::plan::SyncPlan;
use crate::tags;

/// Which kind of operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Update,
    Delete,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Add => write!(f, "add"),
            OpKind::Update => write!(f, "update"),
            OpKind::Delete => write!(f, "delete"),
        }
    }
}

/// One isolated application failure.
#[derive(Debug, Clone)]
pub struct ApplyFailure {
    pub op: OpKind,
    /// Identity of the affected record; `None` when a whole batch failed.
    pub identity: Option<Identity>,
    pub reason: String,
}

/// Aggregate outcome of applying a plan.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Apply a plan through the gateway.
///
/// With `dry_run` set, no mutating call is issued; the report carries the
/// counts the real run would produce.
pub fn apply(gateway: &dyn Gateway, plan: &SyncPlan, dry_run: bool) -> ApplyReport {
    let mut report = ApplyReport::default();
    apply_adds(gateway, plan, dry_run, &mut report);
    apply_updates(gateway, plan, dry_run, &mut report);
    apply_deletes(gateway, plan, dry_run, &mut report);
    report
}

fn apply_adds(gateway: &dyn Gateway, plan: &SyncPlan, dry_run: bool, report: &mut ApplyReport) {
    if plan.to_add.is_empty() {
        return;
    }
    if dry_run {
        tracing::info!("[dry-run] would add {} notes", plan.to_add.len());
        report.added = plan.to_add.len();
        return;
    }

    let notes: Vec<NewNote> = plan.to_add.iter().map(new_note).collect();
    match gateway.add_notes(&notes) {
        Ok(handles) => {
            for (record, handle) in plan.to_add.iter().zip(handles) {
                if handle.is_some() {
                    report.added += 1;
                } else {
                    report.failures.push(ApplyFailure {
                        op: OpKind::Add,
                        identity: Some(record.identity.clone()),
                        reason: "rejected by gateway".to_owned(),
                    });
                }
            }
            tracing::info!("added {} notes", report.added);
        }
        Err(err) => report.failures.push(batch_failure(OpKind::Add, err)),
    }
}

fn apply_updates(gateway: &dyn Gateway, plan: &SyncPlan, dry_run: bool, report: &mut ApplyReport) {
    for (record, remote) in &plan.to_update {
        let delta = tags::delta(&remote.tags, &record.tags);
        if dry_run {
            report.updated += 1;
            continue;
        }
        match update_one(gateway, record, remote, &delta) {
            Ok(()) => report.updated += 1,
            Err(err) => report.failures.push(ApplyFailure {
                op: OpKind::Update,
                identity: Some(record.identity.clone()),
                reason: err.to_string(),
            }),
        }
    }
    if dry_run && !plan.to_update.is_empty() {
        tracing::info!("[dry-run] would update {} notes", plan.to_update.len());
    } else if report.updated > 0 {
        tracing::info!("updated {} notes", report.updated);
    }
}

/// Overwrite fields, then settle tags: at most one remove call and one add
/// call per note.
fn update_one(
    gateway: &dyn Gateway,
    record: &CardRecord,
    remote: &recall_core::types::RemoteCard,
    delta: &tags::TagDelta,
) -> Result<(), GatewayError> {
    gateway.update_note_fields(remote.handle, &record.fields)?;
    if !delta.to_remove.is_empty() {
        gateway.remove_tags(&[remote.handle], &join_tags(&delta.to_remove))?;
    }
    if !delta.to_add.is_empty() {
        gateway.add_tags(&[remote.handle], &join_tags(&delta.to_add))?;
    }
    Ok(())
}

fn apply_deletes(gateway: &dyn Gateway, plan: &SyncPlan, dry_run: bool, report: &mut ApplyReport) {
    if plan.to_delete.is_empty() {
        return;
    }
    if dry_run {
        tracing::info!("[dry-run] would delete {} notes", plan.to_delete.len());
        report.deleted = plan.to_delete.len();
        return;
    }

    match gateway.delete_notes(&plan.to_delete) {
        Ok(()) => {
            report.deleted = plan.to_delete.len();
            tracing::info!("deleted {} notes", report.deleted);
        }
        Err(err) => report.failures.push(batch_failure(OpKind::Delete, err)),
    }
}

fn batch_failure(op: OpKind, err: GatewayError) -> ApplyFailure {
    ApplyFailure {
        op,
        identity: None,
        reason: err.to_string(),
    }
}

/// A create payload: the managed marker first, then the record's declared
/// tags as-is (manual included; there is no prior remote state to merge).
fn new_note(record: &CardRecord) -> NewNote {
    let mut tag_list = vec![MANAGED_TAG.to_owned()];
    tag_list.extend(record.tags.iter().filter(|t| *t != MANAGED_TAG).cloned());
    NewNote {
        deck: record.deck.clone(),
        model: record.model.clone(),
        fields: record.fields.clone(),
        tags: tag_list,
    }
}
