//! # recall-sync
//!
//! The reconciliation engine. Given the desired record set (local corpus)
//! and the observed remote set (managed notes behind the gateway), compute
//! and apply the minimal add/update/delete operations, merging
//! machine-managed tags with user-owned ones without ever deleting the
//! latter.
//!
//! Call [`pipeline::run`] for the whole flow, or use the stages directly:
//! [`desired::build_desired`] → [`snapshot::fetch`] → [`plan::reconcile`]
//! → [`apply::apply`].

pub mod apply;
pub mod desired;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod schema;
pub mod snapshot;
pub mod tags;

pub use apply::{ApplyFailure, ApplyReport, OpKind};
pub use desired::{DesiredSet, DuplicateIdentity};
pub use error::SyncError;
pub use pipeline::{run, SyncReport};
pub use plan::SyncPlan;
pub use snapshot::RemoteSnapshot;
pub use tags::TagDelta;
