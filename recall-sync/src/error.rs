//! Error types for recall-sync.

use thiserror::Error;

use recall_core::CorpusError;
use recall_gateway::GatewayError;

/// All errors that can abort a sync run.
///
/// Failures of individual apply operations are not errors: they are
/// collected per item in [`crate::ApplyReport`] and the run continues.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The corpus could not be read (absent root is the usual case).
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// A gateway call failed before any mutation was attempted
    /// (model bootstrap or remote state fetch).
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}
