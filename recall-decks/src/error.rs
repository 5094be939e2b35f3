//! Error types for recall-decks.

use std::path::PathBuf;

use thiserror::Error;

use recall_gateway::GatewayError;

/// Errors that abort a whole deck build (per-practice failures are
/// aggregated in the reports instead).
#[derive(Debug, Error)]
pub enum DeckError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export artifact could not be serialized.
    #[error("JSON error at {}: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A gateway failure outside the per-practice loop (model bootstrap,
    /// deck creation).
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Convenience constructor for [`DeckError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DeckError {
    DeckError::Io {
        path: path.into(),
        source,
    }
}
