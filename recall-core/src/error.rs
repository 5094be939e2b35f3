//! Error types for recall-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from corpus access.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus root (`<root>/cards`) does not exist. This is the only
    /// fatal condition the loader raises; malformed rows are tolerated.
    #[error("corpus directory not found at {}", .path.display())]
    CorpusNotFound { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be read at all (encoding, I/O mid-file).
    /// Individual malformed rows never produce this.
    #[error("failed to read CSV at {}: {}", .path.display(), .source)]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Convenience constructor for [`CorpusError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CorpusError {
    CorpusError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`CorpusError::Csv`].
pub(crate) fn csv_err(path: impl Into<PathBuf>, source: csv::Error) -> CorpusError {
    CorpusError::Csv {
        path: path.into(),
        source,
    }
}
