//! Filtered-deck spec export.
//!
//! The gateway cannot create filtered decks, so the specs are written to
//! `<root>/build/filtered_decks.json` for the host add-on to consume.

use std::path::{Path, PathBuf};

use crate::error::{io_err, DeckError};
use crate::practice::Practice;

/// Output directory under the root.
pub const BUILD_DIR: &str = "build";

/// Spec file name consumed by the add-on.
pub const SPECS_FILE: &str = "filtered_decks.json";

/// `<root>/build/filtered_decks.json` — pure, no I/O.
pub fn specs_path_at(root: &Path) -> PathBuf {
    root.join(BUILD_DIR).join(SPECS_FILE)
}

/// Write the spec file atomically (tmp + rename). Returns its path.
pub fn export_specs_at(root: &Path, practices: &[Practice]) -> Result<PathBuf, DeckError> {
    let path = specs_path_at(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid export path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(practices).map_err(|e| DeckError::Json {
        path: path.clone(),
        source: e,
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }

    tracing::info!("exported {} practice specs to {}", practices.len(), path.display());
    Ok(path)
}
