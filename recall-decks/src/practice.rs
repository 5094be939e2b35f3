//! Practice definition loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, DeckError};

/// Name of the practice-definition directory under the root.
pub const PRACTICES_DIR: &str = "practices";

/// A single practice definition, as authored in
/// `<root>/practices/<name>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Practice {
    pub name: String,
    /// Name of the filtered deck the add-on should (re)build.
    pub deck: String,
    /// Collection search the filtered deck pulls from.
    pub search: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_order")]
    pub order: String,
    #[serde(default = "default_reschedule")]
    pub reschedule: bool,
    #[serde(default)]
    pub description: String,
}

fn default_limit() -> u32 {
    30
}

fn default_order() -> String {
    "random".to_owned()
}

fn default_reschedule() -> bool {
    true
}

impl Practice {
    /// Stable slug used as the practice's note identity.
    pub fn slug(&self) -> String {
        slug(&self.name)
    }
}

/// Lowercase, alphanumeric runs joined by single dashes.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Outcome of loading the practice directory.
#[derive(Debug, Default)]
pub struct PracticeLoad {
    /// Practices in sorted file order.
    pub practices: Vec<Practice>,
    /// Files that could not be read or parsed, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

/// `<root>/practices` — pure, no I/O.
pub fn practices_dir_at(root: &Path) -> PathBuf {
    root.join(PRACTICES_DIR)
}

/// Load every `*.json` practice under `<root>/practices`, sorted by file
/// name. A missing directory is an empty load; an unparsable file is a
/// per-file failure, never fatal.
pub fn load_practices_at(root: &Path) -> Result<PracticeLoad, DeckError> {
    let dir = practices_dir_at(root);
    if !dir.exists() {
        return Ok(PracticeLoad::default());
    }

    let mut entries: Vec<_> = std::fs::read_dir(&dir)
        .map_err(|e| io_err(&dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    entries.sort();

    let mut load = PracticeLoad::default();
    for path in entries {
        match read_practice(&path) {
            Ok(practice) => load.practices.push(practice),
            Err(reason) => {
                tracing::warn!("skipping practice {}: {reason}", path.display());
                load.failures.push((path, reason));
            }
        }
    }
    Ok(load)
}

fn read_practice(path: &Path) -> Result<Practice, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&contents).map_err(|e| e.to_string())
}
