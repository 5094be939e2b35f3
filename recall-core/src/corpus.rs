//! CSV corpus access.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   cards/
//!     <any>/<nesting>/*.csv   (first row is the header)
//! ```
//!
//! Every function takes the corpus root explicitly so tests can point at a
//! `TempDir`. Loading is lenient by contract: missing cells are empty
//! strings, short and long rows are tolerated, and an unparsable row is
//! skipped rather than raised. The only fatal condition is an absent
//! `cards/` directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{csv_err, io_err, CorpusError};
use crate::types::{CardRecord, DeckName, Identity, ModelName, DEFAULT_DECK, DEFAULT_MODEL};
use crate::tags::parse_tags;

/// Name of the corpus directory under the root.
pub const CARDS_DIR: &str = "cards";

/// Header column holding the identity; also embedded in `fields`.
pub const IDENTITY_COLUMN: &str = "NoteID";

/// Meta columns routed to record attributes instead of content fields.
pub const DECK_COLUMN: &str = "Deck";
pub const MODEL_COLUMN: &str = "NoteType";
pub const TAGS_COLUMN: &str = "Tags";

/// `<root>/cards` — pure, no I/O.
pub fn cards_dir_at(root: &Path) -> PathBuf {
    root.join(CARDS_DIR)
}

/// Load every card record under `<root>/cards`, in file-then-row order.
///
/// Files are visited in sorted path order so two runs over the same corpus
/// always produce the same sequence (the duplicate-identity resolution in
/// the sync layer depends on this).
pub fn load_corpus_at(root: &Path) -> Result<Vec<CardRecord>, CorpusError> {
    let dir = cards_dir_at(root);
    if !dir.exists() {
        return Err(CorpusError::CorpusNotFound { path: dir });
    }

    let mut records = Vec::new();
    for path in csv_files_under(&dir)? {
        records.extend(read_card_file(&path)?);
    }
    Ok(records)
}

/// Recursively list `*.csv` files under `dir`, sorted at every level.
pub fn csv_files_under(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let mut files = Vec::new();
    collect_csv_files(dir, &mut files)?;
    Ok(files)
}

fn collect_csv_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CorpusError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            collect_csv_files(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            out.push(path);
        }
    }
    Ok(())
}

/// Read one CSV file into card records.
///
/// Rows that the CSV parser rejects outright (unbalanced quoting and the
/// like) are skipped; a row is never a reason to fail the whole load.
pub fn read_card_file(path: &Path) -> Result<Vec<CardRecord>, CorpusError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_err(path, e))?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let Ok(row) = row else { continue };
        records.push(record_from_row(&headers, &row));
    }
    Ok(records)
}

fn record_from_row(headers: &[String], row: &csv::StringRecord) -> CardRecord {
    let cell = |name: &str| -> String {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| row.get(i))
            .unwrap_or("")
            .trim()
            .to_owned()
    };

    let identity = Identity::from(cell(IDENTITY_COLUMN));

    let deck = cell(DECK_COLUMN);
    let deck = if deck.is_empty() { DEFAULT_DECK.to_owned() } else { deck };

    let model = cell(MODEL_COLUMN);
    let model = if model.is_empty() { DEFAULT_MODEL.to_owned() } else { model };

    let tags: BTreeSet<String> = parse_tags(&cell(TAGS_COLUMN));

    // Content fields: every non-meta column in header order. The identity
    // column is a content field too; it must round-trip through the store.
    let mut fields = IndexMap::new();
    for (i, name) in headers.iter().enumerate() {
        if name == DECK_COLUMN || name == MODEL_COLUMN || name == TAGS_COLUMN {
            continue;
        }
        let value = row.get(i).unwrap_or("").trim().to_owned();
        fields.insert(name.clone(), value);
    }
    if !fields.contains_key(IDENTITY_COLUMN) {
        fields.insert(IDENTITY_COLUMN.to_owned(), identity.0.clone());
    }

    CardRecord {
        identity,
        deck: DeckName(deck),
        model: ModelName(model),
        fields,
        tags,
    }
}
