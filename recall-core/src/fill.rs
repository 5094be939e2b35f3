//! Corpus column normalization pass.
//!
//! Runs before sync so every row carries the columns reconciliation keys
//! on. For each CSV under `<root>/cards`:
//! - ensure columns `NoteID`, `Deck`, `NoteType`, `Tags`, `UpdatedAt` exist
//!   (appended to the header when missing);
//! - fill blanks: fresh UUIDv4 identity, deck/model defaults, today's ISO
//!   date;
//! - derive `Difficulty` 1–6 from a CEFR `Level` column when one exists;
//! - append machine-managed tags (`managed::recall`, `source::…`,
//!   `file::…`, `level::…`) to `Tags`, preserving existing tag order.
//!
//! Files are rewritten atomically (tmp + rename) and only when something
//! actually changed.

use std::path::{Path, PathBuf};

use chrono::Local;
use uuid::Uuid;

use crate::corpus::{
    cards_dir_at, csv_files_under, DECK_COLUMN, IDENTITY_COLUMN, MODEL_COLUMN, TAGS_COLUMN,
};
use crate::error::{csv_err, io_err, CorpusError};
use crate::tags::MANAGED_TAG;
use crate::types::{DEFAULT_DECK, DEFAULT_MODEL};

/// Columns the pass guarantees to exist after a run.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    IDENTITY_COLUMN,
    DECK_COLUMN,
    MODEL_COLUMN,
    TAGS_COLUMN,
    "UpdatedAt",
];

/// Normalize every corpus CSV under `root`. Returns the paths rewritten.
pub fn fill_corpus_at(root: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let dir = cards_dir_at(root);
    if !dir.exists() {
        return Err(CorpusError::CorpusNotFound { path: dir });
    }

    let today = Local::now().date_naive().to_string();

    let mut modified = Vec::new();
    for path in csv_files_under(&dir)? {
        if fill_file(&path, &dir, &today)? {
            modified.push(path);
        }
    }
    Ok(modified)
}

/// Normalize one file. Returns true when the file was rewritten.
fn fill_file(path: &Path, cards_dir: &Path, today: &str) -> Result<bool, CorpusError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_err(path, e))?;
        rows.push(row.iter().map(str::to_owned).collect());
    }
    if rows.is_empty() {
        return Ok(false);
    }

    let mut changed = ensure_columns(&mut rows[0], &REQUIRED_COLUMNS);
    let mut header = rows[0].clone();

    // Level implies a Difficulty column.
    if column(&header, "Level").is_some() && column(&header, "Difficulty").is_none() {
        header.push("Difficulty".to_owned());
        rows[0] = header.clone();
        changed = true;
    }

    let width = header.len();
    let idx = |name: &str| column(&header, name);
    let identity_col = idx(IDENTITY_COLUMN).unwrap_or(0);
    let deck_col = idx(DECK_COLUMN).unwrap_or(0);
    let model_col = idx(MODEL_COLUMN).unwrap_or(0);
    let tags_col = idx(TAGS_COLUMN).unwrap_or(0);
    let updated_col = idx("UpdatedAt").unwrap_or(0);
    let level_col = idx("Level");
    let difficulty_col = idx("Difficulty");
    let sourcefile_col = idx("SourceFile");

    for row in rows.iter_mut().skip(1) {
        if row.len() < width {
            row.resize(width, String::new());
            changed = true;
        }

        changed |= fill_cell(row, identity_col, || Uuid::new_v4().to_string());
        changed |= fill_cell(row, deck_col, || DEFAULT_DECK.to_owned());
        changed |= fill_cell(row, model_col, || DEFAULT_MODEL.to_owned());
        changed |= fill_cell(row, updated_col, || today.to_owned());

        if let (Some(level_col), Some(difficulty_col)) = (level_col, difficulty_col) {
            let level = row[level_col].trim().to_owned();
            if is_empty(&row[difficulty_col]) && !level.is_empty() {
                if let Some(d) = difficulty_from_level(&level) {
                    row[difficulty_col] = d.to_owned();
                    changed = true;
                }
            }
        }

        let level = level_col.map(|i| row[i].trim().to_owned()).unwrap_or_default();
        let sourcefile = derive_sourcefile(path, cards_dir, row, sourcefile_col);
        let managed = managed_tags_for(&sourcefile, &level);

        let merged = merge_tag_string(&row[tags_col], &managed);
        if merged != row[tags_col] {
            row[tags_col] = merged;
            changed = true;
        }

        if let Some(sourcefile_col) = sourcefile_col {
            if is_empty(&row[sourcefile_col]) {
                row[sourcefile_col] = sourcefile;
                changed = true;
            }
        }
    }

    if changed {
        write_rows(path, &rows)?;
    }
    Ok(changed)
}

/// True if a CSV cell should be treated as empty.
fn is_empty(cell: &str) -> bool {
    cell.trim().is_empty()
}

fn fill_cell(row: &mut [String], col: usize, default: impl FnOnce() -> String) -> bool {
    if is_empty(&row[col]) {
        row[col] = default();
        true
    } else {
        false
    }
}

fn column(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|h| h == name)
}

/// Append any missing required columns to the header. Returns true if the
/// header grew.
fn ensure_columns(header: &mut Vec<String>, required: &[&str]) -> bool {
    let mut changed = false;
    for col in required {
        if !header.iter().any(|h| h == col) {
            header.push((*col).to_owned());
            changed = true;
        }
    }
    changed
}

/// Default difficulty number for a CEFR level string.
fn difficulty_from_level(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_uppercase().as_str() {
        "A1" => Some("1"),
        "A2" => Some("2"),
        "B1" => Some("3"),
        "B2" => Some("4"),
        "C1" => Some("5"),
        "C2" => Some("6"),
        _ => None,
    }
}

/// SourceFile from the row when set, otherwise the file's path relative to
/// `cards/` (posix separators).
fn derive_sourcefile(
    path: &Path,
    cards_dir: &Path,
    row: &[String],
    sourcefile_col: Option<usize>,
) -> String {
    if let Some(col) = sourcefile_col {
        if !is_empty(&row[col]) {
            return row[col].trim().to_owned();
        }
    }
    let rel = path.strip_prefix(cards_dir).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Machine-managed tags for a row: the marker plus source/file/level facets.
fn managed_tags_for(sourcefile: &str, level: &str) -> Vec<String> {
    let mut tags = vec![MANAGED_TAG.to_owned()];

    let sourcefile = sourcefile.trim();
    if !sourcefile.is_empty() {
        let p = Path::new(sourcefile);
        if let Some(folder) = p.components().next() {
            let folder = folder.as_os_str().to_string_lossy();
            tags.push(format!("source::{folder}"));
        }
        if let Some(stem) = p.file_stem() {
            tags.push(format!("file::{}", stem.to_string_lossy()));
        }
    }

    let level = level.trim();
    if !level.is_empty() {
        tags.push(format!("level::{}", level.to_ascii_uppercase()));
    }
    tags
}

/// Merge tags into the space-joined column value, preserving existing order
/// and appending only what is missing.
fn merge_tag_string(existing: &str, to_add: &[String]) -> String {
    let mut out: Vec<String> = existing.split_whitespace().map(str::to_owned).collect();
    for tag in to_add {
        if !out.iter().any(|t| t == tag) {
            out.push(tag.clone());
        }
    }
    out.join(" ")
}

/// Atomically rewrite a CSV: write to a `.tmp` sibling, then rename.
fn write_rows(path: &Path, rows: &[Vec<String>]) -> Result<(), CorpusError> {
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&tmp)
            .map_err(|e| csv_err(&tmp, e))?;
        for row in rows {
            writer.write_record(row).map_err(|e| csv_err(&tmp, e))?;
        }
        writer.flush().map_err(|e| io_err(&tmp, e))?;
    }
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}
