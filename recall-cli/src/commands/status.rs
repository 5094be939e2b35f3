//! `recall status` — local corpus summary, no gateway contact.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use recall_core::corpus::{cards_dir_at, csv_files_under, read_card_file};
use recall_core::types::Identity;
use recall_core::CorpusError;

/// Arguments for `recall status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Corpus root (the directory containing `cards/`).
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let report = build_report(&self.root)
            .with_context(|| format!("status failed for '{}'", self.root.display()))?;

        if self.json {
            print_json(&report)?;
            return Ok(());
        }
        print_table(&report);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct FileStatus {
    file: String,
    records: usize,
    blank_identity: usize,
    duplicate_identity: usize,
}

#[derive(Debug, Serialize)]
struct StatusSummary {
    files: usize,
    records: usize,
    blank_identity: usize,
    duplicate_identity: usize,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    summary: StatusSummary,
    files: Vec<FileStatus>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "records")]
    records: usize,
    #[tabled(rename = "no identity")]
    blank: usize,
    #[tabled(rename = "duplicates")]
    duplicates: usize,
}

/// Walk the corpus in load order, counting what reconciliation would see.
/// Duplicate counting is global: a record is a duplicate when its identity
/// already appeared earlier in the corpus, matching the desired-set
/// last-wins resolution.
fn build_report(root: &std::path::Path) -> Result<StatusReport, CorpusError> {
    let dir = cards_dir_at(root);
    if !dir.exists() {
        return Err(CorpusError::CorpusNotFound { path: dir });
    }

    let mut seen: BTreeSet<Identity> = BTreeSet::new();
    let mut files = Vec::new();
    for path in csv_files_under(&dir)? {
        let records = read_card_file(&path)?;
        let mut row = FileStatus {
            file: path
                .strip_prefix(&dir)
                .unwrap_or(&path)
                .display()
                .to_string(),
            records: records.len(),
            blank_identity: 0,
            duplicate_identity: 0,
        };
        for record in records {
            if record.identity.is_blank() {
                row.blank_identity += 1;
            } else if !seen.insert(record.identity.clone()) {
                row.duplicate_identity += 1;
            }
        }
        files.push(row);
    }

    let summary = StatusSummary {
        files: files.len(),
        records: files.iter().map(|f| f.records).sum(),
        blank_identity: files.iter().map(|f| f.blank_identity).sum(),
        duplicate_identity: files.iter().map(|f| f.duplicate_identity).sum(),
    };
    Ok(StatusReport { summary, files })
}

fn print_json(report: &StatusReport) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(report).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(report: &StatusReport) {
    println!(
        "Recall v{} | {} files | {} records | {} without identity | {} duplicates",
        env!("CARGO_PKG_VERSION"),
        report.summary.files,
        report.summary.records,
        report.summary.blank_identity,
        report.summary.duplicate_identity,
    );

    if report.files.is_empty() {
        println!("No corpus files found under cards/.");
        return;
    }

    let rows: Vec<StatusTableRow> = report
        .files
        .iter()
        .map(|f| StatusTableRow {
            file: f.file.clone(),
            records: f.records,
            blank: f.blank_identity,
            duplicates: f.duplicate_identity,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
