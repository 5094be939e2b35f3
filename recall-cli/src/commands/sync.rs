//! `recall sync` — reconcile the corpus against the remote collection.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use recall_core::types::DEFAULT_MODEL;
use recall_gateway::{HttpGateway, DEFAULT_ENDPOINT};
use recall_sync::{pipeline, SyncReport};

/// Arguments for `recall sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Corpus root (the directory containing `cards/`).
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Gateway endpoint.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub url: String,

    /// Compute and report the plan against live remote state without
    /// applying anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let gateway = HttpGateway::new(self.url);

        let report = pipeline::run(&self.root, &gateway, self.dry_run, |collision| {
            eprintln!(
                "{} duplicate identity '{}' — keeping the later record",
                "warning:".yellow().bold(),
                collision.identity,
            );
        })
        .with_context(|| format!("sync failed for '{}'", self.root.display()))?;

        print_report(&self.root, &report, self.dry_run);

        if !report.is_clean() {
            bail!("{} operation(s) failed", report.failures.len());
        }
        Ok(())
    }
}

fn print_report(root: &std::path::Path, report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    if report.model_created {
        println!("{prefix}✓ created note model '{DEFAULT_MODEL}'");
    }

    println!(
        "{prefix}✓ '{}' synced ({} added, {} updated, {} deleted)",
        root.display(),
        report.added,
        report.updated,
        report.deleted,
    );

    if report.skipped_blank > 0 {
        println!(
            "  ·  {} record(s) without identity skipped",
            report.skipped_blank
        );
    }

    for failure in &report.failures {
        let subject = failure
            .identity
            .as_ref()
            .map(|i| i.to_string())
            .unwrap_or_else(|| "(batch)".to_owned());
        println!(
            "  {}  {} {}: {}",
            "✗".red().bold(),
            failure.op,
            subject,
            failure.reason,
        );
    }
}
