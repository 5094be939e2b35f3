//! `recall decks` — export filtered-deck specs and upsert description notes.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use recall_decks::{build_infos, export_specs_at, load_practices_at};
use recall_gateway::{HttpGateway, DEFAULT_ENDPOINT};

/// Arguments for `recall decks`.
#[derive(Args, Debug)]
pub struct DecksArgs {
    /// Corpus root (the directory containing `practices/`).
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Gateway endpoint.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub url: String,

    /// Only write the spec file; skip the description-note upserts.
    #[arg(long)]
    pub export_only: bool,
}

impl DecksArgs {
    pub fn run(self) -> Result<()> {
        let load = load_practices_at(&self.root)
            .with_context(|| format!("failed to load practices under '{}'", self.root.display()))?;

        for (path, reason) in &load.failures {
            eprintln!(
                "{} unreadable practice {}: {reason}",
                "warning:".yellow().bold(),
                path.display(),
            );
        }

        let spec_path = export_specs_at(&self.root, &load.practices)
            .context("failed to export filtered-deck specs")?;
        println!(
            "✓ exported {} practice spec(s) to {}",
            load.practices.len(),
            spec_path.display(),
        );

        let mut failed = load.failures.len();

        if !self.export_only {
            let gateway = HttpGateway::new(self.url);
            let report = build_infos(&gateway, &load.practices)
                .context("failed to build practice description notes")?;

            println!("✓ upserted {} description note(s)", report.upserted.len());
            for (name, reason) in &report.failures {
                println!("  {}  {name}: {reason}", "✗".red().bold());
            }
            failed += report.failures.len();
        }

        if failed > 0 {
            bail!("{failed} practice item(s) failed");
        }
        Ok(())
    }
}
