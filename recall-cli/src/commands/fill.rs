//! `recall fill` — normalize corpus CSVs in place.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use recall_core::fill::fill_corpus_at;

/// Arguments for `recall fill`.
#[derive(Args, Debug)]
pub struct FillArgs {
    /// Corpus root (the directory containing `cards/`).
    #[arg(default_value = ".")]
    pub root: PathBuf,
}

impl FillArgs {
    pub fn run(self) -> Result<()> {
        let modified = fill_corpus_at(&self.root)
            .with_context(|| format!("fill failed for '{}'", self.root.display()))?;

        if modified.is_empty() {
            println!("✓ corpus already normalized — nothing to do");
            return Ok(());
        }

        println!("✓ normalized {} file(s)", modified.len());
        for path in &modified {
            println!("  ✎  {}", path.display());
        }
        Ok(())
    }
}
