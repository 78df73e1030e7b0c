//! Walks the annotated files and adds a `simple` marker to every empty
//! ref-mod slot that has a matching ref-form cell.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

pub mod cell;
pub mod config;
pub mod error;
pub mod insert;
pub mod query;

pub use cell::Cell;
pub use config::TagConfig;
pub use error::TagError;

use crate::exb::{self, Document};

/// Outcome of a batch run over one input directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub inserted: usize,
    pub failed: usize,
}

/// Process every `.exb` file under `input`. With an output directory, each
/// document is written there under its own file name; without one this is
/// a dry run that only reports what would change.
///
/// Per-file problems are reported on stderr and never abort the batch.
pub fn run(input: &Path, output: Option<&Path>, config: &TagConfig, debug: bool) -> Result<RunSummary> {
    if !input.is_dir() {
        anyhow::bail!("input directory {} does not exist", input.display());
    }
    if let Some(output) = output {
        fs::create_dir_all(output)
            .with_context(|| format!("creating output directory {}", output.display()))?;
    }

    let mut summary = RunSummary::default();
    for path in exb::exb_files_in(input) {
        match process_file(&path, output, config) {
            Ok(inserted) => {
                summary.files += 1;
                summary.inserted += inserted;
                if debug {
                    eprintln!("{}: {} cell(s) inserted", path.display(), inserted);
                }
            }
            Err(e) => {
                summary.failed += 1;
                eprintln!("{}: {:#}", path.display(), e);
            }
        }
    }

    print_summary(&summary, output.is_none());
    Ok(summary)
}

fn process_file(path: &Path, output: Option<&Path>, config: &TagConfig) -> Result<usize> {
    let mut document = exb::read_document(path).context("reading document")?;
    let inserted = tag_document(path, &mut document, config)?;
    if let Some(output) = output {
        let file_name = path.file_name().context("input path has no file name")?;
        exb::write_document(&output.join(file_name), &document).context("writing document")?;
    }
    Ok(inserted)
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let verb = if dry_run { "would insert" } else { "inserted" };
    let line = format!(
        "{} file(s) processed, {} cell(s) {}, {} failed",
        summary.files, summary.inserted, verb, summary.failed
    );
    if summary.failed > 0 {
        println!("{}", line.yellow());
    } else {
        println!("{}", line.green());
    }
}

/// Insert a sentinel cell into every empty mod slot of one parsed
/// document. Returns the number of cells inserted. Missing-tier
/// diagnostics go to stdout; the document is left as it was in that case.
pub fn tag_document(
    path: &Path,
    document: &mut Document,
    config: &TagConfig,
) -> Result<usize, TagError> {
    let base_tier = config.base_tier();
    if !document.has_tier(&base_tier) {
        println!("{}: Missing tier `{}`", path.display(), base_tier);
        return Ok(0);
    }

    let mut inserted = 0;
    for (form_tier, mod_tier) in tier_pairs(path, document, config) {
        inserted += tag_pair(document, &form_tier, &mod_tier, &config.sentinel)?;
    }
    Ok(inserted)
}

/// Collect `(ref-formN, ref-modN)` pairs for N = 1, 2, ... until a pair is
/// incomplete. A form tier without its mod counterpart gets a diagnostic;
/// scanning stops there either way.
fn tier_pairs(path: &Path, document: &Document, config: &TagConfig) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for n in 1.. {
        let form_tier = config.form_tier(n);
        if !document.has_tier(&form_tier) {
            break;
        }
        let mod_tier = config.mod_tier(n);
        if !document.has_tier(&mod_tier) {
            println!("{}: Missing tier `{}`", path.display(), mod_tier);
            break;
        }
        pairs.push((form_tier, mod_tier));
    }
    pairs
}

/// Fill the gaps of one form/mod tier pair. The mod tier's cells are
/// re-read for every form cell since each insertion changes them.
fn tag_pair(
    document: &mut Document,
    form_tier: &str,
    mod_tier: &str,
    sentinel: &str,
) -> Result<usize, TagError> {
    let form_cells = query::cells_in_tier(document, form_tier)?;

    let mut inserted = 0;
    for form_cell in &form_cells {
        let mod_cells = query::cells_in_tier(document, mod_tier)?;
        if query::cells_within(form_cell, &mod_cells).is_empty() {
            let simple_cell = Cell::new(mod_tier, form_cell.start, form_cell.end, sentinel);
            insert::insert_cell(document, &simple_cell)?;
            inserted += 1;
        }
    }
    Ok(inserted)
}
