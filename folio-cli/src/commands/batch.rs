//! Batch import command implementation

use crate::config::Config;
use anyhow::{bail, Context, Result};
use folio_core::decoder::decoder_for_extension;
use folio_core::ingest::{parse_document, Importer};
use folio_core::{ParsedDocument, ReadingStatus};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Batch import every supported book in a directory
///
/// Files are parsed in parallel; records are written one at a time so the
/// library file sees a single writer.
pub async fn batch(config: &Config, input_dir: &str, jobs: usize) -> Result<()> {
    let input_path = Path::new(input_dir);

    // Find all supported files
    let mut files: Vec<PathBuf> = fs::read_dir(input_path)
        .with_context(|| format!("Failed to read directory {}", input_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|ext| decoder_for_extension(ext).is_some())
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No supported files found in {}", input_dir);
        return Ok(());
    }

    println!("Found {} files to import", files.len());

    let taxonomy = Arc::new(config.load_taxonomy()?);
    let store = Arc::new(config.open_store().await?);
    let importer = Importer::new(store, taxonomy);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message("parsing");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build worker pool")?;

    let parsed: Vec<(PathBuf, Result<ParsedDocument>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let result = parse_file(path);
                pb.inc(1);
                (path.clone(), result)
            })
            .collect()
    });

    pb.set_message("saving");

    let mut success = 0usize;
    let mut errors = 0usize;
    for (path, result) in parsed {
        let outcome = match result {
            Ok(doc) => importer
                .import_parsed(&doc, ReadingStatus::Planned)
                .await
                .map(|_| ())
                .map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => success += 1,
            Err(e) => {
                errors += 1;
                tracing::error!("Failed to import {:?}: {:#}", path, e);
            }
        }
    }

    pb.finish_and_clear();

    println!("\nBatch import complete:");
    println!("  Success: {}", success);
    println!("  Errors:  {}", errors);

    if errors > 0 {
        bail!("Batch import completed with {} errors", errors);
    }

    Ok(())
}

fn parse_file(path: &Path) -> Result<ParsedDocument> {
    let data = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let doc = parse_document(&data)?;
    Ok(doc)
}
