//! Import command implementation

use crate::config::Config;
use anyhow::{bail, Context, Result};
use folio_core::decoder::decoder_for_extension;
use folio_core::ingest::Importer;
use folio_core::ReadingStatus;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Imported book summary
#[derive(Serialize)]
struct ImportSummary {
    id: String,
    title: String,
    author: String,
    genre: String,
    year: i32,
    status: ReadingStatus,
}

/// Import an FB2 book into the library
pub async fn import(config: &Config, input: &str, status: ReadingStatus, json: bool) -> Result<()> {
    let taxonomy = Arc::new(config.load_taxonomy()?);
    let store = Arc::new(config.open_store().await?);

    // Set up progress bar with animation
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    let ext = Path::new(input)
        .extension()
        .and_then(|e| e.to_str())
        .context("Could not determine input file extension")?;
    if decoder_for_extension(ext).is_none() {
        bail!("No decoder available for .{} files", ext);
    }

    pb.set_message("Reading...");
    let data = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to open input file: {}", input))?;

    // Parsed on the blocking pool, then stored
    pb.set_message("Importing...");
    let importer = Importer::new(store, taxonomy);
    let result = importer.import_bytes(data, status).await;
    pb.finish_and_clear();
    let record = result.with_context(|| format!("Failed to import {}", input))?;

    let summary = ImportSummary {
        id: record.id.to_string(),
        title: record.title,
        author: record.author,
        genre: record.genre,
        year: record.year,
        status: record.status,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Imported '{}' ({})", summary.title, summary.id);
        if !summary.author.is_empty() {
            println!("  Author: {}", summary.author);
        }
        println!("  Genre:  {}", summary.genre);
        if summary.year > 0 {
            println!("  Year:   {}", summary.year);
        }
        println!("  Status: {}", summary.status);
    }

    Ok(())
}
