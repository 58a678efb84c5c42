//! Library commands: listing, reading positions and status changes

use super::parse_id;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use folio_core::storage::RecordStore;
use folio_core::{ReaderSession, ReadingStatus, ScrollTarget, Viewport, ViewportReport};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ListEntry {
    id: String,
    title: String,
    author: String,
    genre: String,
    status: ReadingStatus,
    progress: f32,
}

/// Viewport standing in for a display that reports a fixed layout
struct FixedViewport {
    report: Option<ViewportReport>,
    scrolled_to: Option<ScrollTarget>,
}

impl FixedViewport {
    fn new(report: Option<ViewportReport>) -> Self {
        Self {
            report,
            scrolled_to: None,
        }
    }
}

impl Viewport for FixedViewport {
    fn first_visible(&self) -> Option<ViewportReport> {
        self.report
    }

    fn scroll_to(&mut self, target: ScrollTarget) {
        self.scrolled_to = Some(target);
    }
}

/// List all books in the library
pub async fn list(config: &Config, json: bool) -> Result<()> {
    let store = config.open_store().await?;
    let records = store.list().await?;

    let entries: Vec<ListEntry> = records
        .into_iter()
        .map(|r| ListEntry {
            id: r.id.to_string(),
            progress: r.progress(),
            title: r.title,
            author: r.author,
            genre: r.genre,
            status: r.status,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Library is empty");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{}  {:<8} {:>3.0}%  {} / {} [{}]",
            entry.id, entry.status, entry.progress, entry.title, entry.author, entry.genre
        );
    }

    Ok(())
}

/// Show the stored reading position and where a reader would resume
pub async fn position(config: &Config, id: &str) -> Result<()> {
    let book_id = parse_id(id)?;
    let store = Arc::new(config.open_store().await?);
    let session = ReaderSession::open(store, book_id)
        .await
        .with_context(|| format!("Failed to open book {}", book_id))?;

    let stored = session.position();
    println!("Title:    {}", session.title());
    println!("Blocks:   {}", session.blocks().len());
    println!(
        "Position: block {} offset {} ({}%)",
        stored.block_index, stored.block_offset, stored.percent
    );

    let mut viewport = FixedViewport::new(None);
    session.resume(&mut viewport);
    match viewport.scrolled_to {
        Some(target) => {
            println!(
                "Resume:   block {} top {}",
                target.block_index, target.top_offset
            );
            if let Some(block) = session.blocks().get(target.block_index) {
                println!("          {}", preview(block, 60));
            }
        }
        None => println!("Resume:   no content"),
    }

    Ok(())
}

/// Record a reading position from a reported viewport layout
pub async fn capture(
    config: &Config,
    id: &str,
    block: usize,
    top: i64,
    height: Option<i64>,
) -> Result<()> {
    let book_id = parse_id(id)?;
    let store = Arc::new(config.open_store().await?);
    let mut session = ReaderSession::open(store, book_id)
        .await
        .with_context(|| format!("Failed to open book {}", book_id))?;

    let viewport = FixedViewport::new(Some(ViewportReport::new(block, top, height)));
    match session.pause(&viewport).await {
        Some(saved) => {
            println!(
                "Saved position: block {} offset {} ({}%)",
                saved.block_index, saved.block_offset, saved.percent
            );
            Ok(())
        }
        None if session.blocks().is_empty() => {
            bail!("'{}' has no readable content", session.title())
        }
        None => bail!("Failed to save reading position for {}", book_id),
    }
}

/// Change the reading status of a book
pub async fn status(config: &Config, id: &str, status: ReadingStatus) -> Result<()> {
    let book_id = parse_id(id)?;
    let store = config.open_store().await?;
    let mut record = store
        .get(book_id)
        .await?
        .with_context(|| format!("No book with id {}", book_id))?;

    record.set_status(status);
    store.put(record.clone()).await?;

    tracing::info!("Set status of {} to {}", record.id, record.status);
    println!("'{}' is now {}", record.title, record.status);
    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
