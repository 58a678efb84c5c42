//! Document ingestion: parse, normalize and merge into the library
//!
//! Parsing and segmentation are CPU-bound and pure, so they run on tokio's
//! blocking pool and hand back a complete result or an error. A caller that
//! loses interest drops (or cancels) the handle; the work has no side
//! effects, so its result is simply discarded.

use crate::decoder::Fb2Decoder;
use crate::error::{ParseError, Result, StorageError};
use crate::genre::GenreTaxonomy;
use crate::segment::Blocks;
use crate::storage::RecordStore;
use crate::types::{BookId, BookRecord, ParsedDocument, ReadingStatus};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Parse an in-memory FB2 document on the current thread
pub fn parse_document(data: &[u8]) -> std::result::Result<ParsedDocument, ParseError> {
    Fb2Decoder::new().parse_bytes(data)
}

/// A parse running on the blocking pool
pub struct BackgroundParse {
    handle: JoinHandle<std::result::Result<ParsedDocument, ParseError>>,
}

impl BackgroundParse {
    /// Start parsing `data` on a blocking worker
    pub fn spawn(data: Vec<u8>) -> Self {
        let handle = tokio::task::spawn_blocking(move || parse_document(&data));
        Self { handle }
    }

    /// Wait for the parse to finish
    pub async fn join(self) -> Result<ParsedDocument> {
        Ok(self.handle.await??)
    }

    /// Discard the result
    ///
    /// A parse already running finishes in the background, but its output is
    /// never observed.
    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Parse `data` on a blocking worker and wait for the result
pub async fn parse_in_background(data: Vec<u8>) -> Result<ParsedDocument> {
    BackgroundParse::spawn(data).join().await
}

/// Segment `text` on a blocking worker
pub async fn segment_in_background(text: String) -> Result<Blocks> {
    Ok(tokio::task::spawn_blocking(move || Blocks::from_text(&text)).await?)
}

/// Imports documents into a record store
#[derive(Clone)]
pub struct Importer {
    store: Arc<dyn RecordStore>,
    taxonomy: Arc<GenreTaxonomy>,
}

impl Importer {
    pub fn new(store: Arc<dyn RecordStore>, taxonomy: Arc<GenreTaxonomy>) -> Self {
        Self { store, taxonomy }
    }

    pub fn taxonomy(&self) -> &GenreTaxonomy {
        &self.taxonomy
    }

    /// Parse a document and store it as a new book
    pub async fn import_bytes(&self, data: Vec<u8>, status: ReadingStatus) -> Result<BookRecord> {
        let doc = parse_in_background(data).await?;
        self.import_parsed(&doc, status).await
    }

    /// Store an already parsed document as a new book
    pub async fn import_parsed(
        &self,
        doc: &ParsedDocument,
        status: ReadingStatus,
    ) -> Result<BookRecord> {
        let mut record = BookRecord::from_parsed(doc, &self.taxonomy);
        record.set_status(status);
        self.store.put(record.clone()).await?;

        tracing::info!(
            "Imported '{}' by '{}' as {} ({})",
            record.title,
            record.author,
            record.id,
            record.genre
        );
        Ok(record)
    }

    /// Parse a document and merge it into an existing book
    ///
    /// Status, rating, notes and reading position are kept.
    pub async fn reimport(&self, id: BookId, data: Vec<u8>) -> Result<BookRecord> {
        let mut record = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        let doc = parse_in_background(data).await?;
        record.apply_parsed(&doc, &self.taxonomy);
        self.store.put(record.clone()).await?;

        tracing::info!("Re-imported '{}' ({})", record.title, record.id);
        Ok(record)
    }
}
