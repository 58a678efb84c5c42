//! Folio Core Library
//!
//! This crate provides the core of the Folio book tracker: FB2 ingestion into
//! metadata and plain text, genre normalization, segmentation of the text
//! into reading blocks, and block-addressed reading position tracking.
//! Persistence goes through the injected [`storage::RecordStore`].

pub mod decoder;
pub mod error;
pub mod genre;
pub mod ingest;
pub mod reader;
pub mod segment;
pub mod storage;
pub mod types;

pub use error::{ConfigError, FolioError, ParseError, Result, StorageError};
pub use genre::GenreTaxonomy;
pub use reader::{PositionTracker, ReaderSession, ScrollTarget, Viewport, ViewportReport};
pub use segment::{segment, Blocks};
pub use types::{BookId, BookRecord, ParsedDocument, ReadingPosition, ReadingStatus};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_segment() {
        let xml = "<FictionBook><description><book-title>Test Book</book-title></description>\
                   <body><p>One</p><p>Two</p></body></FictionBook>";
        let doc = ingest::parse_document(xml.as_bytes()).unwrap();
        assert_eq!(doc.title(), "Test Book");
        assert_eq!(segment(&doc.full_text), vec!["One", "Two"]);
    }
}
