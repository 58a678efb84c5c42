//! CLI command implementations

mod batch;
mod blocks;
mod import;
mod info;
mod library;
mod validate;

pub use batch::batch;
pub use blocks::blocks;
pub use import::import;
pub use info::info;
pub use library::{capture, list, position, status};
pub use validate::validate;

use anyhow::{Context, Result};
use folio_core::decoder::decoder_for_extension;
use folio_core::{BookId, ParseError, ParsedDocument};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decode a document file, choosing the decoder by extension
///
/// The outer error carries file context; the inner one is the decoder's.
pub(crate) fn decode_file(input: &str) -> Result<std::result::Result<ParsedDocument, ParseError>> {
    let input_path = Path::new(input);

    // Get file extension
    let ext = input_path
        .extension()
        .and_then(|e| e.to_str())
        .context("Could not determine input file extension")?;

    // Get decoder
    let decoder = decoder_for_extension(ext)
        .with_context(|| format!("No decoder available for .{} files", ext))?;

    let file =
        File::open(input_path).with_context(|| format!("Failed to open input file: {}", input))?;
    let mut reader = BufReader::new(file);

    Ok(decoder.decode(&mut reader))
}

/// Decode a document file, treating decoder failures as errors
pub(crate) fn read_document(input: &str) -> Result<ParsedDocument> {
    decode_file(input)?.with_context(|| format!("Failed to decode {}", input))
}

/// Parse a book identifier argument
pub(crate) fn parse_id(id: &str) -> Result<BookId> {
    id.trim()
        .parse()
        .with_context(|| format!("'{}' is not a valid book id", id))
}
