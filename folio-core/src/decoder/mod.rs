//! Decoders turning e-book documents into [`ParsedDocument`]s

mod fb2;

pub use fb2::Fb2Decoder;

use crate::error::ParseError;
use crate::types::ParsedDocument;
use std::io::Read;

/// Trait for decoding e-book formats into metadata and plain text
pub trait DocumentDecoder: Send + Sync {
    /// Decode a document from a reader
    fn decode(&self, reader: &mut dyn Read) -> Result<ParsedDocument, ParseError>;

    /// File extensions this decoder supports
    fn supported_extensions(&self) -> &[&str];

    /// MIME types this decoder supports
    fn supported_mime_types(&self) -> &[&str];
}

/// Get the appropriate decoder for a file extension
pub fn decoder_for_extension(ext: &str) -> Option<Box<dyn DocumentDecoder>> {
    match ext.to_lowercase().as_str() {
        "fb2" => Some(Box::new(Fb2Decoder::new())),
        _ => None,
    }
}

/// Get the appropriate decoder for a MIME type
pub fn decoder_for_mime_type(mime: &str) -> Option<Box<dyn DocumentDecoder>> {
    match mime {
        "application/x-fictionbook+xml" | "application/x-fictionbook" | "text/fb2+xml" => {
            Some(Box::new(Fb2Decoder::new()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_lookup() {
        assert!(decoder_for_extension("fb2").is_some());
        assert!(decoder_for_extension("FB2").is_some());
        assert!(decoder_for_extension("epub").is_none());

        assert!(decoder_for_mime_type("application/x-fictionbook+xml").is_some());
        assert!(decoder_for_mime_type("application/pdf").is_none());
    }
}
