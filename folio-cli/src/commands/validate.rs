//! Validate command implementation

use super::decode_file;
use anyhow::{bail, Result};
use folio_core::segment;

/// Validate an FB2 file
pub fn validate(input: &str) -> Result<()> {
    match decode_file(input)? {
        Ok(doc) => {
            println!("Valid FB2 file");
            println!("  Title: {}", doc.title());
            println!("  Blocks: {}", segment(&doc.full_text).len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Invalid FB2 file ({}): {}", e.user_message(), e);
            bail!("Validation failed for {}", input);
        }
    }
}
