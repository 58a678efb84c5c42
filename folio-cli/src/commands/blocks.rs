//! Blocks command implementation

use super::read_document;
use anyhow::Result;
use folio_core::Blocks;

/// Print the reading blocks of an FB2 book
pub fn blocks(input: &str, limit: Option<usize>) -> Result<()> {
    let doc = read_document(input)?;
    let blocks = Blocks::from_text(&doc.full_text);

    let shown = limit.unwrap_or(blocks.len()).min(blocks.len());
    for (i, block) in blocks.iter().take(shown).enumerate() {
        println!("[{}] {}", i, block);
    }
    if shown < blocks.len() {
        println!("... {} more blocks", blocks.len() - shown);
    }

    Ok(())
}
