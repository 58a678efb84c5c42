//! Splitting extracted text into reading blocks
//!
//! A block is the unit the display surface renders as one item and the unit
//! reading positions are addressed by. Segmentation is a pure function of
//! the text, so the same content always yields the same block indices and a
//! stored position stays meaningful across sessions.

use regex::Regex;
use std::sync::OnceLock;

fn blank_line_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{2,}").expect("static regex"))
}

/// Split text into ordered, non-empty, trimmed blocks
///
/// Blocks are separated by runs of two or more newlines. Text without any
/// blank-line separator is split on single newlines instead. Empty (or
/// whitespace-only) input yields no blocks.
pub fn segment(full_text: &str) -> Vec<String> {
    let normalized = full_text.replace("\r\n", "\n").replace('\r', "\n");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Vec::new();
    }

    let separators = blank_line_runs();
    let blocks = if separators.is_match(normalized) {
        collect_trimmed(separators.split(normalized))
    } else {
        Vec::new()
    };

    if blocks.is_empty() {
        collect_trimmed(normalized.split('\n'))
    } else {
        blocks
    }
}

fn collect_trimmed<'a>(pieces: impl Iterator<Item = &'a str>) -> Vec<String> {
    pieces
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// An immutable, segmented book ready for display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocks {
    blocks: Vec<String>,
}

impl Blocks {
    /// Segment `full_text` into blocks
    pub fn from_text(full_text: &str) -> Self {
        let blocks = segment(full_text);
        tracing::debug!("Segmented {} bytes into {} blocks", full_text.len(), blocks.len());
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.blocks.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.blocks
    }
}

impl From<Vec<String>> for Blocks {
    fn from(blocks: Vec<String>) -> Self {
        let blocks = blocks
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
        Self { blocks }
    }
}
