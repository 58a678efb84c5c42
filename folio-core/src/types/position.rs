//! The persisted reading position triple

use serde::{Deserialize, Serialize};

/// Where a reader left off inside a segmented book
///
/// `block_index` addresses a block of the segmented text, `block_offset` is
/// how far (in display units) that block's top has scrolled above the
/// viewport, and `percent` is the derived overall progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct ReadingPosition {
    /// Index of the first visible block
    pub block_index: usize,

    /// Units scrolled into that block
    pub block_offset: u32,

    /// Overall progress, 0..=100
    pub percent: u8,
}

impl ReadingPosition {
    pub const START: ReadingPosition = ReadingPosition {
        block_index: 0,
        block_offset: 0,
        percent: 0,
    };

    /// Build a position, clamping `percent` to 100
    pub fn new(block_index: usize, block_offset: u32, percent: u8) -> Self {
        Self {
            block_index,
            block_offset,
            percent: percent.min(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_clamped() {
        assert_eq!(ReadingPosition::new(2, 10, 250).percent, 100);
        assert_eq!(ReadingPosition::new(2, 10, 42).percent, 42);
    }

    #[test]
    fn test_default_is_start() {
        assert_eq!(ReadingPosition::default(), ReadingPosition::START);
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(ReadingPosition::new(3, 40, 37)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "block_index": 3, "block_offset": 40, "percent": 37 })
        );
    }
}
