//! Block-addressed reading position math
//!
//! The tracker knows only how many blocks the current book has. It turns a
//! persisted position into a scroll instruction (restore) and a viewport
//! report into a new position with a derived percent (capture). Both are
//! pure; persisting the result is the session's job.

use crate::types::ReadingPosition;

/// What the display surface reports about its first visible block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportReport {
    /// Index of the first fully or partially visible block
    pub first_visible: usize,

    /// The block's top edge relative to the viewport top; negative once the
    /// block has scrolled partly out of view
    pub top: i64,

    /// Rendered height of that block, if known
    pub height: Option<i64>,
}

impl ViewportReport {
    pub fn new(first_visible: usize, top: i64, height: Option<i64>) -> Self {
        Self {
            first_visible,
            top,
            height,
        }
    }

    /// Distance the block's top has scrolled above the viewport, never negative
    pub fn offset(&self) -> u32 {
        let scrolled = self.top.saturating_neg().max(0);
        u32::try_from(scrolled).unwrap_or(u32::MAX)
    }
}

/// Instruction for the display surface: put `block_index` at the top of the
/// viewport, shifted by `top_offset` (zero or negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget {
    pub block_index: usize,
    pub top_offset: i64,
}

/// Position math for a book with a known number of blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionTracker {
    block_count: usize,
}

impl PositionTracker {
    pub fn new(block_count: usize) -> Self {
        Self { block_count }
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Clamp a block index into `[0, n - 1]` (0 for an empty book)
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.block_count.saturating_sub(1))
    }

    /// Where to scroll to resume from a persisted position
    pub fn restore(&self, persisted: &ReadingPosition) -> ScrollTarget {
        ScrollTarget {
            block_index: self.clamp_index(persisted.block_index),
            top_offset: -i64::from(persisted.block_offset),
        }
    }

    /// Turn a viewport report into a position to persist
    ///
    /// Returns `None` when the book has no blocks or nothing is visible, in
    /// which case the stored position must be left as it is.
    pub fn capture(&self, report: Option<ViewportReport>) -> Option<ReadingPosition> {
        if self.block_count == 0 {
            return None;
        }
        let report = report?;

        let block_index = self.clamp_index(report.first_visible);
        let block_offset = report.offset();
        let percent = self.percent(block_index, block_offset, report.height);

        Some(ReadingPosition {
            block_index,
            block_offset,
            percent,
        })
    }

    /// Overall progress for a position, 0..=100
    ///
    /// Books with zero or one block always report 0.
    pub fn percent(&self, block_index: usize, block_offset: u32, height: Option<i64>) -> u8 {
        if self.block_count <= 1 {
            return 0;
        }

        let inside = match height {
            Some(h) if h > 0 => (f64::from(block_offset) / h as f64).clamp(0.0, 1.0),
            _ => 0.0,
        };
        // Scale before dividing so exact halves stay exact
        let scaled = (block_index as f64 + inside) * 100.0 / (self.block_count - 1) as f64;
        scaled.round().clamp(0.0, 100.0) as u8
    }
}
