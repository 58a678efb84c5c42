//! Core types shared by the parser, tracker and record store

mod document;
mod position;
mod record;

pub use document::{year_from_hint, ParsedDocument};
pub use position::ReadingPosition;
pub use record::{BookId, BookRecord, ReadingStatus};
