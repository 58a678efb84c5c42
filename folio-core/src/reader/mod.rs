//! Reading position tracking
//!
//! [`PositionTracker`] holds the pure restore/capture math, [`ReaderSession`]
//! wires it to a [`Viewport`] and a record store.

mod session;
mod tracker;

pub use session::{ReaderSession, Viewport};
pub use tracker::{PositionTracker, ScrollTarget, ViewportReport};
