//! A reading session over one stored book

use super::tracker::{PositionTracker, ScrollTarget, ViewportReport};
use crate::error::{Result, StorageError};
use crate::ingest::segment_in_background;
use crate::segment::Blocks;
use crate::storage::RecordStore;
use crate::types::{BookId, ReadingPosition};
use std::sync::Arc;

/// The display surface rendering the blocks of a book
pub trait Viewport {
    /// First fully or partially visible block, `None` if nothing is laid out
    fn first_visible(&self) -> Option<ViewportReport>;

    /// Scroll so `target.block_index` sits at the top, shifted by `target.top_offset`
    fn scroll_to(&mut self, target: ScrollTarget);
}

/// Binds a stored book, its segmented text and the position tracker
///
/// `resume` and `pause` are meant to be driven by the host's lifecycle
/// events. The session remembers the last position that was successfully
/// persisted; a failed write leaves it unchanged.
pub struct ReaderSession {
    store: Arc<dyn RecordStore>,
    book_id: BookId,
    title: String,
    blocks: Blocks,
    tracker: PositionTracker,
    position: ReadingPosition,
}

impl ReaderSession {
    /// Load a book from the store and segment its content
    ///
    /// Segmentation runs on a blocking worker. A book without content opens
    /// with no blocks.
    pub async fn open(store: Arc<dyn RecordStore>, book_id: BookId) -> Result<Self> {
        let record = store
            .get(book_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(book_id.to_string()))?;

        let blocks = segment_in_background(record.content.unwrap_or_default()).await?;
        tracing::debug!(
            "Opened '{}' with {} blocks at block {}",
            record.title,
            blocks.len(),
            record.position.block_index
        );

        Ok(Self {
            store,
            book_id,
            title: record.title,
            tracker: PositionTracker::new(blocks.len()),
            blocks,
            position: record.position,
        })
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    /// Last successfully persisted position
    pub fn position(&self) -> ReadingPosition {
        self.position
    }

    /// Scroll the viewport back to the stored position
    ///
    /// Does nothing for a book without blocks.
    pub fn resume(&self, viewport: &mut dyn Viewport) -> Option<ScrollTarget> {
        if self.blocks.is_empty() {
            return None;
        }
        let target = self.tracker.restore(&self.position);
        viewport.scroll_to(target);
        Some(target)
    }

    /// Capture the viewport position and persist it
    ///
    /// Returns the newly stored position. Nothing is written when the book
    /// has no blocks or the viewport shows nothing. Persistence failures are
    /// logged and swallowed.
    pub async fn pause(&mut self, viewport: &dyn Viewport) -> Option<ReadingPosition> {
        let captured = self.tracker.capture(viewport.first_visible())?;

        match self.store.save_position(self.book_id, captured).await {
            Ok(()) => {
                self.position = captured;
                Some(captured)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to save reading position for {}: {}",
                    self.book_id,
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageResult};
    use crate::types::BookRecord;
    use async_trait::async_trait;

    /// Viewport double that records scroll instructions
    #[derive(Default)]
    struct FakeViewport {
        visible: Option<ViewportReport>,
        scrolled_to: Vec<ScrollTarget>,
    }

    impl Viewport for FakeViewport {
        fn first_visible(&self) -> Option<ViewportReport> {
            self.visible
        }

        fn scroll_to(&mut self, target: ScrollTarget) {
            self.scrolled_to.push(target);
        }
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl RecordStore for ReadOnlyStore {
        async fn get(&self, id: BookId) -> StorageResult<Option<BookRecord>> {
            self.0.get(id).await
        }

        async fn put(&self, _record: BookRecord) -> StorageResult<()> {
            Err(StorageError::BackendError("disk full".to_string()))
        }

        async fn delete(&self, id: BookId) -> StorageResult<()> {
            self.0.delete(id).await
        }

        async fn list(&self) -> StorageResult<Vec<BookRecord>> {
            self.0.list().await
        }
    }

    fn book(content: Option<&str>, position: ReadingPosition) -> BookRecord {
        let mut record = BookRecord::new("Session Test");
        record.content = content.map(str::to_string);
        record.position = position;
        record
    }

    const TEN_BLOCKS: &str = "0\n\n1\n\n2\n\n3\n\n4\n\n5\n\n6\n\n7\n\n8\n\n9";

    #[tokio::test]
    async fn test_resume_and_pause() {
        let store = Arc::new(MemoryStore::new());
        let record = book(Some(TEN_BLOCKS), ReadingPosition::new(42, 15, 90));
        let id = record.id;
        store.put(record).await.unwrap();

        let mut session = ReaderSession::open(store.clone(), id).await.unwrap();
        assert_eq!(session.blocks().len(), 10);

        let mut viewport = FakeViewport::default();
        let target = session.resume(&mut viewport).unwrap();
        assert_eq!(target.block_index, 9);
        assert_eq!(target.top_offset, -15);
        assert_eq!(viewport.scrolled_to, vec![target]);

        viewport.visible = Some(ViewportReport::new(3, -40, Some(200)));
        let saved = session.pause(&viewport).await.unwrap();
        assert_eq!(saved, ReadingPosition::new(3, 40, 36));
        assert_eq!(session.position(), saved);
        assert_eq!(store.get(id).await.unwrap().unwrap().position, saved);

        // Capturing again with the same viewport stores the same triple
        assert_eq!(session.pause(&viewport).await, Some(saved));
        assert_eq!(store.get(id).await.unwrap().unwrap().position, saved);
    }

    #[tokio::test]
    async fn test_nothing_visible_leaves_position() {
        let store = Arc::new(MemoryStore::new());
        let original = ReadingPosition::new(2, 5, 22);
        let record = book(Some(TEN_BLOCKS), original);
        let id = record.id;
        store.put(record).await.unwrap();

        let mut session = ReaderSession::open(store.clone(), id).await.unwrap();
        let viewport = FakeViewport::default();

        assert_eq!(session.pause(&viewport).await, None);
        assert_eq!(store.get(id).await.unwrap().unwrap().position, original);
    }

    #[tokio::test]
    async fn test_book_without_content() {
        let store = Arc::new(MemoryStore::new());
        let record = book(None, ReadingPosition::new(4, 0, 40));
        let id = record.id;
        store.put(record).await.unwrap();

        let mut session = ReaderSession::open(store.clone(), id).await.unwrap();
        let mut viewport = FakeViewport {
            visible: Some(ViewportReport::new(0, 0, Some(10))),
            ..FakeViewport::default()
        };

        assert!(session.blocks().is_empty());
        assert_eq!(session.resume(&mut viewport), None);
        assert!(viewport.scrolled_to.is_empty());
        assert_eq!(session.pause(&viewport).await, None);
        assert_eq!(
            store.get(id).await.unwrap().unwrap().position,
            ReadingPosition::new(4, 0, 40)
        );
    }

    #[tokio::test]
    async fn test_failed_write_keeps_last_position() {
        let inner = MemoryStore::new();
        let original = ReadingPosition::new(1, 0, 11);
        let record = book(Some(TEN_BLOCKS), original);
        let id = record.id;
        inner.put(record).await.unwrap();

        let store: Arc<dyn RecordStore> = Arc::new(ReadOnlyStore(inner));
        let mut session = ReaderSession::open(store, id).await.unwrap();
        let viewport = FakeViewport {
            visible: Some(ViewportReport::new(6, 0, None)),
            ..FakeViewport::default()
        };

        assert_eq!(session.pause(&viewport).await, None);
        assert_eq!(session.position(), original);
    }

    #[tokio::test]
    async fn test_open_missing_book() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let result = ReaderSession::open(store, uuid::Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(crate::error::FolioError::Storage(StorageError::NotFound(_)))
        ));
    }
}
