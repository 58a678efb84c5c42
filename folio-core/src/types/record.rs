//! The book record kept in the library

use super::{ParsedDocument, ReadingPosition};
use crate::genre::GenreTaxonomy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a book record
pub type BookId = Uuid;

/// Where the reader is with a book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    #[default]
    Planned,
    Reading,
    Read,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Planned => "planned",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(ReadingStatus::Planned),
            "reading" => Ok(ReadingStatus::Reading),
            "read" => Ok(ReadingStatus::Read),
            other => Err(format!(
                "unknown status '{}' (expected planned, reading or read)",
                other
            )),
        }
    }
}

/// A book in the library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRecord {
    /// Unique identifier for this book
    pub id: BookId,

    pub title: String,

    pub author: String,

    /// Normalized (localized) genre label
    pub genre: String,

    /// Publication year, 0 when unknown
    pub year: i32,

    pub status: ReadingStatus,

    pub notes: Option<String>,

    /// Rating, 0.0..=5.0 (0 means unrated)
    pub rating: f32,

    pub added_at: DateTime<Utc>,

    /// When the book was first marked as read
    pub read_at: Option<DateTime<Utc>>,

    /// Extracted plain text, if the book was imported from a document
    pub content: Option<String>,

    /// Page-based progress kept for records created before block tracking
    pub last_page: u32,
    pub total_pages: u32,

    /// Block-based reading position
    #[serde(default)]
    pub position: ReadingPosition,
}

impl BookRecord {
    /// Create a new planned book with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: String::new(),
            genre: String::new(),
            year: 0,
            status: ReadingStatus::Planned,
            notes: None,
            rating: 0.0,
            added_at: Utc::now(),
            read_at: None,
            content: None,
            last_page: 0,
            total_pages: 0,
            position: ReadingPosition::START,
        }
    }

    /// Create a record from a freshly parsed document
    pub fn from_parsed(doc: &ParsedDocument, taxonomy: &GenreTaxonomy) -> Self {
        let mut record = Self::new(doc.title());
        record.apply_parsed(doc, taxonomy);
        record
    }

    /// Merge parsed metadata and text into this record
    ///
    /// Author and genre are only overwritten when the document carries them.
    /// The year is always replaced (0 when the date hint has no year).
    pub fn apply_parsed(&mut self, doc: &ParsedDocument, taxonomy: &GenreTaxonomy) {
        if let Some(title) = &doc.title {
            self.title = title.clone();
        }
        if let Some(author) = &doc.author {
            self.author = author.clone();
        }
        if doc.genre.is_some() {
            self.genre = taxonomy.normalize(doc.genre.as_deref()).to_string();
        }
        self.year = doc.year().unwrap_or(0);
        self.content = Some(doc.full_text.clone());
    }

    /// Change the reading status, stamping `read_at` the first time a book is read
    pub fn set_status(&mut self, status: ReadingStatus) {
        self.status = status;
        if status == ReadingStatus::Read && self.read_at.is_none() {
            self.read_at = Some(Utc::now());
        }
    }

    /// Set the rating, clamped to 0..=5
    pub fn set_rating(&mut self, rating: f32) {
        self.rating = rating.clamp(0.0, 5.0);
    }

    /// Whether the record has readable text
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }

    /// Progress for display, 0..=100
    ///
    /// While reading, this is always the tracked block percent. Otherwise the
    /// legacy page counters are used.
    pub fn progress(&self) -> f32 {
        if self.status == ReadingStatus::Reading {
            return f32::from(self.position.percent);
        }

        if self.total_pages == 0 {
            return 0.0;
        }
        let ratio = (self.last_page as f32 + 1.0) / self.total_pages as f32;
        (ratio * 100.0).clamp(0.0, 100.0)
    }
}
