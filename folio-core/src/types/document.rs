//! Parsed document metadata and text

use serde::{Deserialize, Serialize};

/// The result of a successful document parse
///
/// Built once by a decoder and never mutated afterwards. The title is
/// guaranteed non-blank and the full text non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Book title
    pub title: Option<String>,

    /// Composed author name ("First Middle Last")
    pub author: Option<String>,

    /// Raw genre label, before normalization
    pub genre: Option<String>,

    /// Free-form date text; see [`ParsedDocument::year`]
    pub date_hint: Option<String>,

    /// Body paragraphs separated by blank lines
    pub full_text: String,
}

impl ParsedDocument {
    /// Title, or an empty string for a document that was never validated
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Year derived from the first four characters of the date hint
    ///
    /// Returns `None` unless those four characters are all ASCII digits.
    pub fn year(&self) -> Option<i32> {
        year_from_hint(self.date_hint.as_deref()?)
    }
}

/// Interpret the leading four characters of a date string as a year
pub fn year_from_hint(hint: &str) -> Option<i32> {
    let prefix: String = hint.chars().take(4).collect();
    if prefix.len() == 4 && prefix.bytes().all(|b| b.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_date(date: Option<&str>) -> ParsedDocument {
        ParsedDocument {
            title: Some("Title".to_string()),
            author: None,
            genre: None,
            date_hint: date.map(str::to_string),
            full_text: "Text".to_string(),
        }
    }

    #[test]
    fn test_year_from_iso_date() {
        assert_eq!(doc_with_date(Some("2005-03-14")).year(), Some(2005));
        assert_eq!(doc_with_date(Some("1869")).year(), Some(1869));
    }

    #[test]
    fn test_year_rejects_non_numeric_prefix() {
        assert_eq!(doc_with_date(Some("March 2005")).year(), None);
        assert_eq!(doc_with_date(Some("20-5")).year(), None);
        assert_eq!(doc_with_date(Some("200")).year(), None);
        assert_eq!(doc_with_date(Some("+200")).year(), None);
        assert_eq!(doc_with_date(None).year(), None);
    }

    #[test]
    fn test_year_with_multibyte_prefix() {
        assert_eq!(year_from_hint("год 1999"), None);
    }
}
