//! FictionBook 2 decoder
//!
//! FB2 is a single XML document. The decoder walks the `quick-xml` event
//! stream once, front to back, and keeps only the handful of fields the
//! library cares about plus the body paragraph text. Nothing is buffered
//! beyond those strings, so arbitrarily large books parse in constant
//! overhead.

use super::DocumentDecoder;
use crate::error::ParseError;
use crate::types::ParsedDocument;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufRead, BufReader, Read};

/// Decoder for FictionBook 2 (`.fb2`) documents
#[derive(Debug, Default, Clone, Copy)]
pub struct Fb2Decoder;

impl Fb2Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete in-memory document
    pub fn parse_bytes(&self, data: &[u8]) -> Result<ParsedDocument, ParseError> {
        self.parse(data)
    }

    /// Parse a document from a buffered stream
    pub fn parse<R: BufRead>(&self, source: R) -> Result<ParsedDocument, ParseError> {
        let mut reader = Reader::from_reader(source);
        let mut walker = Fb2Walker::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => walker.start(&e)?,
                Event::Empty(e) => {
                    walker.start(&e)?;
                    walker.end(e.name().as_ref());
                }
                Event::End(e) => walker.end(e.name().as_ref()),
                Event::Text(e) => walker.text(&e.unescape()?),
                Event::CData(e) => walker.text(&reader.decoder().decode(&e)?),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let doc = walker.finish()?;
        tracing::debug!(
            title = doc.title(),
            author = ?doc.author,
            genre = ?doc.genre,
            text_len = doc.full_text.len(),
            "Parsed FB2 document"
        );
        Ok(doc)
    }
}

impl DocumentDecoder for Fb2Decoder {
    fn decode(&self, reader: &mut dyn Read) -> Result<ParsedDocument, ParseError> {
        self.parse(BufReader::new(reader))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["fb2"]
    }

    fn supported_mime_types(&self) -> &[&str] {
        &["application/x-fictionbook+xml", "text/fb2+xml"]
    }
}

/// Scalar field being collected from a single element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Genre,
    Date,
    Paragraph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamePart {
    First,
    Middle,
    Last,
}

/// What the walker is currently inside of
#[derive(Debug, Default)]
enum Active {
    #[default]
    Idle,

    /// Collecting all descendant text of one element
    Text {
        field: Field,
        depth: usize,
        text: String,
        /// Used when the element text turns out blank (`<date value="..."/>`)
        fallback: Option<String>,
    },

    Author(AuthorCapture),
}

/// Composite `<author>` state
#[derive(Debug, Default)]
struct AuthorCapture {
    depth: usize,
    first: Option<String>,
    middle: Option<String>,
    last: Option<String>,
    /// Name part being read, with the depth of its element
    part: Option<(NamePart, usize, String)>,
    /// Open elements of an unrecognized subtree; 0 when not skipping
    skip: usize,
}

impl AuthorCapture {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    fn start(&mut self, name: &[u8], depth: usize) {
        if self.skip > 0 {
            self.skip += 1;
            return;
        }
        if self.part.is_some() {
            return;
        }
        let part = match name {
            b"first-name" => NamePart::First,
            b"middle-name" => NamePart::Middle,
            b"last-name" => NamePart::Last,
            _ => {
                self.skip = 1;
                return;
            }
        };
        self.part = Some((part, depth, String::new()));
    }

    fn text(&mut self, text: &str) {
        if self.skip > 0 {
            return;
        }
        if let Some((_, _, buf)) = &mut self.part {
            buf.push_str(text);
        }
    }

    /// Returns true once the `<author>` element itself closes
    fn end(&mut self, depth: usize) -> bool {
        if self.skip > 0 {
            self.skip -= 1;
            return false;
        }
        if let Some((part, part_depth, _)) = &self.part {
            if *part_depth == depth {
                let part = *part;
                if let Some((_, _, text)) = self.part.take() {
                    let slot = match part {
                        NamePart::First => &mut self.first,
                        NamePart::Middle => &mut self.middle,
                        NamePart::Last => &mut self.last,
                    };
                    slot.get_or_insert(text);
                }
            }
            return false;
        }
        depth == self.depth
    }

    fn compose(self) -> String {
        [self.first, self.middle, self.last]
            .iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Single forward pass state machine over FB2 events
///
/// `in_body` and `active` together form the parse state; element depth is
/// tracked so each capture knows which end tag closes it.
#[derive(Debug, Default)]
struct Fb2Walker {
    depth: usize,
    root: Option<String>,
    in_body: bool,
    active: Active,
    title: Option<String>,
    author: Option<String>,
    genre: Option<String>,
    date: Option<String>,
    full_text: String,
}

impl Fb2Walker {
    fn start(&mut self, e: &BytesStart<'_>) -> Result<(), ParseError> {
        self.depth += 1;
        let name = e.name();
        let name = name.as_ref();
        if self.root.is_none() {
            self.root = Some(String::from_utf8_lossy(name).into_owned());
        }

        match &mut self.active {
            // Inline markup inside a captured field; its text still counts
            Active::Text { .. } => {}
            Active::Author(author) => author.start(name, self.depth),
            Active::Idle => self.open(name, e)?,
        }
        Ok(())
    }

    fn open(&mut self, name: &[u8], e: &BytesStart<'_>) -> Result<(), ParseError> {
        match name {
            b"book-title" if self.title.is_none() => self.capture(Field::Title, None),
            b"author" if self.author.is_none() => {
                self.active = Active::Author(AuthorCapture::new(self.depth));
            }
            b"genre" if self.genre.is_none() => self.capture(Field::Genre, None),
            b"date" if self.date.is_none() => {
                let mut value = None;
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"value" {
                        value = Some(attr.unescape_value()?.into_owned());
                    }
                }
                self.capture(Field::Date, value);
            }
            b"body" => self.in_body = true,
            b"p" if self.in_body => self.capture(Field::Paragraph, None),
            _ => {}
        }
        Ok(())
    }

    fn capture(&mut self, field: Field, fallback: Option<String>) {
        self.active = Active::Text {
            field,
            depth: self.depth,
            text: String::new(),
            fallback,
        };
    }

    fn text(&mut self, text: &str) {
        match &mut self.active {
            Active::Text { text: buf, .. } => buf.push_str(text),
            Active::Author(author) => author.text(text),
            Active::Idle => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        let closes = match &mut self.active {
            Active::Text { depth, .. } => *depth == self.depth,
            Active::Author(author) => author.end(self.depth),
            Active::Idle => {
                if name == b"body" {
                    self.in_body = false;
                }
                false
            }
        };
        if closes {
            let finished = std::mem::take(&mut self.active);
            self.commit(finished);
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn commit(&mut self, finished: Active) {
        match finished {
            Active::Idle => {}
            // A nameless author does not claim the slot
            Active::Author(author) => {
                let name = author.compose();
                if !name.is_empty() {
                    self.author = Some(name);
                }
            }
            Active::Text {
                field,
                text,
                fallback,
                ..
            } => {
                let value = text.trim();
                match field {
                    Field::Title => self.title = Some(value.to_string()),
                    Field::Genre => self.genre = Some(value.to_string()),
                    Field::Date => {
                        let value = if value.is_empty() {
                            fallback.as_deref().map(str::trim).unwrap_or_default()
                        } else {
                            value
                        };
                        self.date = Some(value.to_string());
                    }
                    Field::Paragraph => {
                        if !value.is_empty() {
                            self.full_text.push_str(value);
                            self.full_text.push_str("\n\n");
                        }
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<ParsedDocument, ParseError> {
        if self.depth > 0 {
            let open = self.root.unwrap_or_default();
            return Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(open)).into());
        }

        let title = non_blank(self.title).ok_or(ParseError::MissingTitle)?;
        let full_text = self.full_text.trim();
        if full_text.is_empty() {
            return Err(ParseError::EmptyContent);
        }

        Ok(ParsedDocument {
            title: Some(title),
            author: non_blank(self.author),
            genre: non_blank(self.genre),
            date_hint: non_blank(self.date),
            full_text: full_text.to_string(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
