//! Info command implementation

use super::read_document;
use crate::config::Config;
use anyhow::Result;
use folio_core::segment;
use serde::Serialize;

/// Book info output
#[derive(Serialize)]
struct BookInfo {
    title: String,
    author: Option<String>,
    genre: Option<String>,
    genre_label: String,
    date: Option<String>,
    year: Option<i32>,
    blocks: usize,
    characters: usize,
}

/// Display information about an FB2 book
pub fn info(config: &Config, input: &str, json: bool) -> Result<()> {
    let taxonomy = config.load_taxonomy()?;
    let doc = read_document(input)?;

    let info = BookInfo {
        title: doc.title().to_string(),
        author: doc.author.clone(),
        genre: doc.genre.clone(),
        genre_label: taxonomy.normalize(doc.genre.as_deref()).to_string(),
        date: doc.date_hint.clone(),
        year: doc.year(),
        blocks: segment(&doc.full_text).len(),
        characters: doc.full_text.chars().count(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:      {}", info.title);
        if let Some(author) = &info.author {
            println!("Author:     {}", author);
        }
        match &info.genre {
            Some(raw) => println!("Genre:      {} ({})", info.genre_label, raw),
            None => println!("Genre:      {}", info.genre_label),
        }
        if let Some(date) = &info.date {
            println!("Date:       {}", date);
        }
        if let Some(year) = info.year {
            println!("Year:       {}", year);
        }
        println!("Blocks:     {}", info.blocks);
        println!("Characters: {}", info.characters);
    }

    Ok(())
}
