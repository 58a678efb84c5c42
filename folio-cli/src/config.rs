//! Library and taxonomy locations

use anyhow::{Context, Result};
use folio_core::storage::JsonFileStore;
use folio_core::GenreTaxonomy;
use std::path::PathBuf;

const LIBRARY_ENV: &str = "FOLIO_LIBRARY";
const TAXONOMY_ENV: &str = "FOLIO_TAXONOMY";
const DEFAULT_LIBRARY_DIR: &str = "./folio_data";

/// Resolved CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub library_dir: PathBuf,
    pub taxonomy_path: Option<PathBuf>,
}

impl Config {
    /// Flags win over environment variables, which win over defaults
    pub fn resolve(library: Option<String>, taxonomy: Option<String>) -> Self {
        let library_dir = library
            .or_else(|| std::env::var(LIBRARY_ENV).ok())
            .unwrap_or_else(|| DEFAULT_LIBRARY_DIR.to_string());
        let taxonomy_path = taxonomy
            .or_else(|| std::env::var(TAXONOMY_ENV).ok())
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            library_dir: PathBuf::from(library_dir),
            taxonomy_path,
        }
    }

    /// Path of the library index file
    pub fn library_file(&self) -> PathBuf {
        self.library_dir.join("library.json")
    }

    /// Load the configured taxonomy, or the built-in one
    pub fn load_taxonomy(&self) -> Result<GenreTaxonomy> {
        match &self.taxonomy_path {
            Some(path) => GenreTaxonomy::load(path)
                .with_context(|| format!("Failed to load genre taxonomy from {:?}", path)),
            None => Ok(GenreTaxonomy::default()),
        }
    }

    /// Open the library store
    pub async fn open_store(&self) -> Result<JsonFileStore> {
        let path = self.library_file();
        JsonFileStore::open(&path)
            .await
            .with_context(|| format!("Failed to open library {:?}", path))
    }
}
