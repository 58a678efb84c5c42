//! Genre normalization against a fixed taxonomy
//!
//! Documents carry free-text genre labels ("sf_fantasy", "Fantasy novel",
//! "Фэнтези"). The library displays a small, fixed set of localized genres,
//! so every raw label is mapped onto one row of an ordered taxonomy table.
//! Matching is a case-insensitive substring test in both directions against
//! both labels of a row, and the first matching row wins.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Returned when a document has no genre at all; callers pick the display text
pub const UNCLASSIFIED: &str = "unclassified";

/// Fallback label of the built-in table ("Other")
pub const DEFAULT_FALLBACK: &str = "Другое";

const BUILTIN_GENRES: &[(&str, &str)] = &[
    ("Фантастика", "science fiction"),
    ("Фэнтези", "fantasy"),
    ("Детектив", "detective"),
    ("Триллер", "thriller"),
    ("Ужасы", "horror"),
    ("Любовный роман", "romance"),
    ("Приключения", "adventure"),
    ("Исторический роман", "historical"),
    ("Классика", "classic"),
    ("Поэзия", "poetry"),
    ("Драма", "drama"),
    ("Юмор", "humor"),
    ("Детская литература", "children"),
    ("Научно-популярное", "science"),
    ("Биография", "biography"),
    ("Психология", "psychology"),
    ("Философия", "philosophy"),
    ("Бизнес", "business"),
    ("Проза", "prose"),
];

/// One row of the taxonomy as it appears in configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreEntry {
    /// Label shown to the reader
    pub localized: String,

    /// Reference (usually English) label used for matching only
    pub reference: String,
}

/// On-disk taxonomy configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomyConfig {
    #[serde(default = "default_fallback")]
    pub fallback: String,

    pub genres: Vec<GenreEntry>,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}

#[derive(Debug, Clone)]
struct Row {
    localized: String,
    localized_lower: String,
    reference_lower: String,
}

impl Row {
    fn matches(&self, needle: &str) -> bool {
        overlaps(needle, &self.localized_lower) || overlaps(needle, &self.reference_lower)
    }
}

fn overlaps(needle: &str, label: &str) -> bool {
    needle.contains(label) || label.contains(needle)
}

/// Ordered, read-only genre mapping table
#[derive(Debug, Clone)]
pub struct GenreTaxonomy {
    rows: Vec<Row>,
    fallback: String,
}

impl GenreTaxonomy {
    /// Build a taxonomy from `(localized, reference)` pairs in priority order
    ///
    /// Blank labels are rejected: an empty label would match every input.
    pub fn new<I, L, R>(rows: I, fallback: impl Into<String>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (L, R)>,
        L: Into<String>,
        R: Into<String>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, (localized, reference))| {
                let localized = localized.into().trim().to_string();
                let reference = reference.into().trim().to_string();
                if localized.is_empty() || reference.is_empty() {
                    return Err(ConfigError::InvalidTaxonomy(format!(
                        "row {} has a blank label",
                        i
                    )));
                }
                Ok(Row {
                    localized_lower: localized.to_lowercase(),
                    reference_lower: reference.to_lowercase(),
                    localized,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fallback = fallback.into().trim().to_string();
        if fallback.is_empty() {
            return Err(ConfigError::InvalidTaxonomy(
                "fallback label is blank".to_string(),
            ));
        }

        Ok(Self { rows, fallback })
    }

    /// Build a taxonomy from its configuration form
    pub fn from_config(config: TaxonomyConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.genres.into_iter().map(|g| (g.localized, g.reference)),
            config.fallback,
        )
    }

    /// Parse a JSON taxonomy configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TaxonomyConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// Load a JSON taxonomy configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let taxonomy = Self::from_json(&json)?;
        tracing::debug!(
            "Loaded genre taxonomy with {} rows from {:?}",
            taxonomy.len(),
            path
        );
        Ok(taxonomy)
    }

    /// Map a raw genre label to a localized label
    ///
    /// Absent (or blank) input yields [`UNCLASSIFIED`]; input that matches no
    /// row yields the fallback label. Never fails.
    pub fn normalize(&self, raw: Option<&str>) -> &str {
        let needle = match raw.map(|g| g.trim().to_lowercase()) {
            Some(needle) if !needle.is_empty() => needle,
            _ => return UNCLASSIFIED,
        };

        self.rows
            .iter()
            .find(|row| row.matches(&needle))
            .map(|row| row.localized.as_str())
            .unwrap_or(&self.fallback)
    }

    /// Localized labels in table order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.localized.as_str())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for GenreTaxonomy {
    fn default() -> Self {
        let rows = BUILTIN_GENRES
            .iter()
            .map(|&(localized, reference)| Row {
                localized: localized.to_string(),
                localized_lower: localized.to_lowercase(),
                reference_lower: reference.to_lowercase(),
            })
            .collect();

        Self {
            rows,
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GenreTaxonomy {
        GenreTaxonomy::new(
            [
                ("Фантастика", "science fiction"),
                ("Фэнтези", "fantasy"),
                ("Детектив", "detective"),
            ],
            "Другое",
        )
        .unwrap()
    }

    #[test]
    fn test_input_contains_reference_label() {
        assert_eq!(table().normalize(Some("Fantasy novel")), "Фэнтези");
    }

    #[test]
    fn test_label_contains_input() {
        assert_eq!(table().normalize(Some("detect")), "Детектив");
    }

    #[test]
    fn test_matches_localized_label_case_insensitively() {
        assert_eq!(table().normalize(Some("  ФЭНТЕЗИ  ")), "Фэнтези");
        assert_eq!(table().normalize(Some("Русская фантастика")), "Фантастика");
    }

    #[test]
    fn test_unmatched_returns_fallback() {
        assert_eq!(table().normalize(Some("cookbook")), "Другое");
    }

    #[test]
    fn test_absent_or_blank_is_unclassified() {
        assert_eq!(table().normalize(None), UNCLASSIFIED);
        assert_eq!(table().normalize(Some("   ")), UNCLASSIFIED);
    }

    #[test]
    fn test_table_order_breaks_ties() {
        let taxonomy =
            GenreTaxonomy::new([("Фантастика", "fiction"), ("Фэнтези", "fantasy")], "Другое")
                .unwrap();
        assert_eq!(taxonomy.normalize(Some("fantasy fiction")), "Фантастика");
        // "f" is a substring of both reference labels
        assert_eq!(taxonomy.normalize(Some("f")), "Фантастика");
    }

    #[test]
    fn test_builtin_table_handles_fb2_codes() {
        let taxonomy = GenreTaxonomy::default();
        assert_eq!(taxonomy.normalize(Some("sf_fantasy")), "Фэнтези");
        assert_eq!(taxonomy.normalize(Some("detective")), "Детектив");
        assert_eq!(taxonomy.normalize(Some("prose_classic")), "Классика");
        assert_eq!(taxonomy.normalize(Some("love_contemporary")), DEFAULT_FALLBACK);
        assert_eq!(taxonomy.fallback(), DEFAULT_FALLBACK);
        assert_eq!(taxonomy.labels().next(), Some("Фантастика"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "fallback": "Other",
            "genres": [
                { "localized": "Sci-Fi", "reference": "science fiction" },
                { "localized": "Mystery", "reference": "detective" }
            ]
        }"#;

        let taxonomy = GenreTaxonomy::from_json(json).unwrap();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.normalize(Some("detective_classic")), "Mystery");
        assert_eq!(taxonomy.normalize(Some("poetry")), "Other");
    }

    #[test]
    fn test_from_json_default_fallback() {
        let json = r#"{ "genres": [ { "localized": "Проза", "reference": "prose" } ] }"#;
        let taxonomy = GenreTaxonomy::from_json(json).unwrap();
        assert_eq!(taxonomy.fallback(), DEFAULT_FALLBACK);
    }

    #[test]
    fn test_blank_labels_rejected() {
        let result = GenreTaxonomy::new([("Проза", " ")], "Другое");
        assert!(matches!(result, Err(ConfigError::InvalidTaxonomy(_))));

        let result = GenreTaxonomy::new([("Проза", "prose")], "");
        assert!(matches!(result, Err(ConfigError::InvalidTaxonomy(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            GenreTaxonomy::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genres.json");
        std::fs::write(
            &path,
            r#"{ "fallback": "Misc", "genres": [ { "localized": "Horror", "reference": "horror" } ] }"#,
        )
        .unwrap();

        let taxonomy = GenreTaxonomy::load(&path).unwrap();
        assert_eq!(taxonomy.normalize(Some("Gothic horror")), "Horror");
        assert_eq!(taxonomy.normalize(Some("cooking")), "Misc");

        assert!(matches!(
            GenreTaxonomy::load(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
