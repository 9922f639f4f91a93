// ⚙️ Classifier Settings - Keywords as Data
// Default keyword lists for travel-expense reports, overridable from JSON

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Marker that identifies the report title line
pub const TITLE_MARKER: &str = "perjalanan";

/// Substrings that mark a line as an expense line
pub const DESCRIPTION_KEYWORDS: &[&str] = &[
    "by",
    "perjalanan",
    "tiket",
    "info",
    "reschedule",
    "travel",
    "penginapan",
];

/// Title used when the source has no title line
pub const DEFAULT_TITLE: &str = "Hasil";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_title_marker")]
    pub title_marker: String,

    #[serde(default = "default_description_keywords")]
    pub description_keywords: Vec<String>,

    #[serde(default = "default_title")]
    pub default_title: String,
}

fn default_title_marker() -> String {
    TITLE_MARKER.to_string()
}

fn default_description_keywords() -> Vec<String> {
    DESCRIPTION_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            title_marker: default_title_marker(),
            description_keywords: default_description_keywords(),
            default_title: default_title(),
        }
    }
}

impl ClassifierConfig {
    /// Load settings from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ClassifierConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path.as_ref()))?;

        Ok(config.normalized())
    }

    /// Keywords are matched against lowercased lines, so store them lowercased
    pub(crate) fn normalized(mut self) -> Self {
        self.title_marker = self.title_marker.to_lowercase();
        self.description_keywords = self
            .description_keywords
            .into_iter()
            .map(|k| k.to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.title_marker, "perjalanan");
        assert_eq!(config.default_title, "Hasil");
        assert!(config.description_keywords.contains(&"tiket".to_string()));
        assert_eq!(config.description_keywords.len(), 7);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"description_keywords": ["Hotel", "Taksi"]}}"#).unwrap();

        let config = ClassifierConfig::from_file(file.path()).unwrap();
        assert_eq!(config.title_marker, "perjalanan");
        assert_eq!(config.default_title, "Hasil");
        assert_eq!(
            config.description_keywords,
            vec!["hotel".to_string(), "taksi".to_string()]
        );
    }

    #[test]
    fn test_missing_file() {
        let result = ClassifierConfig::from_file("/definitely/not/here.json");
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(ClassifierConfig::from_file(file.path()).is_err());
    }
}
