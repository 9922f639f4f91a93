// 🏷️ Line Classifier - Title, name or expense line?
// Pure keyword-substring heuristics over one non-blank line of text

use crate::config::ClassifierConfig;
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Report title; the last one seen wins
    Title,
    /// Expense line belonging to the current person
    Description,
    /// Anything else: opens (or re-opens) a person group
    NameLine,
}

/// LineClassifier - decides what a line is and how its text is cleaned
///
/// Implementors must be pure: the same line always yields the same answer.
pub trait LineClassifier: Send + Sync {
    fn classify(&self, line: &str) -> LineKind;

    /// Text stored for titles and descriptions
    fn clean(&self, line: &str) -> String;

    /// Title used when no title line is seen
    fn default_title(&self) -> &str;
}

// ============================================================================
// KEYWORD CLASSIFIER
// ============================================================================

/// Case-insensitive `contains` matching, no word boundaries.
///
/// Title detection runs first, so a line carrying both the title marker and a
/// description keyword is a title.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    config: ClassifierConfig,
}

impl KeywordClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        KeywordClassifier {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_title(&self, line: &str) -> bool {
        let marker = &self.config.title_marker;
        !marker.is_empty() && line.to_lowercase().contains(marker.as_str())
    }

    pub fn is_description(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.config
            .description_keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && lower.contains(keyword.as_str()))
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl LineClassifier for KeywordClassifier {
    fn classify(&self, line: &str) -> LineKind {
        if self.is_title(line) {
            LineKind::Title
        } else if self.is_description(line) {
            LineKind::Description
        } else {
            LineKind::NameLine
        }
    }

    /// Trims the line. Where the title marker was cut out, the whitespace
    /// left around it is collapsed; other spacing is kept as written.
    fn clean(&self, line: &str) -> String {
        match remove_ignore_case(line, &self.config.title_marker) {
            Some(stripped) => stripped.split_whitespace().collect::<Vec<_>>().join(" "),
            None => line.trim().to_string(),
        }
    }

    fn default_title(&self) -> &str {
        &self.config.default_title
    }
}

/// Remove every case-insensitive occurrence of `needle` from `haystack`.
/// `None` when there was nothing to remove.
fn remove_ignore_case(haystack: &str, needle: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }

    let needle: Vec<char> = needle.chars().collect();
    let chars: Vec<char> = haystack.chars().collect();
    let mut out = String::with_capacity(haystack.len());
    let mut removed = false;

    let mut i = 0;
    while i < chars.len() {
        let end = i + needle.len();
        let matches = end <= chars.len()
            && chars[i..end]
                .iter()
                .zip(&needle)
                .all(|(c, n)| c.to_lowercase().eq(n.to_lowercase()));

        if matches {
            removed = true;
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    removed.then_some(out)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_line() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify("Laporan Perjalanan Dinas"), LineKind::Title);
        assert_eq!(classifier.classify("PERJALANAN"), LineKind::Title);
    }

    #[test]
    fn test_title_beats_description() {
        let classifier = KeywordClassifier::default();
        // "tiket" alone would make this a description
        assert_eq!(
            classifier.classify("Tiket perjalanan 100.000"),
            LineKind::Title
        );
    }

    #[test]
    fn test_description_keywords() {
        let classifier = KeywordClassifier::default();
        for line in [
            "Tiket pesawat 500.000",
            "Penginapan hotel 750000",
            "info reschedule 0",
            "Biaya travel 120.000",
            "Taksi by grab 45.000",
        ] {
            assert_eq!(classifier.classify(line), LineKind::Description, "{}", line);
        }
    }

    #[test]
    fn test_name_line() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify("Andi"), LineKind::NameLine);
        assert_eq!(classifier.classify("Budi Santoso"), LineKind::NameLine);
    }

    #[test]
    fn test_substring_not_word_match() {
        let classifier = KeywordClassifier::default();
        // "Bobby" contains "by": substring semantics are kept as-is
        assert_eq!(classifier.classify("Bobby"), LineKind::Description);
    }

    #[test]
    fn test_clean_removes_marker() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.clean("Laporan Perjalanan Dinas"), "Laporan Dinas");
        assert_eq!(classifier.clean("  PERJALANAN dinas  "), "dinas");
        assert_eq!(
            classifier.clean("Tiket pesawat 500.000"),
            "Tiket pesawat 500.000"
        );
    }

    #[test]
    fn test_clean_keeps_inner_spacing_without_marker() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.clean("  Tiket  pesawat   500.000 "),
            "Tiket  pesawat   500.000"
        );
    }

    #[test]
    fn test_clean_repeated_marker() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.clean("perjalananPerjalanan ke Bali"),
            "ke Bali"
        );
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let classifier = KeywordClassifier::new(ClassifierConfig {
            title_marker: String::new(),
            ..ClassifierConfig::default()
        });
        assert_eq!(classifier.classify("Andi"), LineKind::NameLine);
        assert_eq!(classifier.clean("  Andi "), "Andi");
    }

    #[test]
    fn test_keywords_built_in_code_are_lowercased() {
        let classifier = KeywordClassifier::new(ClassifierConfig {
            title_marker: "LAPORAN".to_string(),
            description_keywords: vec!["Hotel".to_string(), String::new()],
            ..ClassifierConfig::default()
        });
        assert_eq!(classifier.config().description_keywords, vec!["hotel".to_string()]);
        assert_eq!(classifier.classify("hotel mawar 300.000"), LineKind::Description);
        assert_eq!(classifier.classify("Laporan Januari"), LineKind::Title);
        assert_eq!(classifier.clean("Laporan Januari"), "Januari");
    }

    #[test]
    fn test_custom_keywords() {
        let classifier = KeywordClassifier::new(ClassifierConfig {
            description_keywords: vec!["hotel".to_string()],
            ..ClassifierConfig::default()
        });
        assert_eq!(classifier.classify("Hotel Mawar 300.000"), LineKind::Description);
        assert_eq!(classifier.classify("Tiket 100.000"), LineKind::NameLine);
    }
}
