use serde::{Deserialize, Serialize};

/// Keyword used to decide whether an article is about Venezuelan migration.
pub const DEFAULT_KEYWORD: &str = "Migrantes venezolanos";

/// Immutable list of keywords checked against article bodies.
///
/// Matching is plain case-insensitive substring containment: no
/// tokenization, no stemming and no word boundaries, so a keyword inside a
/// longer word still counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Returns true if any keyword occurs in `text`, ignoring case.
    pub fn contains_keyword(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new([DEFAULT_KEYWORD])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_regardless_of_case() {
        let keywords = KeywordSet::default();
        assert!(keywords.contains_keyword("Hay MIGRANTES VENEZOLANOS en la ciudad"));
        assert!(keywords.contains_keyword("los migrantes venezolanos llegaron"));
    }

    #[test]
    fn test_rejects_text_without_keyword() {
        let keywords = KeywordSet::default();
        assert!(!keywords.contains_keyword("no hay nada aquí"));
        assert!(!keywords.contains_keyword(""));
    }

    #[test]
    fn test_substring_inside_longer_word_matches() {
        let keywords = KeywordSet::new(["venezolan"]);
        assert!(keywords.contains_keyword("Los VENEZOLANOS residentes"));
    }

    #[test]
    fn test_any_keyword_is_enough() {
        let keywords = KeywordSet::new(["Diáspora venezolana", "Refugiados venezolanos"]);
        assert!(keywords.contains_keyword("la DIÁSPORA VENEZOLANA crece"));
        assert!(!keywords.contains_keyword("crisis migratoria"));
    }

    #[test]
    fn test_empty_set_never_matches() {
        let keywords = KeywordSet::new(Vec::<String>::new());
        assert!(keywords.is_empty());
        assert!(!keywords.contains_keyword("Migrantes venezolanos"));
    }
}
