//! Domain vocabulary and synonym dictionary

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Synonym dictionary and general domain vocabulary
///
/// Synonyms map a canonical term to its variants; lookups go the other
/// way, so a reverse index is built once at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// canonical term -> variant spellings
    #[serde(default)]
    pub synonyms: HashMap<String, Vec<String>>,
    /// Domain terms that signal an in-scope query without belonging to
    /// any single endpoint signature
    #[serde(default)]
    pub domain_terms: Vec<String>,
    /// Tokens ignored for relevance ratios
    #[serde(default)]
    pub stopwords: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        let synonyms: Vec<(&str, Vec<&str>)> = vec![
            ("income", vec!["earnings", "salary", "wages", "pay"]),
            ("population", vec!["people", "residents", "inhabitants"]),
            ("store", vec!["shop", "outlet", "location"]),
            ("compare", vec!["versus", "vs", "against"]),
            ("area", vec!["region", "zone", "district", "neighborhood"]),
            ("sales", vec!["revenue", "turnover"]),
            ("foot traffic", vec!["footfall", "visitor traffic"]),
            ("demographics", vec!["demographic makeup", "population profile"]),
            ("household", vec!["home", "family"]),
            ("employment", vec!["jobs", "work"]),
            ("housing", vec!["homes", "real estate", "property"]),
            ("commute", vec!["commuting", "travel to work"]),
            ("growth", vec!["increase", "expansion"]),
            ("customer", vec!["shopper", "consumer", "buyer"]),
            ("best", vec!["optimal", "ideal", "top"]),
        ];

        let domain_terms = vec![
            "map", "show", "display", "analyze", "analysis", "data",
            "statistics", "distribution", "density", "average", "median",
            "percent", "percentage", "city", "county", "state", "zip",
            "block", "tract", "census", "metro", "urban", "suburban", "rural",
            "near", "nearby", "radius", "within", "around", "between", "downtown",
        ];

        let stopwords = vec![
            "a", "an", "the", "of", "in", "on", "at", "to", "for", "by",
            "with", "and", "or", "is", "are", "was", "were", "what",
            "which", "where", "how", "me", "my", "i", "we", "our", "do",
            "does", "can", "could", "please",
        ];

        Self {
            synonyms: synonyms
                .into_iter()
                .map(|(k, v)| {
                    (
                        k.to_string(),
                        v.into_iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
            domain_terms: domain_terms.into_iter().map(|s| s.to_string()).collect(),
            stopwords: stopwords.into_iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl VocabularyConfig {
    /// Build the variant -> canonical reverse index
    ///
    /// Canonical terms map to themselves so a single lookup answers both
    /// "is this a domain word" and "what is its canonical form".
    pub fn reverse_index(&self) -> HashMap<String, String> {
        let mut index = HashMap::new();
        for (canonical, variants) in &self.synonyms {
            index.insert(canonical.to_lowercase(), canonical.to_lowercase());
            for variant in variants {
                index.insert(variant.to_lowercase(), canonical.to_lowercase());
            }
        }
        index
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.iter().any(|s| s == token)
    }

    pub fn is_domain_term(&self, token: &str) -> bool {
        self.domain_terms.iter().any(|t| t == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_index_resolves_variants() {
        let vocabulary = VocabularyConfig::default();
        let index = vocabulary.reverse_index();

        assert_eq!(index.get("earnings").map(String::as_str), Some("income"));
        assert_eq!(index.get("income").map(String::as_str), Some("income"));
        assert_eq!(index.get("vs").map(String::as_str), Some("compare"));
    }

    #[test]
    fn test_stopwords() {
        let vocabulary = VocabularyConfig::default();
        assert!(vocabulary.is_stopword("the"));
        assert!(!vocabulary.is_stopword("income"));
    }
}
