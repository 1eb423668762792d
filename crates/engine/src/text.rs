//! Tokenization and matching utilities
//!
//! Word boundaries come from unicode segmentation so place names and
//! accented text tokenize correctly. All matching is over lowercase
//! tokens; multi-word terms match either contiguously (phrase) or
//! scattered.

use unicode_segmentation::UnicodeSegmentation;

/// Lowercase word tokens
pub fn tokens(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// A word token with its byte offset and original casing
#[derive(Debug, Clone)]
pub struct TokenSpan {
    /// Byte offset in the source text
    pub offset: usize,
    /// Token as written
    pub text: String,
    /// Lowercase form used for matching
    pub lower: String,
}

impl TokenSpan {
    /// Byte offset one past the end of the token
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Word tokens with byte offsets, for span-carrying matches
pub fn token_spans(text: &str) -> Vec<TokenSpan> {
    text.unicode_word_indices()
        .map(|(offset, word)| TokenSpan {
            offset,
            text: word.to_string(),
            lower: word.to_lowercase(),
        })
        .collect()
}

/// Does the text contain at least one alphabetic character?
pub fn has_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// Does `needle` (split into tokens) appear contiguously in `haystack`?
pub fn contains_contiguous(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window.iter().zip(needle).all(|(a, b)| a == b))
}

/// Match kind for a term against a token sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermMatch {
    /// Not present
    None,
    /// All tokens present but not adjacent
    Scattered,
    /// Single token present, or multi-word phrase found contiguously
    Exact,
}

/// Match a (possibly multi-word) term against a token sequence
pub fn match_term(haystack: &[String], term: &str) -> TermMatch {
    let needle = tokens(term);
    match needle.len() {
        0 => TermMatch::None,
        1 => {
            if haystack.contains(&needle[0]) {
                TermMatch::Exact
            } else {
                TermMatch::None
            }
        }
        _ => {
            if contains_contiguous(haystack, &needle) {
                TermMatch::Exact
            } else if needle.iter().all(|t| haystack.contains(t)) {
                TermMatch::Scattered
            } else {
                TermMatch::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_lowercase() {
        assert_eq!(
            tokens("Median Income near Boston"),
            vec!["median", "income", "near", "boston"]
        );
    }

    #[test]
    fn test_token_spans_offsets() {
        let spans = token_spans("Nike vs Adidas");
        assert_eq!(spans[0].offset, 0);
        assert_eq!(spans[0].lower, "nike");
        assert_eq!(spans[0].text, "Nike");
        assert_eq!(spans[2].offset, 8);
        assert_eq!(spans[2].end(), 14);
    }

    #[test]
    fn test_contiguous_phrase() {
        let haystack = tokens("show me market share by county");
        assert_eq!(match_term(&haystack, "market share"), TermMatch::Exact);
    }

    #[test]
    fn test_scattered_phrase() {
        let haystack = tokens("what share of the market is ours");
        assert_eq!(match_term(&haystack, "market share"), TermMatch::Scattered);
    }

    #[test]
    fn test_absent_term() {
        let haystack = tokens("population density downtown");
        assert_eq!(match_term(&haystack, "market share"), TermMatch::None);
    }

    #[test]
    fn test_no_alphabetic() {
        assert!(!has_alphabetic("123 456 !!!"));
        assert!(has_alphabetic("q4 2025"));
    }
}
