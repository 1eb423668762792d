//! Analysis endpoint descriptors
//!
//! One descriptor per downstream analysis pipeline. All endpoint-specific
//! routing behavior lives here as data (terms, weights, thresholds,
//! priority); the classifier is a single generic loop over it, so new
//! endpoints are added without touching classifier code.

use serde::{Deserialize, Serialize};

/// Category a boost term belongs to
///
/// Distinct matched categories break ties between endpoints with equal raw
/// scores: an endpoint matched across more categories wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    /// Population, age, household terms
    Demographic,
    /// Market share, penetration, sales terms
    Market,
    /// Brand and competitor terms
    Brand,
    /// Place, area, distance terms
    Geographic,
    /// Trend, season, time-window terms
    Temporal,
    /// Named measure terms (income, traffic, rent)
    Metric,
    /// Everything else
    General,
}

/// A weighted term or phrase in an endpoint's intent signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostTerm {
    /// Single token or multi-word phrase, lowercase
    pub term: String,
    /// Score added when the term matches
    pub weight: f32,
    #[serde(default = "default_category")]
    pub category: TermCategory,
}

fn default_category() -> TermCategory {
    TermCategory::General
}

impl BoostTerm {
    pub fn new(term: impl Into<String>, weight: f32, category: TermCategory) -> Self {
        Self {
            term: term.into(),
            weight,
            category,
        }
    }

    /// Multi-word phrases earn the contiguity bonus when matched whole
    pub fn is_phrase(&self) -> bool {
        self.term.contains(' ')
    }
}

/// One downstream analysis pipeline
///
/// Immutable for the process lifetime; replaced wholesale on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Stable id, used as the path segment handed to the analysis service
    pub id: String,
    /// Weighted intent signature
    pub boost_terms: Vec<BoostTerm>,
    /// Confidence the aggregated score must reach for a successful route
    pub min_confidence: f32,
    /// Static tie-break rank, lower wins
    pub priority_rank: u32,
    /// Data fields the downstream pipeline needs
    pub required_fields: Vec<String>,
    /// Comparison-style endpoint; earns the relational-context bonus
    #[serde(default)]
    pub comparative: bool,
    /// Visualization the pipeline produces, carried through to the UI
    pub visualization: String,
}

impl EndpointDescriptor {
    /// Maximum raw score this signature can produce
    ///
    /// Phrase terms count at the phrase-bonus multiplier since a contiguous
    /// match is the best case. Used to normalize raw scores to [0, 1].
    pub fn max_signature_score(&self, phrase_bonus: f32) -> f32 {
        self.boost_terms
            .iter()
            .map(|t| {
                if t.is_phrase() {
                    t.weight * phrase_bonus
                } else {
                    t.weight
                }
            })
            .sum()
    }
}
