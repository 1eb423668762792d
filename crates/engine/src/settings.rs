//! Engine tunables
//!
//! Every informally-observed parameter (blend weights, the near-miss
//! band, bonuses and penalties) is configuration here rather than a
//! constant buried in a layer.

use serde::{Deserialize, Serialize};

/// Tunable scoring parameters for the routing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lexical-overlap ratio a query must exceed to be in scope
    pub scope_floor: f32,
    /// Queries with fewer tokens are rejected outright
    pub min_tokens: usize,
    /// Multiplier for contiguous multi-word phrase matches
    pub phrase_bonus: f32,
    /// Fixed bonus per recognized entity in the query
    pub entity_bonus: f32,
    /// Bonus for comparison connectives on comparative endpoints
    pub relational_bonus: f32,
    /// Fraction of a foreign matched term's weight subtracted as penalty
    pub overlap_penalty: f32,
    /// Width of the clarify band below an endpoint's threshold
    pub near_miss_band: f32,
    /// Keyword weight in the keyword/semantic blend (semantic gets the rest)
    pub semantic_blend: f32,
    /// Timeout for the similarity call
    pub semantic_timeout_ms: u64,
    /// How many leading candidates get context/field enhancement
    pub context_top_k: usize,
    /// Additive boost per required field explicitly mentioned in the query
    pub field_mention_boost: f32,
    /// Cap on the total contextual boost
    pub field_mention_cap: f32,
    /// Alternatives surfaced on clarify/reject
    pub max_alternatives: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scope_floor: 0.15,
            min_tokens: 2,
            phrase_bonus: 1.5,
            entity_bonus: 0.8,
            relational_bonus: 0.6,
            overlap_penalty: 0.25,
            near_miss_band: 0.15,
            semantic_blend: 0.7,
            semantic_timeout_ms: 300,
            context_top_k: 3,
            field_mention_boost: 0.05,
            field_mention_cap: 0.15,
            max_alternatives: 3,
        }
    }
}
