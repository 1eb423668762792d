//! Semantic similarity collaborator
//!
//! An optional backend that scores a query against candidate endpoint ids.
//! Absence, error, or timeout is a normal outcome: the engine degrades to
//! keyword-only scoring and must never fail a request over it.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::Result;

/// Similarity scorer over candidate endpoint ids
///
/// Implementations:
/// - `HttpSimilarityProvider` - JSON-over-HTTP call with a strict timeout
///
/// The returned map may omit candidates the backend could not score;
/// missing entries fall back to the keyword score alone.
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    /// Score `query` against each candidate id, values in [0, 1]
    async fn similarity(
        &self,
        query: &str,
        candidate_ids: &[String],
    ) -> Result<HashMap<String, f32>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
