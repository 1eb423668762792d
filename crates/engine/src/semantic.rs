//! Semantic enhancement (optional)
//!
//! Enhancement-only layer: when a similarity backend is reachable it
//! re-scores candidates by blending keyword and semantic scores, and may
//! promote a lower-ranked candidate above the keyword leader. When it is
//! not — unconfigured, erroring, or timing out — the outcome is an
//! explicit `Unavailable` and the pipeline continues on keyword scores
//! alone. Unavailability is logged, never surfaced as a failure.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use georoute_core::{Error, Result, SimilarityProvider};

use crate::intent::Candidate;
use crate::settings::EngineConfig;
use crate::EngineError;

/// Result of the semantic layer: one uniform branch for the aggregator
#[derive(Debug, Clone)]
pub enum SemanticOutcome {
    /// Blended (endpoint id, score) pairs, ranked descending
    Applied {
        blended: Vec<(String, f32)>,
        provider: String,
    },
    /// Backend missing or unreachable; keyword scores stand
    Unavailable { reason: String },
}

impl SemanticOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SemanticOutcome::Applied { .. })
    }
}

/// Blends keyword scores with backend similarity scores
pub struct SemanticEnhancer {
    provider: Option<Arc<dyn SimilarityProvider>>,
    config: EngineConfig,
}

impl SemanticEnhancer {
    /// Enhancer with a similarity backend
    pub fn new(provider: Arc<dyn SimilarityProvider>, config: EngineConfig) -> Self {
        Self {
            provider: Some(provider),
            config,
        }
    }

    /// Enhancer without a backend; always `Unavailable`
    pub fn disabled(config: EngineConfig) -> Self {
        Self {
            provider: None,
            config,
        }
    }

    /// Whether a backend is configured at all
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Re-score candidates through the backend, within the timeout
    pub async fn enhance(&self, query: &str, candidates: &[Candidate]) -> SemanticOutcome {
        let Some(provider) = &self.provider else {
            return SemanticOutcome::Unavailable {
                reason: "not configured".to_string(),
            };
        };

        let ids: Vec<String> = candidates.iter().map(|c| c.endpoint_id.clone()).collect();
        let timeout = Duration::from_millis(self.config.semantic_timeout_ms);

        let scores = match tokio::time::timeout(timeout, provider.similarity(query, &ids)).await {
            Err(_) => {
                tracing::warn!(
                    provider = provider.name(),
                    timeout_ms = self.config.semantic_timeout_ms,
                    "similarity call timed out, continuing keyword-only"
                );
                return SemanticOutcome::Unavailable {
                    reason: "timeout".to_string(),
                };
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    "similarity call failed, continuing keyword-only"
                );
                return SemanticOutcome::Unavailable {
                    reason: e.to_string(),
                };
            }
            Ok(Ok(scores)) => scores,
        };

        let mut blended: Vec<(String, f32)> = candidates
            .iter()
            .map(|c| {
                let keyword = c.normalized();
                let score = match scores.get(&c.endpoint_id) {
                    Some(sem) => {
                        self.config.semantic_blend * keyword
                            + (1.0 - self.config.semantic_blend) * sem.clamp(0.0, 1.0)
                    }
                    // Backend skipped this candidate; keyword score stands
                    None => keyword,
                };
                (c.endpoint_id.clone(), score)
            })
            .collect();
        blended.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        SemanticOutcome::Applied {
            blended,
            provider: provider.name().to_string(),
        }
    }
}

/// JSON-over-HTTP similarity backend
///
/// POSTs `{query, candidates}` and expects `{scores: {id: score}}`. The
/// client carries its own timeout in addition to the engine-level one.
pub struct HttpSimilarityProvider {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct SimilarityRequest<'a> {
    query: &'a str,
    candidates: &'a [String],
}

#[derive(Deserialize)]
struct SimilarityResponse {
    scores: HashMap<String, f32>,
}

impl HttpSimilarityProvider {
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> std::result::Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| EngineError::Provider(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SimilarityProvider for HttpSimilarityProvider {
    async fn similarity(
        &self,
        query: &str,
        candidate_ids: &[String],
    ) -> Result<HashMap<String, f32>> {
        let request = SimilarityRequest {
            query,
            candidates: candidate_ids,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Similarity(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Similarity(e.to_string()))?;

        let body: SimilarityResponse = response
            .json()
            .await
            .map_err(|e| Error::Similarity(e.to_string()))?;

        Ok(body.scores)
    }

    fn name(&self) -> &str {
        "http"
    }
}
