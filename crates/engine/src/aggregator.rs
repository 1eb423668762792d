//! Confidence aggregation and the final routing decision
//!
//! Combines every layer's output into one confidence and one decision:
//! route, clarify, or reject. All outcomes are data; nothing here throws
//! for a low score.

use std::collections::HashMap;

use georoute_core::{
    Alternative, EarlyExit, ResponseKind, RoutingResult, UserResponse, ValidationResult,
};

use crate::adaptation::DomainEnhancement;
use crate::context::ContextEnhancement;
use crate::intent::Candidate;
use crate::semantic::SemanticOutcome;
use crate::settings::EngineConfig;

/// Layer names as they appear in `layers_executed`
pub(crate) const LAYER_SCOPE: &str = "scope_validation";
pub(crate) const LAYER_ADAPTATION: &str = "domain_adaptation";
pub(crate) const LAYER_INTENT: &str = "intent_classification";
pub(crate) const LAYER_CONTEXT: &str = "context_enhancement";
pub(crate) const LAYER_SEMANTIC: &str = "semantic_enhancement";

/// Builds the final `RoutingResult`
pub struct ConfidenceAggregator {
    config: EngineConfig,
}

impl ConfidenceAggregator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Combine layer outputs into the routing decision
    pub fn decide(
        &self,
        validation: ValidationResult,
        candidates: &[Candidate],
        enhancement: &DomainEnhancement,
        contexts: &HashMap<String, ContextEnhancement>,
        semantic: &SemanticOutcome,
    ) -> RoutingResult {
        if !validation.is_in_scope() {
            return self.reject_out_of_scope(validation);
        }

        let mut reasoning: Vec<String> = validation
            .reasons
            .iter()
            .map(|r| format!("validation: {r}"))
            .collect();
        reasoning.extend(enhancement.trace.iter().map(|t| format!("adaptation: {t}")));

        if candidates.is_empty() {
            reasoning.push("intent: no endpoint matched any signature term".to_string());
            return RoutingResult {
                endpoint: None,
                confidence: 0.0,
                success: false,
                validation,
                layers_executed: vec![
                    LAYER_SCOPE.to_string(),
                    LAYER_ADAPTATION.to_string(),
                    LAYER_INTENT.to_string(),
                ],
                early_exit: Some(EarlyExit::NoCandidates),
                reasoning,
                alternatives: Vec::new(),
                user_response: UserResponse {
                    kind: ResponseKind::Rejected,
                    message: "I couldn't match your question to any analysis I can run. \
                              Try asking about demographics, market share, or site selection."
                        .to_string(),
                    suggestions: Vec::new(),
                },
                visualization: None,
            };
        }

        for candidate in candidates.iter().take(self.config.context_top_k) {
            reasoning.push(format!("intent: {}", candidate.reasoning));
        }

        // Choose the leader: the keyword ranking stands unless the
        // semantic blend strictly promotes a different candidate.
        let keyword_leader = &candidates[0];
        let (leader_id, intent_component, semantic_applied) = match semantic {
            SemanticOutcome::Applied { blended, provider } => {
                let keyword_leader_blend = blended
                    .iter()
                    .find(|(id, _)| *id == keyword_leader.endpoint_id)
                    .map(|(_, s)| *s)
                    .unwrap_or_else(|| keyword_leader.normalized());
                reasoning.push(format!(
                    "semantic: blended keyword/semantic scores via {provider} provider"
                ));
                match blended.first() {
                    Some((top_id, top_score))
                        if *top_id != keyword_leader.endpoint_id
                            && *top_score > keyword_leader_blend =>
                    {
                        reasoning.push(format!(
                            "semantic: promoted {top_id} above {}",
                            keyword_leader.endpoint_id
                        ));
                        (top_id.clone(), *top_score, true)
                    }
                    _ => (keyword_leader.endpoint_id.clone(), keyword_leader_blend, true),
                }
            }
            SemanticOutcome::Unavailable { .. } => (
                keyword_leader.endpoint_id.clone(),
                keyword_leader.normalized(),
                false,
            ),
        };

        let leader = candidates
            .iter()
            .find(|c| c.endpoint_id == leader_id)
            .unwrap_or(keyword_leader);

        let (coverage, contextual_boost) = match contexts.get(&leader.endpoint_id) {
            Some(context) => {
                reasoning.push(format!("context: {}", context.trace));
                (context.coverage_score, context.contextual_boost)
            }
            // Promoted from outside the context top-k; no field data
            None => {
                reasoning.push(format!(
                    "context: no field data computed for {}",
                    leader.endpoint_id
                ));
                (1.0, 0.0)
            }
        };

        let coverage_factor = 0.5 + 0.5 * coverage;
        let final_confidence = (intent_component * enhancement.domain_relevance * coverage_factor
            + contextual_boost)
            .clamp(0.0, 1.0);

        reasoning.push(format!(
            "aggregation: confidence {final_confidence:.2} = intent {intent_component:.2} \
             x relevance {:.2} x coverage factor {coverage_factor:.2}{}",
            enhancement.domain_relevance,
            if contextual_boost > 0.0 {
                format!(" + field boost {contextual_boost:.2}")
            } else {
                String::new()
            },
        ));

        let alternatives = self.alternatives(candidates, &leader.endpoint_id, semantic);
        let success = final_confidence >= leader.min_confidence;

        let mut layers = vec![
            LAYER_SCOPE.to_string(),
            LAYER_ADAPTATION.to_string(),
            LAYER_INTENT.to_string(),
            LAYER_CONTEXT.to_string(),
        ];
        if semantic_applied {
            layers.push(LAYER_SEMANTIC.to_string());
        }

        let user_response = if success {
            UserResponse {
                kind: ResponseKind::Routed,
                message: format!("Running {} analysis.", humanize(&leader.endpoint_id)),
                suggestions: Vec::new(),
            }
        } else if final_confidence >= leader.min_confidence - self.config.near_miss_band {
            UserResponse {
                kind: ResponseKind::Clarify,
                message: format!(
                    "It sounds like you're asking about {}, but I'm not certain. \
                     Could you rephrase, or pick one of the suggestions?",
                    humanize(&leader.endpoint_id)
                ),
                suggestions: suggestion_list(&leader.endpoint_id, &alternatives),
            }
        } else {
            UserResponse {
                kind: ResponseKind::Rejected,
                message: "I couldn't understand that well enough to pick an analysis. \
                          Here's what came closest."
                    .to_string(),
                suggestions: suggestion_list(&leader.endpoint_id, &alternatives),
            }
        };

        RoutingResult {
            endpoint: success.then(|| leader.endpoint_id.clone()),
            confidence: final_confidence,
            success,
            validation,
            layers_executed: layers,
            early_exit: None,
            reasoning,
            alternatives,
            user_response,
            visualization: success.then(|| leader.visualization.clone()),
        }
    }

    /// Terminal rejection from scope validation
    ///
    /// Exposed so the router can short-circuit without running the later
    /// layers at all.
    pub fn reject_out_of_scope(&self, validation: ValidationResult) -> RoutingResult {
        RoutingResult::validation_rejected(
            validation,
            "That doesn't look like a question about the geographic data I can analyze.",
        )
    }

    /// Ranked runners-up below the leader
    fn alternatives(
        &self,
        candidates: &[Candidate],
        leader_id: &str,
        semantic: &SemanticOutcome,
    ) -> Vec<Alternative> {
        let scored: Vec<(String, f32)> = match semantic {
            SemanticOutcome::Applied { blended, .. } => blended.clone(),
            SemanticOutcome::Unavailable { .. } => candidates
                .iter()
                .map(|c| (c.endpoint_id.clone(), c.normalized()))
                .collect(),
        };

        scored
            .into_iter()
            .filter(|(id, _)| id != leader_id)
            .take(self.config.max_alternatives)
            .map(|(endpoint, score)| Alternative { endpoint, score })
            .collect()
    }
}

/// Endpoint id as a readable phrase
fn humanize(endpoint_id: &str) -> String {
    endpoint_id.replace('_', " ")
}

fn suggestion_list(leader_id: &str, alternatives: &[Alternative]) -> Vec<String> {
    std::iter::once(humanize(leader_id))
        .chain(alternatives.iter().map(|a| humanize(&a.endpoint)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use georoute_core::Scope;

    fn aggregator() -> ConfidenceAggregator {
        ConfidenceAggregator::new(EngineConfig::default())
    }

    fn in_scope() -> ValidationResult {
        ValidationResult {
            scope: Scope::InScope,
            confidence: 0.8,
            reasons: vec!["lexical overlap 0.80 above floor 0.15".to_string()],
        }
    }

    fn enhancement(relevance: f32) -> DomainEnhancement {
        DomainEnhancement {
            enhanced_query: "test".to_string(),
            enhanced_tokens: vec!["test".to_string()],
            domain_relevance: relevance,
            entities: vec![],
            trace: vec![format!("domain relevance {relevance:.2}")],
        }
    }

    fn candidate(id: &str, raw: f32, max: f32, min_confidence: f32) -> Candidate {
        Candidate {
            endpoint_id: id.to_string(),
            raw_score: raw,
            max_score: max,
            matched_terms: vec!["term".to_string()],
            matched_entities: vec![],
            category_count: 1,
            priority_rank: 1,
            min_confidence,
            comparative: false,
            visualization: "choropleth".to_string(),
            required_fields: vec![],
            reasoning: format!("{id}: score {raw:.2}"),
        }
    }

    fn full_context(id: &str) -> HashMap<String, ContextEnhancement> {
        HashMap::from([(
            id.to_string(),
            ContextEnhancement {
                endpoint_id: id.to_string(),
                coverage_score: 1.0,
                contextual_boost: 0.0,
                fields: vec![],
                trace: format!("{id}: field coverage 1.00 (0/0), 0 mentioned"),
            },
        )])
    }

    #[test]
    fn test_out_of_scope_is_terminal() {
        let result = aggregator().decide(
            ValidationResult::rejected("no recognizable domain tokens"),
            &[candidate("a", 1.0, 1.0, 0.5)],
            &enhancement(0.0),
            &HashMap::new(),
            &SemanticOutcome::Unavailable {
                reason: "not configured".to_string(),
            },
        );

        assert!(result.endpoint.is_none());
        assert_eq!(result.early_exit, Some(EarlyExit::ValidationRejected));
        assert_eq!(result.layers_executed, vec![LAYER_SCOPE]);
    }

    #[test]
    fn test_no_candidates() {
        let result = aggregator().decide(
            in_scope(),
            &[],
            &enhancement(0.5),
            &HashMap::new(),
            &SemanticOutcome::Unavailable {
                reason: "not configured".to_string(),
            },
        );

        assert!(result.endpoint.is_none());
        assert_eq!(result.early_exit, Some(EarlyExit::NoCandidates));
        assert_eq!(result.user_response.kind, ResponseKind::Rejected);
    }

    #[test]
    fn test_confident_route() {
        let result = aggregator().decide(
            in_scope(),
            &[candidate("income_distribution", 3.0, 3.0, 0.5)],
            &enhancement(0.9),
            &full_context("income_distribution"),
            &SemanticOutcome::Unavailable {
                reason: "not configured".to_string(),
            },
        );

        assert!(result.success);
        assert_eq!(result.endpoint.as_deref(), Some("income_distribution"));
        assert_eq!(result.user_response.kind, ResponseKind::Routed);
        assert_eq!(result.visualization.as_deref(), Some("choropleth"));
        assert!((result.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_near_miss_clarifies_with_alternatives() {
        let candidates = vec![
            candidate("a", 2.0, 4.0, 0.6), // normalized 0.5
            candidate("b", 1.5, 4.0, 0.5),
            candidate("c", 1.0, 4.0, 0.5),
        ];
        // final = 0.5 * 1.0 * 1.0 = 0.5, within 0.15 of 0.6
        let result = aggregator().decide(
            in_scope(),
            &candidates,
            &enhancement(1.0),
            &full_context("a"),
            &SemanticOutcome::Unavailable {
                reason: "not configured".to_string(),
            },
        );

        assert!(!result.success);
        assert!(result.endpoint.is_none());
        assert_eq!(result.user_response.kind, ResponseKind::Clarify);
        assert_eq!(result.alternatives.len(), 2);
        assert_eq!(result.alternatives[0].endpoint, "b");
    }

    #[test]
    fn test_deep_miss_rejects() {
        // final = 0.25 * 0.6 = 0.15, far below 0.6 - 0.15
        let result = aggregator().decide(
            in_scope(),
            &[candidate("a", 1.0, 4.0, 0.6)],
            &enhancement(0.6),
            &full_context("a"),
            &SemanticOutcome::Unavailable {
                reason: "not configured".to_string(),
            },
        );

        assert!(!result.success);
        assert_eq!(result.user_response.kind, ResponseKind::Rejected);
        assert!(!result.user_response.suggestions.is_empty());
    }

    #[test]
    fn test_semantic_promotion() {
        let candidates = vec![
            candidate("a", 3.0, 4.0, 0.5), // keyword leader, normalized 0.75
            candidate("b", 2.8, 4.0, 0.5),
        ];
        let semantic = SemanticOutcome::Applied {
            blended: vec![("b".to_string(), 0.9), ("a".to_string(), 0.6)],
            provider: "fixed".to_string(),
        };

        let mut contexts = full_context("a");
        contexts.extend(full_context("b"));

        let result = aggregator().decide(
            in_scope(),
            &candidates,
            &enhancement(1.0),
            &contexts,
            &semantic,
        );

        assert!(result.success);
        assert_eq!(result.endpoint.as_deref(), Some("b"));
        assert!(result
            .layers_executed
            .contains(&LAYER_SEMANTIC.to_string()));
    }

    #[test]
    fn test_reasoning_follows_layer_order() {
        let result = aggregator().decide(
            in_scope(),
            &[candidate("a", 3.0, 3.0, 0.5)],
            &enhancement(0.9),
            &full_context("a"),
            &SemanticOutcome::Unavailable {
                reason: "not configured".to_string(),
            },
        );

        let first_of = |prefix: &str| {
            result
                .reasoning
                .iter()
                .position(|r| r.starts_with(prefix))
                .unwrap()
        };
        assert!(first_of("validation:") < first_of("adaptation:"));
        assert!(first_of("adaptation:") < first_of("intent:"));
        assert!(first_of("intent:") < first_of("context:"));
        assert!(first_of("context:") < first_of("aggregation:"));
    }
}
