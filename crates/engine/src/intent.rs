//! Intent classification
//!
//! A single generic scoring loop over endpoint descriptor data. All
//! endpoint-specific behavior (terms, weights, thresholds, priority)
//! lives in configuration, so new endpoints never touch this code.

use std::collections::HashSet;

use georoute_config::DomainConfig;
use georoute_core::Query;

use crate::adaptation::DomainEnhancement;
use crate::settings::EngineConfig;
use crate::text::{self, TermMatch};

/// Comparison connectives that trigger the relational bonus
const RELATIONAL_TERMS: &[&str] = &[
    "compare",
    "comparison",
    "versus",
    "vs",
    "against",
    "between",
    "difference",
    "better",
    "contrast",
];

/// One scored endpoint
///
/// Carries everything downstream layers need by value so no config
/// re-lookup happens after classification.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub endpoint_id: String,
    /// Raw additive score
    pub raw_score: f32,
    /// Maximum score this endpoint could have reached on this query
    pub max_score: f32,
    pub matched_terms: Vec<String>,
    pub matched_entities: Vec<String>,
    /// Distinct boost-term categories matched, first tie-break
    pub category_count: usize,
    pub priority_rank: u32,
    pub min_confidence: f32,
    pub comparative: bool,
    pub visualization: String,
    pub required_fields: Vec<String>,
    /// Short per-endpoint reasoning line
    pub reasoning: String,
}

impl Candidate {
    /// Raw score normalized against this endpoint's own maximum
    pub fn normalized(&self) -> f32 {
        if self.max_score <= 0.0 {
            return 0.0;
        }
        (self.raw_score / self.max_score).clamp(0.0, 1.0)
    }
}

/// Scores a query against every endpoint's intent signature
///
/// Never filters by threshold; thresholding belongs to the aggregator.
pub struct IntentClassifier {
    config: EngineConfig,
}

impl IntentClassifier {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Rank all endpoints with a non-zero signature match
    pub fn classify(
        &self,
        query: &Query,
        enhancement: &DomainEnhancement,
        domain: &DomainConfig,
    ) -> Vec<Candidate> {
        let raw_tokens = text::tokens(&query.text);
        let enhanced_tokens = &enhancement.enhanced_tokens;

        // First pass: per-endpoint signature matches, kept for the
        // cross-endpoint overlap penalty below.
        let matches: Vec<(usize, Vec<(&str, f32, TermMatch)>)> = domain
            .endpoints
            .iter()
            .enumerate()
            .map(|(i, endpoint)| {
                let matched = endpoint
                    .boost_terms
                    .iter()
                    .filter_map(|boost| {
                        let hit = Self::match_either(&raw_tokens, enhanced_tokens, &boost.term);
                        (hit != TermMatch::None).then_some((boost.term.as_str(), boost.weight, hit))
                    })
                    .collect();
                (i, matched)
            })
            .collect();

        let relational = Self::has_relational_context(&raw_tokens, enhanced_tokens);
        let entity_count = enhancement.entities.len();
        let entity_ids: Vec<String> =
            crate::adaptation::unique_canonicals(&enhancement.entities);

        let mut candidates: Vec<Candidate> = Vec::new();
        for (i, matched) in &matches {
            if matched.is_empty() {
                continue;
            }
            let endpoint = &domain.endpoints[*i];

            let mut score = 0.0;
            let mut terms = Vec::new();
            let mut categories: HashSet<_> = HashSet::new();
            let own_terms: HashSet<&str> =
                endpoint.boost_terms.iter().map(|b| b.term.as_str()).collect();

            for (term, weight, hit) in matched {
                let phrase = term.contains(' ');
                score += match hit {
                    TermMatch::Exact if phrase => weight * self.config.phrase_bonus,
                    _ => *weight,
                };
                terms.push(term.to_string());
                if let Some(boost) = endpoint.boost_terms.iter().find(|b| b.term == *term) {
                    categories.insert(boost.category);
                }
            }

            score += entity_count as f32 * self.config.entity_bonus;

            let relational_applied = endpoint.comparative && relational;
            if relational_applied {
                score += self.config.relational_bonus;
            }

            // Vocabulary claimed by other endpoints argues against this
            // one, proportional to the foreign term's weight.
            let mut penalty = 0.0;
            for (j, other_matched) in &matches {
                if j == i {
                    continue;
                }
                for (term, weight, _) in other_matched {
                    if !own_terms.contains(term) {
                        penalty += self.config.overlap_penalty * weight;
                    }
                }
            }
            score -= penalty;

            if score <= 0.0 {
                continue;
            }

            let max_score = endpoint.max_signature_score(self.config.phrase_bonus)
                + entity_count as f32 * self.config.entity_bonus
                + if relational_applied {
                    self.config.relational_bonus
                } else {
                    0.0
                };

            let reasoning = format!(
                "{}: score {:.2} (terms: {}; {} entities{})",
                endpoint.id,
                score,
                terms.join(", "),
                entity_count,
                if penalty > 0.0 {
                    format!("; overlap penalty -{penalty:.2}")
                } else {
                    String::new()
                },
            );

            candidates.push(Candidate {
                endpoint_id: endpoint.id.clone(),
                raw_score: score,
                max_score,
                matched_terms: terms,
                matched_entities: entity_ids.clone(),
                category_count: categories.len(),
                priority_rank: endpoint.priority_rank,
                min_confidence: endpoint.min_confidence,
                comparative: endpoint.comparative,
                visualization: endpoint.visualization.clone(),
                required_fields: endpoint.required_fields.clone(),
                reasoning,
            });
        }

        Self::rank(&mut candidates);
        tracing::debug!(candidates = candidates.len(), "intent classification complete");
        candidates
    }

    /// Match against the raw query, falling back to the canonical rewrite
    fn match_either(raw: &[String], enhanced: &[String], term: &str) -> TermMatch {
        match text::match_term(raw, term) {
            TermMatch::None => text::match_term(enhanced, term),
            hit => hit,
        }
    }

    fn has_relational_context(raw: &[String], enhanced: &[String]) -> bool {
        RELATIONAL_TERMS
            .iter()
            .any(|t| raw.iter().any(|w| w == t) || enhanced.iter().any(|w| w == t))
    }

    /// Descending raw score; ties by matched category count, then by the
    /// endpoint's static priority rank.
    fn rank(candidates: &mut [Candidate]) {
        candidates.sort_by(|a, b| {
            b.raw_score
                .partial_cmp(&a.raw_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.category_count.cmp(&a.category_count))
                .then_with(|| a.priority_rank.cmp(&b.priority_rank))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptation::DomainAdapter;

    fn classify(query_text: &str) -> Vec<Candidate> {
        let domain = DomainConfig::default();
        let query = Query::new(query_text);
        let enhancement = DomainAdapter::new().enhance(&query, &domain);
        IntentClassifier::new(EngineConfig::default()).classify(&query, &enhancement, &domain)
    }

    #[test]
    fn test_comparative_query_ranks_comparison_endpoint_first() {
        let candidates = classify("compare nike and adidas market share");

        assert_eq!(candidates[0].endpoint_id, "competitor_comparison");
        assert_eq!(
            candidates[0].matched_entities,
            vec!["nike".to_string(), "adidas".to_string()]
        );
    }

    #[test]
    fn test_plain_market_share_query() {
        let candidates = classify("market share by county");
        assert_eq!(candidates[0].endpoint_id, "market_share");
    }

    #[test]
    fn test_no_threshold_filtering() {
        let candidates = classify("income and population and sales data");

        // Weak matches still appear; the aggregator decides cut-offs
        assert!(candidates.len() >= 3);
    }

    #[test]
    fn test_monotonicity_of_raw_score() {
        let without = classify("market share downtown");
        let with = classify("market share penetration downtown");

        let score = |cands: &[Candidate]| {
            cands
                .iter()
                .find(|c| c.endpoint_id == "market_share")
                .map(|c| c.raw_score)
                .unwrap_or(0.0)
        };

        assert!(score(&with) >= score(&without));
    }

    #[test]
    fn test_synonym_expanded_matching() {
        let candidates = classify("revenue performance by district");
        assert!(candidates
            .iter()
            .any(|c| c.endpoint_id == "sales_performance"));
    }

    #[test]
    fn test_phrase_beats_scattered() {
        let phrase = classify("show market share here");
        let scattered = classify("show share of this market");

        let score = |cands: &[Candidate]| {
            cands
                .iter()
                .find(|c| c.endpoint_id == "market_share")
                .map(|c| c.raw_score)
                .unwrap_or(0.0)
        };

        assert!(score(&phrase) > score(&scattered));
    }

    #[test]
    fn test_tie_break_by_priority_rank() {
        use georoute_config::{BoostTerm, EndpointDescriptor, TermCategory};

        let mut domain = DomainConfig::default();
        let make = |id: &str, rank: u32| EndpointDescriptor {
            id: id.to_string(),
            boost_terms: vec![BoostTerm::new("twin", 1.0, TermCategory::General)],
            min_confidence: 0.5,
            priority_rank: rank,
            required_fields: vec![],
            comparative: false,
            visualization: "choropleth".to_string(),
        };
        domain.endpoints = vec![make("second", 2), make("first", 1)];

        let query = Query::new("twin twin");
        let enhancement = DomainAdapter::new().enhance(&query, &domain);
        let candidates =
            IntentClassifier::new(EngineConfig::default()).classify(&query, &enhancement, &domain);

        assert_eq!(candidates[0].endpoint_id, "first");
    }

    #[test]
    fn test_normalized_in_unit_range() {
        for candidate in classify("compare nike and adidas market share") {
            let n = candidate.normalized();
            assert!((0.0..=1.0).contains(&n));
        }
    }
}
