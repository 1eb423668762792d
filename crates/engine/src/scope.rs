//! Scope validation
//!
//! First-pass admissibility: is this query plausibly about the supported
//! domain at all. Rejection here is terminal; no endpoint-specific
//! scoring runs afterwards.

use std::collections::HashSet;

use georoute_config::DomainConfig;
use georoute_core::{Query, Scope, ValidationResult};

use crate::settings::EngineConfig;
use crate::text;

/// Union of boost-term tokens, domain terms, and synonym variants
///
/// Shared by the validator (overlap ratio) and domain adaptation
/// (domain-relevance counting).
pub(crate) fn domain_term_set(domain: &DomainConfig) -> HashSet<String> {
    let mut set = HashSet::new();

    for endpoint in &domain.endpoints {
        for boost in &endpoint.boost_terms {
            for token in text::tokens(&boost.term) {
                set.insert(token);
            }
        }
    }
    for term in &domain.vocabulary.domain_terms {
        for token in text::tokens(term) {
            set.insert(token);
        }
    }
    for (canonical, variants) in &domain.vocabulary.synonyms {
        for token in text::tokens(canonical) {
            set.insert(token);
        }
        for variant in variants {
            for token in text::tokens(variant) {
                set.insert(token);
            }
        }
    }

    set
}

/// Lexical-overlap scope validator with hard-reject heuristics
pub struct ScopeValidator {
    config: EngineConfig,
}

impl ScopeValidator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Classify the query as in or out of the supported domain
    ///
    /// Hard rejects force `OutOfScope` at confidence 1.0. Otherwise the
    /// decision is the overlap ratio of content tokens against the union
    /// of all endpoint boost terms and the domain vocabulary; the
    /// conversation context is consulted only when the query alone falls
    /// below the floor.
    pub fn validate(&self, query: &Query, domain: &DomainConfig) -> ValidationResult {
        if !text::has_alphabetic(&query.text) {
            return ValidationResult::rejected("no alphabetic tokens");
        }

        let query_tokens = text::tokens(&query.text);
        if query_tokens.len() < self.config.min_tokens {
            return ValidationResult::rejected(format!(
                "fewer than {} tokens",
                self.config.min_tokens
            ));
        }

        let domain_terms = domain_term_set(domain);
        let (matched, ratio) = Self::overlap(&query_tokens, &domain_terms, domain);

        // Nothing in the query is a known domain token: hard reject,
        // unless prior turns recognizably anchor it to the domain.
        if matched == 0 {
            let context_matched = query
                .conversation_context
                .as_deref()
                .map(|c| Self::overlap(&text::tokens(c), &domain_terms, domain).0)
                .unwrap_or(0);
            if context_matched == 0 {
                return ValidationResult::rejected("no recognizable domain tokens");
            }
        }

        if ratio > self.config.scope_floor {
            return ValidationResult {
                scope: Scope::InScope,
                confidence: ratio.clamp(0.0, 1.0),
                reasons: vec![format!(
                    "lexical overlap {ratio:.2} above floor {:.2}",
                    self.config.scope_floor
                )],
            };
        }

        // Below the floor on the query alone: let prior turns disambiguate
        if let Some(context) = &query.conversation_context {
            let mut combined = query_tokens.clone();
            combined.extend(text::tokens(context));
            let (_, context_ratio) = Self::overlap(&combined, &domain_terms, domain);

            if context_ratio > self.config.scope_floor {
                return ValidationResult {
                    scope: Scope::InScope,
                    confidence: context_ratio.clamp(0.0, 1.0),
                    reasons: vec![format!(
                        "overlap {ratio:.2} below floor, conversation context raised it to {context_ratio:.2}"
                    )],
                };
            }
        }

        ValidationResult {
            scope: Scope::OutOfScope,
            confidence: ratio.clamp(0.0, 1.0),
            reasons: vec![format!(
                "lexical overlap {ratio:.2} at or below floor {:.2}",
                self.config.scope_floor
            )],
        }
    }

    /// Matched count and fraction of non-stopword tokens in the domain set
    fn overlap(
        query_tokens: &[String],
        domain_terms: &HashSet<String>,
        domain: &DomainConfig,
    ) -> (usize, f32) {
        let content: Vec<&String> = query_tokens
            .iter()
            .filter(|t| !domain.vocabulary.is_stopword(t))
            .collect();
        if content.is_empty() {
            return (0, 0.0);
        }

        let matched = content.iter().filter(|t| domain_terms.contains(**t)).count();
        (matched, matched as f32 / content.len() as f32)
    }
}
