//! Domain adaptation
//!
//! Rewrites the query into canonical vocabulary for scoring (never shown
//! to the user), extracts recognized entities with their spans, and
//! computes an endpoint-independent domain-relevance signal.

use std::collections::HashMap;

use georoute_config::DomainConfig;
use georoute_core::{EntityKind, EntityMatch, Query};

use crate::scope::domain_term_set;
use crate::text::{self, TokenSpan};

/// Output of the adaptation layer
#[derive(Debug, Clone)]
pub struct DomainEnhancement {
    /// Query with synonym variants replaced by canonical terms
    pub enhanced_query: String,
    /// Tokens of the enhanced query, for downstream matching
    pub enhanced_tokens: Vec<String>,
    /// Fraction of query tokens that are vocabulary, entities, or stopwords
    pub domain_relevance: f32,
    /// Recognized brands and places, with spans in the raw text
    pub entities: Vec<EntityMatch>,
    /// Human-readable trace lines
    pub trace: Vec<String>,
}

/// Synonym rewriting and entity extraction
pub struct DomainAdapter;

impl DomainAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Run adaptation against a configuration snapshot
    pub fn enhance(&self, query: &Query, domain: &DomainConfig) -> DomainEnhancement {
        let spans = text::token_spans(&query.text);
        let entities = Self::recognize_entities(&query.text, &spans, domain);
        let enhanced_tokens = Self::canonicalize(&spans, domain);
        let enhanced_query = enhanced_tokens.join(" ");
        let domain_relevance = Self::domain_relevance(&spans, &entities, domain);

        let mut trace = Vec::new();
        let brand_matches: Vec<EntityMatch> = entities
            .iter()
            .filter(|e| e.is_brand())
            .cloned()
            .collect();
        let brands = unique_canonicals(&brand_matches);
        if !brands.is_empty() {
            trace.push(format!("recognized brands: {}", brands.join(", ")));
        }
        let places: Vec<String> = entities
            .iter()
            .filter(|e| e.is_place())
            .map(|e| format!("'{}' ({})", e.surface, e.canonical))
            .collect();
        if !places.is_empty() {
            trace.push(format!("geographic context: {}", places.join(", ")));
        }
        if enhanced_query != query.text.to_lowercase() {
            trace.push(format!("canonical form: \"{enhanced_query}\""));
        }
        trace.push(format!("domain relevance {domain_relevance:.2}"));

        tracing::debug!(
            entities = entities.len(),
            relevance = domain_relevance,
            "domain adaptation complete"
        );

        DomainEnhancement {
            enhanced_query,
            enhanced_tokens,
            domain_relevance,
            entities,
            trace,
        }
    }

    /// Whole-token, case-insensitive entity recognition
    ///
    /// Longer surfaces are tried first so "new york city" wins over "new
    /// york"; each token participates in at most one match.
    fn recognize_entities(
        raw: &str,
        spans: &[TokenSpan],
        domain: &DomainConfig,
    ) -> Vec<EntityMatch> {
        let mut surfaces: Vec<(Vec<String>, String, EntityKind)> = Vec::new();
        for (surface, id) in domain.entities.brand_surfaces() {
            surfaces.push((text::tokens(&surface), id, EntityKind::Brand));
        }
        for (surface, code) in domain.entities.place_surfaces() {
            surfaces.push((text::tokens(&surface), code, EntityKind::Place));
        }
        surfaces.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let lower: Vec<&str> = spans.iter().map(|s| s.lower.as_str()).collect();
        let mut used = vec![false; spans.len()];
        let mut matches = Vec::new();

        for (surface_tokens, canonical, kind) in &surfaces {
            let n = surface_tokens.len();
            if n == 0 || n > lower.len() {
                continue;
            }
            for start in 0..=lower.len() - n {
                if used[start..start + n].iter().any(|u| *u) {
                    continue;
                }
                if surface_tokens
                    .iter()
                    .zip(&lower[start..start + n])
                    .all(|(s, t)| s == t)
                {
                    used[start..start + n].iter_mut().for_each(|u| *u = true);
                    let byte_span = (spans[start].offset, spans[start + n - 1].end());
                    matches.push(EntityMatch {
                        surface: raw[byte_span.0..byte_span.1].to_string(),
                        canonical: canonical.clone(),
                        kind: *kind,
                        span: byte_span,
                    });
                }
            }
        }

        matches.sort_by_key(|m| m.span.0);
        matches
    }

    /// Replace synonym variants with their canonical terms
    ///
    /// Multi-word variants are folded first ("real estate" -> "housing"),
    /// then remaining tokens map one-to-one through the reverse index.
    fn canonicalize(spans: &[TokenSpan], domain: &DomainConfig) -> Vec<String> {
        let index = domain.vocabulary.reverse_index();

        // Longest variant first; the lexicographic tie-break keeps the
        // rewrite deterministic across map iteration orders.
        let mut phrase_variants: Vec<(Vec<String>, &String, &String)> = index
            .iter()
            .filter(|(variant, _)| variant.contains(' '))
            .map(|(variant, canonical)| (text::tokens(variant), variant, canonical))
            .collect();
        phrase_variants.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.1.cmp(b.1)));

        let mut out = Vec::with_capacity(spans.len());
        let lower: Vec<&str> = spans.iter().map(|s| s.lower.as_str()).collect();
        let mut i = 0;
        'outer: while i < lower.len() {
            for (variant_tokens, _, canonical) in &phrase_variants {
                let n = variant_tokens.len();
                if i + n <= lower.len()
                    && variant_tokens
                        .iter()
                        .zip(&lower[i..i + n])
                        .all(|(v, t)| v == t)
                {
                    out.extend(text::tokens(canonical));
                    i += n;
                    continue 'outer;
                }
            }
            out.push(
                index
                    .get(lower[i])
                    .cloned()
                    .unwrap_or_else(|| lower[i].to_string()),
            );
            i += 1;
        }
        out
    }

    /// Fraction of tokens that are vocabulary, entity, or stopword
    fn domain_relevance(
        spans: &[TokenSpan],
        entities: &[EntityMatch],
        domain: &DomainConfig,
    ) -> f32 {
        if spans.is_empty() {
            return 0.0;
        }

        let terms = domain_term_set(domain);
        let covered = |span: &TokenSpan| {
            entities
                .iter()
                .any(|e| span.offset >= e.span.0 && span.end() <= e.span.1)
        };

        let counted = spans
            .iter()
            .filter(|s| {
                domain.vocabulary.is_stopword(&s.lower)
                    || terms.contains(&s.lower)
                    || covered(s)
            })
            .count();

        counted as f32 / spans.len() as f32
    }
}

impl Default for DomainAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Entity names for trace display, deduplicated in first-seen order
pub(crate) fn unique_canonicals(entities: &[EntityMatch]) -> Vec<String> {
    let mut seen = HashMap::new();
    let mut out = Vec::new();
    for entity in entities {
        if seen.insert(entity.canonical.clone(), ()).is_none() {
            out.push(entity.canonical.clone());
        }
    }
    out
}
