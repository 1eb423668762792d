//! Context/field enhancement
//!
//! Cross-references a candidate endpoint's required fields against the
//! live inventory supplied by the data layer. Runs only against the
//! leading candidates to bound cost.

use georoute_core::{FieldInventory, Query};

use crate::intent::Candidate;
use crate::settings::EngineConfig;
use crate::text;

/// Availability and mention status of one required field
#[derive(Debug, Clone)]
pub struct FieldRequirement {
    pub field: String,
    /// Present (and non-empty) in the live inventory
    pub present: bool,
    /// Explicitly mentioned in the query text or via the field hint
    pub mentioned: bool,
}

/// Output of the context layer for one candidate
#[derive(Debug, Clone)]
pub struct ContextEnhancement {
    pub endpoint_id: String,
    /// Fraction of required fields present in the inventory
    pub coverage_score: f32,
    /// Additive reward for fields the user named directly
    pub contextual_boost: f32,
    pub fields: Vec<FieldRequirement>,
    pub trace: String,
}

/// Computes field coverage and mention boosts
pub struct ContextEnhancer {
    config: EngineConfig,
}

impl ContextEnhancer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Score one candidate against the live field inventory
    pub fn enhance(
        &self,
        candidate: &Candidate,
        inventory: &dyn FieldInventory,
        query: &Query,
    ) -> ContextEnhancement {
        let query_tokens = text::tokens(&query.text);

        let fields: Vec<FieldRequirement> = candidate
            .required_fields
            .iter()
            .map(|field| FieldRequirement {
                field: field.clone(),
                present: inventory.has_field(&candidate.endpoint_id, field),
                mentioned: Self::mentioned(field, &query_tokens, query.field_hint.as_deref()),
            })
            .collect();

        let coverage_score = if fields.is_empty() {
            1.0
        } else {
            fields.iter().filter(|f| f.present).count() as f32 / fields.len() as f32
        };

        let mentions = fields.iter().filter(|f| f.mentioned).count();
        let contextual_boost = (mentions as f32 * self.config.field_mention_boost)
            .min(self.config.field_mention_cap);

        let trace = format!(
            "{}: field coverage {:.2} ({}/{}), {} mentioned",
            candidate.endpoint_id,
            coverage_score,
            fields.iter().filter(|f| f.present).count(),
            fields.len(),
            mentions,
        );

        ContextEnhancement {
            endpoint_id: candidate.endpoint_id.clone(),
            coverage_score,
            contextual_boost,
            fields,
            trace,
        }
    }

    /// A field is mentioned if its name (underscores as spaces) appears
    /// contiguously in the query, or the caller hinted it directly.
    fn mentioned(field: &str, query_tokens: &[String], hint: Option<&str>) -> bool {
        if hint.is_some_and(|h| h.eq_ignore_ascii_case(field)) {
            return true;
        }
        let alias = field.replace('_', " ");
        text::match_term(query_tokens, &alias) == text::TermMatch::Exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use georoute_core::StaticFieldInventory;

    fn candidate(fields: &[&str]) -> Candidate {
        Candidate {
            endpoint_id: "income_distribution".to_string(),
            raw_score: 2.0,
            max_score: 4.0,
            matched_terms: vec![],
            matched_entities: vec![],
            category_count: 1,
            priority_rank: 3,
            min_confidence: 0.4,
            comparative: false,
            visualization: "choropleth".to_string(),
            required_fields: fields.iter().map(|f| f.to_string()).collect(),
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_full_coverage() {
        let mut inventory = StaticFieldInventory::new();
        inventory.insert("income_distribution", &["median_income", "households"]);

        let enhancer = ContextEnhancer::new(EngineConfig::default());
        let result = enhancer.enhance(
            &candidate(&["median_income", "households"]),
            &inventory,
            &Query::new("income map"),
        );

        assert_eq!(result.coverage_score, 1.0);
    }

    #[test]
    fn test_partial_coverage() {
        let mut inventory = StaticFieldInventory::new();
        inventory.insert("income_distribution", &["median_income"]);

        let enhancer = ContextEnhancer::new(EngineConfig::default());
        let result = enhancer.enhance(
            &candidate(&["median_income", "households"]),
            &inventory,
            &Query::new("income map"),
        );

        assert_eq!(result.coverage_score, 0.5);
        assert!(result.fields.iter().any(|f| f.field == "households" && !f.present));
    }

    #[test]
    fn test_no_required_fields_is_full_coverage() {
        let inventory = StaticFieldInventory::new();
        let enhancer = ContextEnhancer::new(EngineConfig::default());
        let result = enhancer.enhance(&candidate(&[]), &inventory, &Query::new("income map"));

        assert_eq!(result.coverage_score, 1.0);
        assert_eq!(result.contextual_boost, 0.0);
    }

    #[test]
    fn test_field_mention_in_query() {
        let mut inventory = StaticFieldInventory::new();
        inventory.insert("income_distribution", &["median_income"]);

        let enhancer = ContextEnhancer::new(EngineConfig::default());
        let result = enhancer.enhance(
            &candidate(&["median_income"]),
            &inventory,
            &Query::new("show median income by tract"),
        );

        assert!(result.fields[0].mentioned);
        assert!(result.contextual_boost > 0.0);
    }

    #[test]
    fn test_field_hint_counts_as_mention() {
        let mut inventory = StaticFieldInventory::new();
        inventory.insert("income_distribution", &["median_income"]);

        let enhancer = ContextEnhancer::new(EngineConfig::default());
        let result = enhancer.enhance(
            &candidate(&["median_income"]),
            &inventory,
            &Query::new("wealth map").with_field_hint("median_income"),
        );

        assert!(result.fields[0].mentioned);
    }

    #[test]
    fn test_boost_capped() {
        let mut inventory = StaticFieldInventory::new();
        inventory.insert("income_distribution", &["a_b", "c_d", "e_f", "g_h", "i_j"]);

        let config = EngineConfig::default();
        let cap = config.field_mention_cap;
        let enhancer = ContextEnhancer::new(config);
        let result = enhancer.enhance(
            &candidate(&["a_b", "c_d", "e_f", "g_h", "i_j"]),
            &inventory,
            &Query::new("a b c d e f g h i j"),
        );

        assert!(result.contextual_boost <= cap + f32::EPSILON);
    }
}
