//! Domain configuration loader
//!
//! The root configuration document: endpoint descriptors, vocabulary, and
//! entity dictionaries. Loading always validates; a `DomainConfig` in hand
//! is fully valid, never partially so.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::endpoint::{BoostTerm, EndpointDescriptor, TermCategory};
use crate::entity::EntityConfig;
use crate::vocabulary::VocabularyConfig;
use crate::ConfigError;

/// Complete routing domain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Domain name
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Document version, for ops visibility on reload
    #[serde(default = "default_version")]
    pub version: String,
    /// Ordered endpoint descriptors
    pub endpoints: Vec<EndpointDescriptor>,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub entities: EntityConfig,
}

fn default_domain() -> String {
    "geo_analytics".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            version: default_version(),
            endpoints: default_endpoints(),
            vocabulary: VocabularyConfig::default(),
            entities: EntityConfig::default(),
        }
    }
}

impl DomainConfig {
    /// Load from a file, sniffing the format from the extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy();
        let config = if path_str.ends_with(".yaml") || path_str.ends_with(".yml") {
            Self::from_yaml_file(path)?
        } else {
            Self::from_json_file(path)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Fail-fast validation
    ///
    /// Every violation aborts the load; the engine refuses to start or
    /// reload on a bad document.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::MissingField("endpoints".to_string()));
        }

        let mut seen_ids = std::collections::HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.id.is_empty() {
                return Err(ConfigError::MissingField("endpoint.id".to_string()));
            }
            if !seen_ids.insert(endpoint.id.as_str()) {
                return Err(ConfigError::DuplicateKey(format!(
                    "endpoint '{}'",
                    endpoint.id
                )));
            }
            if endpoint.boost_terms.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("endpoint '{}'", endpoint.id),
                    message: "intent signature must not be empty".to_string(),
                });
            }
            if endpoint.min_confidence <= 0.0 || endpoint.min_confidence > 1.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("endpoint '{}' min_confidence", endpoint.id),
                    message: format!("must be in (0, 1], got {}", endpoint.min_confidence),
                });
            }
            for term in &endpoint.boost_terms {
                if term.weight <= 0.0 {
                    return Err(ConfigError::InvalidValue {
                        field: format!("endpoint '{}' term '{}'", endpoint.id, term.term),
                        message: format!("weight must be positive, got {}", term.weight),
                    });
                }
            }
        }

        let mut seen_canonical = std::collections::HashSet::new();
        for canonical in self.vocabulary.synonyms.keys() {
            if !seen_canonical.insert(canonical.to_lowercase()) {
                return Err(ConfigError::DuplicateKey(format!("synonym '{canonical}'")));
            }
        }

        let mut seen_brands = std::collections::HashSet::new();
        for brand in &self.entities.brands {
            if !seen_brands.insert(brand.id.to_lowercase()) {
                return Err(ConfigError::DuplicateKey(format!("brand '{}'", brand.id)));
            }
        }

        let mut seen_places = std::collections::HashSet::new();
        for place in &self.entities.places {
            if !seen_places.insert(place.name.to_lowercase()) {
                return Err(ConfigError::DuplicateKey(format!("place '{}'", place.name)));
            }
        }

        Ok(())
    }

    /// Look up an endpoint by id
    pub fn endpoint(&self, id: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.iter().find(|e| e.id == id)
    }
}

/// Built-in endpoint set for the geospatial analytics domain
fn default_endpoints() -> Vec<EndpointDescriptor> {
    use TermCategory::*;

    fn endpoint(
        id: &str,
        visualization: &str,
        min_confidence: f32,
        priority_rank: u32,
        comparative: bool,
        terms: &[(&str, f32, TermCategory)],
        fields: &[&str],
    ) -> EndpointDescriptor {
        EndpointDescriptor {
            id: id.to_string(),
            boost_terms: terms
                .iter()
                .map(|(t, w, c)| BoostTerm::new(*t, *w, *c))
                .collect(),
            min_confidence,
            priority_rank,
            required_fields: fields.iter().map(|f| f.to_string()).collect(),
            comparative,
            visualization: visualization.to_string(),
        }
    }

    vec![
        endpoint(
            "population_density",
            "heatmap",
            0.40,
            1,
            false,
            &[
                ("population density", 2.0, Demographic),
                ("density", 1.6, Demographic),
                ("population", 1.4, Demographic),
                ("crowded", 1.0, Demographic),
            ],
            &["population", "land_area"],
        ),
        endpoint(
            "demographic_profile",
            "choropleth",
            0.40,
            2,
            false,
            &[
                ("demographics", 2.0, Demographic),
                ("demographic", 1.8, Demographic),
                ("who lives", 1.6, Demographic),
                ("residents", 1.2, Demographic),
            ],
            &["population", "age_distribution", "household_size"],
        ),
        endpoint(
            "income_distribution",
            "choropleth",
            0.40,
            3,
            false,
            &[
                ("income", 2.0, Metric),
                ("median income", 2.2, Metric),
                ("wealth", 1.4, Metric),
                ("affluent", 1.4, Demographic),
            ],
            &["median_income", "households"],
        ),
        endpoint(
            "market_share",
            "choropleth",
            0.45,
            4,
            false,
            &[
                ("market share", 2.2, Market),
                ("share", 1.2, Market),
                ("penetration", 1.8, Market),
                ("dominance", 1.2, Market),
            ],
            &["brand_sales", "total_sales"],
        ),
        endpoint(
            "competitor_comparison",
            "bar_popup",
            0.45,
            5,
            true,
            &[
                ("compare", 2.0, Market),
                ("comparison", 2.0, Market),
                ("competitor", 1.8, Brand),
                ("competition", 1.5, Brand),
                ("market share", 1.4, Market),
            ],
            &["brand_sales", "competitor_sales"],
        ),
        endpoint(
            "site_selection",
            "point_ranking",
            0.35,
            6,
            false,
            &[
                ("best location", 2.2, Geographic),
                ("site selection", 2.2, Geographic),
                ("where should", 1.8, Geographic),
                ("open a store", 2.0, Market),
                ("new store", 1.6, Market),
            ],
            &["foot_traffic", "competition_index", "rent_index"],
        ),
        endpoint(
            "trade_area",
            "isochrone",
            0.35,
            7,
            false,
            &[
                ("trade area", 2.2, Geographic),
                ("catchment", 2.0, Geographic),
                ("drive time", 1.8, Geographic),
                ("reach", 1.2, Geographic),
            ],
            &["drive_time", "population"],
        ),
        endpoint(
            "foot_traffic",
            "heatmap",
            0.45,
            8,
            false,
            &[
                ("foot traffic", 2.2, Metric),
                ("footfall", 2.0, Metric),
                ("visits", 1.5, Metric),
                ("busiest", 1.4, Temporal),
            ],
            &["foot_traffic", "visit_counts"],
        ),
        endpoint(
            "brand_presence",
            "point_cluster",
            0.40,
            9,
            false,
            &[
                ("stores", 1.6, Brand),
                ("locations", 1.5, Geographic),
                ("presence", 1.6, Brand),
                ("where are", 1.4, Geographic),
            ],
            &["store_locations"],
        ),
        endpoint(
            "sales_performance",
            "choropleth",
            0.45,
            10,
            false,
            &[
                ("sales", 1.8, Market),
                ("performance", 1.5, Market),
                ("revenue", 1.7, Market),
                ("best selling", 1.6, Market),
            ],
            &["sales", "sales_target"],
        ),
        endpoint(
            "growth_trend",
            "timeline",
            0.45,
            11,
            false,
            &[
                ("trend", 1.8, Temporal),
                ("growth", 1.8, Temporal),
                ("over time", 1.8, Temporal),
                ("changing", 1.3, Temporal),
            ],
            &["sales_history"],
        ),
        endpoint(
            "seasonality",
            "timeline",
            0.45,
            12,
            false,
            &[
                ("seasonal", 2.0, Temporal),
                ("seasonality", 2.2, Temporal),
                ("monthly pattern", 1.8, Temporal),
                ("holiday", 1.4, Temporal),
            ],
            &["sales_history", "calendar_events"],
        ),
        endpoint(
            "customer_segments",
            "choropleth",
            0.45,
            13,
            false,
            &[
                ("segments", 2.0, Demographic),
                ("segment", 1.8, Demographic),
                ("lifestyle", 1.6, Demographic),
                ("customer types", 1.8, Demographic),
            ],
            &["segment_codes", "households"],
        ),
        endpoint(
            "purchasing_power",
            "choropleth",
            0.45,
            14,
            false,
            &[
                ("purchasing power", 2.2, Metric),
                ("spending", 1.8, Metric),
                ("disposable income", 2.0, Metric),
                ("buying power", 2.0, Metric),
            ],
            &["disposable_income", "retail_spend"],
        ),
        endpoint(
            "age_structure",
            "choropleth",
            0.40,
            15,
            false,
            &[
                ("age", 1.8, Demographic),
                ("young", 1.3, Demographic),
                ("elderly", 1.5, Demographic),
                ("age groups", 2.0, Demographic),
            ],
            &["age_distribution"],
        ),
        endpoint(
            "education_levels",
            "choropleth",
            0.40,
            16,
            false,
            &[
                ("education", 2.0, Demographic),
                ("degree", 1.5, Demographic),
                ("university", 1.4, Demographic),
                ("educated", 1.6, Demographic),
            ],
            &["education_attainment"],
        ),
        endpoint(
            "employment_stats",
            "choropleth",
            0.40,
            17,
            false,
            &[
                ("employment", 2.0, Metric),
                ("unemployment", 2.0, Metric),
                ("jobs", 1.6, Metric),
                ("workforce", 1.6, Demographic),
            ],
            &["employment_rate", "workforce"],
        ),
        endpoint(
            "housing_market",
            "choropleth",
            0.45,
            18,
            false,
            &[
                ("housing", 2.0, Metric),
                ("rent", 1.6, Metric),
                ("home values", 2.0, Metric),
                ("real estate", 1.8, Metric),
            ],
            &["home_values", "rent_index"],
        ),
        endpoint(
            "commute_patterns",
            "flow_lines",
            0.45,
            19,
            false,
            &[
                ("commute", 2.2, Geographic),
                ("commuting", 2.0, Geographic),
                ("transit", 1.5, Geographic),
                ("travel to work", 2.0, Geographic),
            ],
            &["commute_flows"],
        ),
        endpoint(
            "expansion_opportunity",
            "point_ranking",
            0.40,
            20,
            false,
            &[
                ("expansion", 2.0, Market),
                ("opportunity", 1.6, Market),
                ("untapped", 1.8, Market),
                ("white space", 2.0, Market),
            ],
            &["market_gap", "competition_index"],
        ),
        endpoint(
            "cannibalization_risk",
            "point_cluster",
            0.50,
            21,
            true,
            &[
                ("cannibalization", 2.4, Market),
                ("cannibalize", 2.2, Market),
                ("overlap", 1.5, Geographic),
                ("too close", 1.5, Geographic),
            ],
            &["store_locations", "trade_overlap"],
        ),
        endpoint(
            "benchmark_regions",
            "bar_popup",
            0.45,
            22,
            true,
            &[
                ("benchmark", 2.0, Market),
                ("ranking", 1.8, Market),
                ("rank", 1.5, Market),
                ("top regions", 1.8, Geographic),
            ],
            &["region_metrics"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = DomainConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.endpoints.len() >= 20);
    }

    #[test]
    fn test_duplicate_endpoint_id_rejected() {
        let mut config = DomainConfig::default();
        let first = config.endpoints[0].clone();
        config.endpoints.push(first);

        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_empty_signature_rejected() {
        let mut config = DomainConfig::default();
        config.endpoints[0].boost_terms.clear();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_min_confidence_bounds() {
        let mut config = DomainConfig::default();
        config.endpoints[0].min_confidence = 0.0;
        assert!(config.validate().is_err());

        config.endpoints[0].min_confidence = 1.2;
        assert!(config.validate().is_err());

        config.endpoints[0].min_confidence = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nonpositive_weight_rejected() {
        let mut config = DomainConfig::default();
        config.endpoints[0].boost_terms[0].weight = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = DomainConfig::default();

        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        let json = serde_json::to_string_pretty(&config).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = DomainConfig::load(file.path()).unwrap();
        assert_eq!(loaded.endpoints.len(), config.endpoints.len());
        assert_eq!(loaded.domain, "geo_analytics");
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = DomainConfig::default();

        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = DomainConfig::load(file.path()).unwrap();
        assert_eq!(loaded.endpoints.len(), config.endpoints.len());
    }

    #[test]
    fn test_missing_file() {
        let result = DomainConfig::load("/nonexistent/domain.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_endpoint_lookup() {
        let config = DomainConfig::default();
        assert!(config.endpoint("market_share").is_some());
        assert!(config.endpoint("nope").is_none());
    }
}
