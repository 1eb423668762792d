//! Entity dictionaries
//!
//! Named brands and geographic places the engine recognizes in query
//! text. Recognition is case-insensitive and whole-token; aliases resolve
//! to the canonical id before any scoring happens.

use serde::{Deserialize, Serialize};

/// A named brand or competitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandEntry {
    /// Canonical brand id
    pub id: String,
    /// Display name
    pub name: String,
    /// Alternate spellings, lowercase
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// A geographic place resolvable to an administrative code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceEntry {
    /// Place name, lowercase
    pub name: String,
    /// Administrative code handed to the data layer
    pub admin_code: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Brand and place dictionaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(default)]
    pub brands: Vec<BrandEntry>,
    #[serde(default)]
    pub places: Vec<PlaceEntry>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        let brands: Vec<(&str, &str, Vec<&str>)> = vec![
            ("nike", "Nike", vec!["nike inc"]),
            ("adidas", "Adidas", vec![]),
            ("starbucks", "Starbucks", vec!["sbux"]),
            ("dunkin", "Dunkin'", vec!["dunkin donuts", "dunkin'"]),
            ("mcdonalds", "McDonald's", vec!["mcdonald's", "mcd"]),
            ("burger_king", "Burger King", vec!["burger king", "bk"]),
            ("walmart", "Walmart", vec!["wal-mart"]),
            ("target", "Target", vec![]),
            ("costco", "Costco", vec!["costco wholesale"]),
            ("whole_foods", "Whole Foods", vec!["whole foods", "whole foods market"]),
        ];

        let places: Vec<(&str, &str, Vec<&str>)> = vec![
            ("new york", "US-NY-NYC", vec!["nyc", "new york city"]),
            ("los angeles", "US-CA-LA", vec!["la"]),
            ("chicago", "US-IL-CHI", vec![]),
            ("houston", "US-TX-HOU", vec![]),
            ("phoenix", "US-AZ-PHX", vec![]),
            ("philadelphia", "US-PA-PHL", vec!["philly"]),
            ("san antonio", "US-TX-SAT", vec![]),
            ("san diego", "US-CA-SAN", vec![]),
            ("dallas", "US-TX-DAL", vec![]),
            ("seattle", "US-WA-SEA", vec![]),
            ("denver", "US-CO-DEN", vec![]),
            ("boston", "US-MA-BOS", vec![]),
            ("atlanta", "US-GA-ATL", vec![]),
            ("miami", "US-FL-MIA", vec![]),
        ];

        Self {
            brands: brands
                .into_iter()
                .map(|(id, name, aliases)| BrandEntry {
                    id: id.to_string(),
                    name: name.to_string(),
                    aliases: aliases.into_iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
            places: places
                .into_iter()
                .map(|(name, code, aliases)| PlaceEntry {
                    name: name.to_string(),
                    admin_code: code.to_string(),
                    aliases: aliases.into_iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl EntityConfig {
    /// All (surface form, canonical id) pairs for brand recognition
    ///
    /// The brand's lowercase display name, id, and every alias all resolve
    /// to the canonical id.
    pub fn brand_surfaces(&self) -> Vec<(String, String)> {
        let mut surfaces = Vec::new();
        for brand in &self.brands {
            surfaces.push((brand.name.to_lowercase(), brand.id.clone()));
            surfaces.push((brand.id.to_lowercase(), brand.id.clone()));
            for alias in &brand.aliases {
                surfaces.push((alias.to_lowercase(), brand.id.clone()));
            }
        }
        surfaces
    }

    /// All (surface form, administrative code) pairs for place recognition
    pub fn place_surfaces(&self) -> Vec<(String, String)> {
        let mut surfaces = Vec::new();
        for place in &self.places {
            surfaces.push((place.name.to_lowercase(), place.admin_code.clone()));
            for alias in &place.aliases {
                surfaces.push((alias.to_lowercase(), place.admin_code.clone()));
            }
        }
        surfaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_surfaces_include_aliases() {
        let entities = EntityConfig::default();
        let surfaces = entities.brand_surfaces();

        let dunkin: Vec<_> = surfaces.iter().filter(|(_, id)| id == "dunkin").collect();
        assert!(dunkin.iter().any(|(s, _)| s == "dunkin donuts"));
        assert!(dunkin.iter().any(|(s, _)| s == "dunkin'"));
    }

    #[test]
    fn test_place_surfaces_resolve_to_admin_codes() {
        let entities = EntityConfig::default();
        let surfaces = entities.place_surfaces();

        assert!(surfaces
            .iter()
            .any(|(s, code)| s == "nyc" && code == "US-NY-NYC"));
    }
}
