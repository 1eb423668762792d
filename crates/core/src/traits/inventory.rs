//! Field inventory collaborator
//!
//! The data layer owns the inventory of fields actually loaded for each
//! analysis endpoint. The routing engine only reads it: coverage scoring
//! cross-references an endpoint's required fields against what is present.

use std::collections::{HashMap, HashSet};

/// Read-only lookup of live data-field availability
///
/// Implementations must be cheap to call; this runs on the hot routing
/// path for the top-ranked candidates.
pub trait FieldInventory: Send + Sync {
    /// Is `field` present (and non-empty) for `endpoint_id`?
    fn has_field(&self, endpoint_id: &str, field: &str) -> bool;

    /// Batch form of `has_field`, one answer per requested field
    fn available(&self, endpoint_id: &str, fields: &[String]) -> Vec<bool> {
        fields
            .iter()
            .map(|f| self.has_field(endpoint_id, f))
            .collect()
    }
}

/// In-memory inventory backed by a per-endpoint field set
///
/// Used by the server (populated from the data layer's inventory document)
/// and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFieldInventory {
    fields: HashMap<String, HashSet<String>>,
}

impl StaticFieldInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the available fields for an endpoint
    pub fn insert(&mut self, endpoint_id: impl Into<String>, fields: &[&str]) {
        self.fields.insert(
            endpoint_id.into(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
    }

    pub fn endpoint_count(&self) -> usize {
        self.fields.len()
    }
}

impl FieldInventory for StaticFieldInventory {
    fn has_field(&self, endpoint_id: &str, field: &str) -> bool {
        self.fields
            .get(endpoint_id)
            .map(|set| set.contains(field))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_inventory() {
        let mut inventory = StaticFieldInventory::new();
        inventory.insert("market_share", &["brand_sales", "total_sales"]);

        assert!(inventory.has_field("market_share", "brand_sales"));
        assert!(!inventory.has_field("market_share", "foot_traffic"));
        assert!(!inventory.has_field("unknown_endpoint", "brand_sales"));
    }

    #[test]
    fn test_batch_lookup() {
        let mut inventory = StaticFieldInventory::new();
        inventory.insert("trade_area", &["drive_time", "population"]);

        let answers = inventory.available(
            "trade_area",
            &[
                "drive_time".to_string(),
                "population".to_string(),
                "income".to_string(),
            ],
        );
        assert_eq!(answers, vec![true, true, false]);
    }
}
