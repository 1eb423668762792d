//! Shared application state

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use georoute_config::{DomainConfig, RouterConfigManager, Settings};
use georoute_core::StaticFieldInventory;
use georoute_engine::{EngineConfig, HttpSimilarityProvider, QueryRouter};

use crate::ServerError;

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<QueryRouter>,
    pub manager: Arc<RouterConfigManager>,
    pub settings: Settings,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the engine from settings
    ///
    /// A broken domain configuration aborts here; the server refuses to
    /// start rather than serve a partially valid routing table.
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let manager = match &settings.routing.domain_config {
            Some(path) => RouterConfigManager::from_file(path)
                .map_err(|e| ServerError::Config(e.to_string()))?,
            None => {
                tracing::info!("no domain config path set, using built-in defaults");
                RouterConfigManager::new()
            }
        };
        let manager = Arc::new(manager);

        let inventory = load_inventory(
            settings.routing.inventory.as_deref(),
            &manager.snapshot(),
        )?;
        tracing::info!(
            endpoints = inventory.endpoint_count(),
            "field inventory loaded"
        );

        let engine_config = EngineConfig {
            semantic_timeout_ms: settings.routing.semantic_timeout_ms,
            ..EngineConfig::default()
        };

        let mut router = QueryRouter::with_config(
            manager.clone(),
            Arc::new(inventory),
            engine_config,
        );
        if let Some(url) = &settings.routing.semantic_url {
            let provider =
                HttpSimilarityProvider::new(url, settings.routing.semantic_timeout_ms)
                    .map_err(|e| ServerError::Config(e.to_string()))?;
            router = router.with_semantic(Arc::new(provider));
            tracing::info!(url = %url, "semantic similarity backend configured");
        }

        Ok(Self {
            router: Arc::new(router),
            manager,
            settings,
            started_at: Utc::now(),
        })
    }
}

/// Build the field inventory from a JSON document, or assume every
/// configured field is present when no document is given.
fn load_inventory(
    path: Option<&str>,
    domain: &DomainConfig,
) -> Result<StaticFieldInventory, ServerError> {
    let mut inventory = StaticFieldInventory::new();

    match path {
        Some(path) => {
            let content = std::fs::read_to_string(Path::new(path))
                .map_err(|e| ServerError::Config(format!("inventory {path}: {e}")))?;
            let fields: HashMap<String, Vec<String>> = serde_json::from_str(&content)
                .map_err(|e| ServerError::Config(format!("inventory {path}: {e}")))?;
            for (endpoint_id, names) in fields {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                inventory.insert(endpoint_id, &names);
            }
        }
        None => {
            for endpoint in &domain.endpoints {
                let names: Vec<&str> = endpoint
                    .required_fields
                    .iter()
                    .map(String::as_str)
                    .collect();
                inventory.insert(endpoint.id.clone(), &names);
            }
        }
    }

    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_build_state() {
        let state = AppState::from_settings(Settings::default()).unwrap();
        assert!(state.router.domain_snapshot().endpoints.len() >= 20);
    }

    #[test]
    fn test_missing_domain_config_aborts() {
        let mut settings = Settings::default();
        settings.routing.domain_config = Some("/nonexistent/domain.yaml".to_string());

        assert!(matches!(
            AppState::from_settings(settings),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn test_inventory_defaults_to_configured_fields() {
        let domain = DomainConfig::default();
        let inventory = load_inventory(None, &domain).unwrap();

        use georoute_core::FieldInventory;
        assert!(inventory.has_field("market_share", "brand_sales"));
    }
}
