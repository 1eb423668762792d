//! Query router facade
//!
//! The sole entry point for the chat/UI layer. Stateless per request:
//! every query snapshots the configuration once and threads locally-owned
//! values through the layers, so any number of queries classify
//! concurrently against the same snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use georoute_config::{DomainConfig, RouterConfigManager};
use georoute_core::{FieldInventory, Query, RoutingResult, SimilarityProvider};

use crate::adaptation::DomainAdapter;
use crate::aggregator::ConfidenceAggregator;
use crate::context::{ContextEnhancement, ContextEnhancer};
use crate::intent::IntentClassifier;
use crate::scope::ScopeValidator;
use crate::semantic::{SemanticEnhancer, SemanticOutcome};
use crate::settings::EngineConfig;

/// Running counters for monitoring
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouterStats {
    pub total_queries: usize,
    pub routed: usize,
    pub clarified: usize,
    pub rejected: usize,
    pub out_of_scope: usize,
    /// Semantic backend configured but unavailable for a query
    pub semantic_fallbacks: usize,
}

/// The hybrid routing engine
pub struct QueryRouter {
    manager: Arc<RouterConfigManager>,
    inventory: Arc<dyn FieldInventory>,
    validator: ScopeValidator,
    adapter: DomainAdapter,
    classifier: IntentClassifier,
    context: ContextEnhancer,
    semantic: SemanticEnhancer,
    aggregator: ConfidenceAggregator,
    config: EngineConfig,
    stats: Mutex<RouterStats>,
}

impl QueryRouter {
    /// Router with default tunables and no semantic backend
    pub fn new(manager: Arc<RouterConfigManager>, inventory: Arc<dyn FieldInventory>) -> Self {
        Self::with_config(manager, inventory, EngineConfig::default())
    }

    /// Router with explicit tunables
    pub fn with_config(
        manager: Arc<RouterConfigManager>,
        inventory: Arc<dyn FieldInventory>,
        config: EngineConfig,
    ) -> Self {
        Self {
            manager,
            inventory,
            validator: ScopeValidator::new(config.clone()),
            adapter: DomainAdapter::new(),
            classifier: IntentClassifier::new(config.clone()),
            context: ContextEnhancer::new(config.clone()),
            semantic: SemanticEnhancer::disabled(config.clone()),
            aggregator: ConfidenceAggregator::new(config.clone()),
            config,
            stats: Mutex::new(RouterStats::default()),
        }
    }

    /// Attach a semantic similarity backend
    pub fn with_semantic(mut self, provider: Arc<dyn SimilarityProvider>) -> Self {
        self.semantic = SemanticEnhancer::new(provider, self.config.clone());
        self
    }

    /// Route one query to at most one analysis endpoint
    ///
    /// Never fails: every outcome, including out-of-scope and
    /// no-confident-match, is data in the returned `RoutingResult`.
    pub async fn route(&self, query: &Query) -> RoutingResult {
        let domain = self.manager.snapshot();

        let validation = self.validator.validate(query, &domain);
        if !validation.is_in_scope() {
            let result = self.aggregator.reject_out_of_scope(validation);
            self.record(&result, None);
            tracing::info!(query = %query.text, "query rejected by scope validation");
            return result;
        }

        let enhancement = self.adapter.enhance(query, &domain);
        let candidates = self.classifier.classify(query, &enhancement, &domain);

        let contexts: HashMap<String, ContextEnhancement> = candidates
            .iter()
            .take(self.config.context_top_k)
            .map(|c| {
                (
                    c.endpoint_id.clone(),
                    self.context.enhance(c, self.inventory.as_ref(), query),
                )
            })
            .collect();

        let semantic = if candidates.is_empty() {
            SemanticOutcome::Unavailable {
                reason: "no candidates".to_string(),
            }
        } else {
            self.semantic.enhance(&query.text, &candidates).await
        };

        let result = self
            .aggregator
            .decide(validation, &candidates, &enhancement, &contexts, &semantic);

        self.record(&result, Some(&semantic));
        tracing::info!(
            endpoint = result.endpoint.as_deref().unwrap_or("-"),
            confidence = result.confidence,
            success = result.success,
            "query routed"
        );
        result
    }

    /// Current configuration snapshot, for introspection endpoints
    pub fn domain_snapshot(&self) -> Arc<DomainConfig> {
        self.manager.snapshot()
    }

    /// Counters since construction
    pub fn stats(&self) -> RouterStats {
        self.stats.lock().clone()
    }

    fn record(&self, result: &RoutingResult, semantic: Option<&SemanticOutcome>) {
        use georoute_core::ResponseKind;

        let mut stats = self.stats.lock();
        stats.total_queries += 1;
        match result.user_response.kind {
            ResponseKind::Routed => stats.routed += 1,
            ResponseKind::Clarify => stats.clarified += 1,
            ResponseKind::Rejected => stats.rejected += 1,
        }
        if !result.validation.is_in_scope() {
            stats.out_of_scope += 1;
        }
        if self.semantic.is_configured() {
            if let Some(SemanticOutcome::Unavailable { .. }) = semantic {
                stats.semantic_fallbacks += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use georoute_core::{EarlyExit, Error, Result, StaticFieldInventory};

    fn inventory() -> Arc<StaticFieldInventory> {
        let domain = DomainConfig::default();
        let mut inventory = StaticFieldInventory::new();
        for endpoint in &domain.endpoints {
            let fields: Vec<&str> = endpoint
                .required_fields
                .iter()
                .map(String::as_str)
                .collect();
            inventory.insert(endpoint.id.clone(), &fields);
        }
        Arc::new(inventory)
    }

    fn router() -> QueryRouter {
        QueryRouter::new(Arc::new(RouterConfigManager::new()), inventory())
    }

    #[tokio::test]
    async fn test_route_comparative_query() {
        let result = router()
            .route(&Query::new("compare nike and adidas market share"))
            .await;

        assert!(result.success);
        assert_eq!(result.endpoint.as_deref(), Some("competitor_comparison"));
        assert_eq!(result.visualization.as_deref(), Some("bar_popup"));
    }

    #[tokio::test]
    async fn test_gibberish_exits_after_validation() {
        let result = router().route(&Query::new("asdkj qweroi")).await;

        assert!(result.endpoint.is_none());
        assert!(!result.success);
        assert_eq!(result.early_exit, Some(EarlyExit::ValidationRejected));
        assert_eq!(result.validation.confidence, 1.0);
        assert_eq!(result.layers_executed.len(), 1);
    }

    #[tokio::test]
    async fn test_idempotent_routing() {
        let router = router();
        let query = Query::new("median income by neighborhood in Boston");

        let first = router.route(&query).await;
        let second = router.route(&query).await;

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_stats_accumulate() {
        let router = router();
        let _ = router.route(&Query::new("asdkj qweroi")).await;
        let _ = router
            .route(&Query::new("compare nike and adidas market share"))
            .await;

        let stats = router.stats();
        assert_eq!(stats.total_queries, 2);
        assert_eq!(stats.routed, 1);
        assert_eq!(stats.out_of_scope, 1);
    }

    struct DownProvider;

    #[async_trait]
    impl SimilarityProvider for DownProvider {
        async fn similarity(
            &self,
            _: &str,
            _: &[String],
        ) -> Result<std::collections::HashMap<String, f32>> {
            Err(Error::Similarity("service unreachable".to_string()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_semantic_outage_degrades_transparently() {
        let manager = Arc::new(RouterConfigManager::new());
        let keyword_only = QueryRouter::new(manager.clone(), inventory());
        let degraded =
            QueryRouter::new(manager, inventory()).with_semantic(Arc::new(DownProvider));

        let query = Query::new("compare nike and adidas market share");
        let a = keyword_only.route(&query).await;
        let b = degraded.route(&query).await;

        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
        assert_eq!(degraded.stats().semantic_fallbacks, 1);
    }

    #[tokio::test]
    async fn test_reload_does_not_disturb_routing() {
        let manager = Arc::new(RouterConfigManager::new());
        let router = QueryRouter::new(manager.clone(), inventory());

        let before = router.route(&Query::new("market share by county")).await;
        assert!(before.success);

        // Reload failure leaves the active snapshot in place
        assert!(manager.reload().is_err());
        let after = router.route(&Query::new("market share by county")).await;
        assert_eq!(before.endpoint, after.endpoint);
    }
}
