//! Hybrid query routing engine
//!
//! Takes a free-text analytics question and decides, with calibrated
//! confidence, which downstream analysis endpoint should handle it — or
//! that none qualifies and the user should be asked to clarify.
//!
//! Layers run strictly forward, each appending to an immutable-per-query
//! reasoning trace:
//! - Scope validation (terminal on rejection)
//! - Domain adaptation (synonym rewrite, entity extraction)
//! - Intent classification (generic scoring loop over endpoint data)
//! - Context/field enhancement (live field coverage, top candidates only)
//! - Semantic enhancement (optional, degrades silently)
//! - Confidence aggregation (route / clarify / reject)

pub mod adaptation;
pub mod aggregator;
pub mod context;
pub mod intent;
pub mod router;
pub mod scope;
pub mod semantic;
pub mod settings;
pub mod text;

pub use adaptation::{DomainAdapter, DomainEnhancement};
pub use aggregator::ConfidenceAggregator;
pub use context::{ContextEnhancement, ContextEnhancer, FieldRequirement};
pub use intent::{Candidate, IntentClassifier};
pub use router::{QueryRouter, RouterStats};
pub use scope::ScopeValidator;
pub use semantic::{HttpSimilarityProvider, SemanticEnhancer, SemanticOutcome};
pub use settings::EngineConfig;

use thiserror::Error;

/// Engine construction errors
///
/// Per-query outcomes are never errors; they are data in `RoutingResult`.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Similarity provider error: {0}")]
    Provider(String),

    #[error("Invalid engine configuration: {0}")]
    Config(String),
}
