//! Routing result model
//!
//! `RoutingResult` is the single output of the engine, produced once per
//! query and never mutated after construction. Endpoints are referenced by
//! id value, never by pointer, so results remain valid across
//! configuration reloads.

use serde::{Deserialize, Serialize};

/// Scope classification from the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    InScope,
    OutOfScope,
}

/// First-pass admissibility result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// In-domain / out-of-domain classification
    pub scope: Scope,
    /// Confidence in the classification, clamped to [0, 1]
    pub confidence: f32,
    /// Which heuristic or threshold fired
    pub reasons: Vec<String>,
}

impl ValidationResult {
    /// Hard rejection with full confidence
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            scope: Scope::OutOfScope,
            confidence: 1.0,
            reasons: vec![reason.into()],
        }
    }

    pub fn is_in_scope(&self) -> bool {
        self.scope == Scope::InScope
    }
}

/// Reason a later layer was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarlyExit {
    /// Scope validator rejected the query
    ValidationRejected,
    /// No endpoint produced a non-zero intent score
    NoCandidates,
}

/// How the result should be presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Query routed to an endpoint
    Routed,
    /// Near-miss; ask the user to clarify
    Clarify,
    /// No plausible endpoint
    Rejected,
}

/// User-facing response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    /// Human-readable message, never a raw internal error
    pub message: String,
    /// Suggested alternative phrasings or analyses
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// A runner-up endpoint with its score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    /// Endpoint id, by value
    pub endpoint: String,
    pub score: f32,
}

/// The single output of the routing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingResult {
    /// Winning endpoint id; `None` means no route
    pub endpoint: Option<String>,
    /// Final aggregated confidence in [0, 1]
    pub confidence: f32,
    /// Whether confidence met the endpoint's own threshold
    pub success: bool,
    /// Scope validation outcome
    pub validation: ValidationResult,
    /// Layer names that actually ran, in execution order
    pub layers_executed: Vec<String>,
    /// Why later layers were skipped, if they were
    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_exit: Option<EarlyExit>,
    /// Human-readable trace, one or more entries per layer
    pub reasoning: Vec<String>,
    /// Ranked candidates below the winning score
    pub alternatives: Vec<Alternative>,
    /// What to show the user
    pub user_response: UserResponse,
    /// Visualization kind of the winning endpoint, for the map UI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<String>,
}

impl RoutingResult {
    /// Terminal rejection from the scope validator
    ///
    /// Later layers never ran; only validation appears in the trace.
    pub fn validation_rejected(validation: ValidationResult, message: impl Into<String>) -> Self {
        let reasoning = validation
            .reasons
            .iter()
            .map(|r| format!("validation: {r}"))
            .collect();

        Self {
            endpoint: None,
            confidence: 0.0,
            success: false,
            validation,
            layers_executed: vec!["scope_validation".to_string()],
            early_exit: Some(EarlyExit::ValidationRejected),
            reasoning,
            alternatives: Vec::new(),
            user_response: UserResponse {
                kind: ResponseKind::Rejected,
                message: message.into(),
                suggestions: Vec::new(),
            },
            visualization: None,
        }
    }
}
