//! Core types for the query routing engine
//!
//! This crate provides foundational types used across all other crates:
//! - The `Query` input and `RoutingResult` output model
//! - Scope validation and user-response types
//! - Entity match types (brands, places)
//! - Trait seams for pluggable collaborators (field inventory,
//!   semantic similarity)
//! - Error types

pub mod entity;
pub mod error;
pub mod query;
pub mod routing;
pub mod traits;

pub use entity::{EntityKind, EntityMatch};
pub use error::{Error, Result};
pub use query::Query;
pub use routing::{
    Alternative, EarlyExit, ResponseKind, RoutingResult, Scope, UserResponse, ValidationResult,
};
pub use traits::{FieldInventory, SimilarityProvider, StaticFieldInventory};
