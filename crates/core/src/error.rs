//! Error types shared across the routing engine

use thiserror::Error;

/// Top-level error type
///
/// Per-query routing outcomes (out-of-scope, low confidence) are never
/// errors; they are carried as data inside `RoutingResult`. This enum
/// covers the conditions that genuinely abort an operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inventory error: {0}")]
    Inventory(String),

    #[error("Similarity backend error: {0}")]
    Similarity(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;
