//! Domain configuration for the query routing engine
//!
//! Supports loading configuration from:
//! - YAML/JSON files (extension-sniffed)
//! - Built-in defaults for the geospatial analytics domain
//!
//! Configuration is immutable once loaded. Reload builds a brand-new
//! instance and publishes it through `RouterConfigManager` with an atomic
//! reference swap, so in-flight queries always observe one consistent
//! snapshot.

pub mod endpoint;
pub mod entity;
pub mod domain;
pub mod manager;
pub mod settings;
pub mod vocabulary;

pub use endpoint::{BoostTerm, EndpointDescriptor, TermCategory};
pub use entity::{BrandEntry, EntityConfig, PlaceEntry};
pub use domain::DomainConfig;
pub use manager::RouterConfigManager;
pub use settings::{load_settings, RoutingSettings, ServerConfig, Settings};
pub use vocabulary::VocabularyConfig;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
