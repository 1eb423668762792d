//! Recognized entity types
//!
//! Entities are surfaced by domain adaptation and consumed downstream for
//! intent scoring and trace construction.

use serde::{Deserialize, Serialize};

/// Kind of recognized entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Named brand or competitor
    Brand,
    /// Geographic place, resolved to an administrative code
    Place,
}

/// A recognized entity occurrence in the query text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMatch {
    /// Text as it appeared in the query
    pub surface: String,
    /// Canonical id (brand id or administrative code)
    pub canonical: String,
    pub kind: EntityKind,
    /// Byte span in the raw query text
    pub span: (usize, usize),
}

impl EntityMatch {
    pub fn is_brand(&self) -> bool {
        self.kind == EntityKind::Brand
    }

    pub fn is_place(&self) -> bool {
        self.kind == EntityKind::Place
    }
}
