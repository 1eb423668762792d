//! Trait seams for pluggable collaborators

mod inventory;
mod similarity;

pub use inventory::{FieldInventory, StaticFieldInventory};
pub use similarity::SimilarityProvider;
