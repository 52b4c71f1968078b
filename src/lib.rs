//! Empire Rules Library
//!
//! This library provides the constraint engine that decides whether an
//! empire selection is legal and whether a partial selection can still be
//! finished legally.

pub mod catalog;
pub mod clause;
pub mod cli;
pub mod config_file;
pub mod engine;
pub mod error;
pub mod logic;
pub mod selection;
pub mod types;

// Re-export main types for convenience
pub use catalog::{Catalog, CatalogOption, OptionCatalog};
pub use clause::{Conjunctive, Disjunctive, Requirements};
pub use config_file::{EngineConfig, RuleLimits, SearchLimits};
pub use engine::validator::{SelectionReport, SelectionValidator};
pub use error::EngineError;
pub use logic::rules::Violation;
pub use selection::Selection;
pub use types::{Category, RequirementPolicy};

// Engine operations
pub use logic::availability::{allowed_options, available_options, unavailable_options};
pub use logic::completion::{find_completions, is_completable, unmet_requirements};
pub use logic::resolver::{resolve, resolve_option};
pub use logic::rules::{first_violation, is_legal};
