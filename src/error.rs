//! Error handling module for the rules engine
//!
//! Provides the fault taxonomy using thiserror. Only faults live here:
//! an illegal selection is an ordinary `false`, never an error.

use thiserror::Error;

use crate::types::Category;

/// Main error type for the rules engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// A candidate, selection, or requirement clause names an identifier
    /// the catalog does not know
    #[error("Unknown identifier: {identifier}")]
    UnknownIdentifier { identifier: String },

    /// A requirement chain leads back to an identifier already on the chain
    #[error("Cyclic requirement chain: {}", chain.join(" -> "))]
    MalformedClauseGraph { chain: Vec<String> },

    /// Two catalog entries share an identifier
    #[error("Duplicate identifier in catalog: {identifier}")]
    DuplicateIdentifier { identifier: String },

    /// A selection holds an identifier in a slot its category does not use
    #[error("{identifier} is a {category} option and cannot be placed in {slot}")]
    MisplacedIdentifier {
        identifier: String,
        slot: &'static str,
        category: Category,
    },

    /// A configured search cap was exceeded
    #[error("Search limit exceeded: {what} (limit {limit})")]
    SearchLimit { what: &'static str, limit: usize },

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (catalog and selection files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Create an unknown identifier error
    pub fn unknown(identifier: impl Into<String>) -> Self {
        Self::UnknownIdentifier {
            identifier: identifier.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors caused by bad catalog data rather than bad input files
    pub fn is_catalog_fault(&self) -> bool {
        matches!(
            self,
            Self::MalformedClauseGraph { .. } | Self::DuplicateIdentifier { .. }
        )
    }
}
