//! Option catalog
//!
//! The catalog is the read-only data provider every engine component
//! consults. The engine only depends on the [`Catalog`] trait; the
//! [`OptionCatalog`] registry is the reference implementation used by the
//! CLI and the tests.
//!
//! # Catalog Format
//!
//! Catalogs are JSON files with the following structure:
//! ```json
//! {
//!   "options": [
//!     { "identifier": "ethic_militarist", "category": "ethic", "cost": 1,
//!       "prohibits": ["ethic_pacifist"] },
//!     { "identifier": "origin_doomsday", "category": "origin",
//!       "requires": [["ethic_militarist", "ethic_xenophobe"]],
//!       "content_packs": ["ancient_relics"] }
//!   ]
//! }
//! ```
//!
//! Loading fails fast on duplicate identifiers, requirement clauses that
//! name unknown identifiers, and cyclic requirement chains.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::clause::Requirements;
use crate::error::{EngineError, Result};
use crate::types::Category;

/// One selectable item in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogOption {
    /// Globally unique across all categories
    pub identifier: String,

    pub category: Category,

    /// Weighted cost; only read for budgeted categories
    #[serde(default)]
    pub cost: u32,

    /// Every clause must be satisfied by at least one of its members
    #[serde(default)]
    pub requires: Requirements,

    /// Identifiers (options or content packs) that must not co-occur with this option
    #[serde(default)]
    pub prohibits: BTreeSet<String>,

    /// Content packs that must all be active for this option to be offered
    #[serde(default)]
    pub content_packs: BTreeSet<String>,
}

impl CatalogOption {
    pub fn new(identifier: impl Into<String>, category: Category) -> Self {
        Self {
            identifier: identifier.into(),
            category,
            cost: 0,
            requires: Vec::new(),
            prohibits: BTreeSet::new(),
            content_packs: BTreeSet::new(),
        }
    }

    /// Set the weighted cost
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Add a requirement clause: at least one of `alternatives` must be chosen
    pub fn requires_one_of<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.push(alternatives.into_iter().collect());
        self
    }

    /// Declare an identifier that may not be chosen alongside this option
    pub fn prohibits(mut self, identifier: impl Into<String>) -> Self {
        self.prohibits.insert(identifier.into());
        self
    }

    /// Gate this option behind a content pack
    pub fn needs_content_pack(mut self, pack: impl Into<String>) -> Self {
        self.content_packs.insert(pack.into());
        self
    }

    /// Weighted cost, present only for categories that spend the budget
    pub fn weighted_cost(&self) -> Option<u32> {
        self.category.is_budgeted().then_some(self.cost)
    }

    pub fn has_requirements(&self) -> bool {
        !self.requires.is_empty()
    }
}

/// Read-only access to catalog options.
///
/// Implementations must be `Sync`: searches read the catalog from several
/// worker threads at once.
pub trait Catalog: Sync {
    /// Find an option by identifier
    fn get(&self, identifier: &str) -> Option<&CatalogOption>;

    /// All known options in a stable order
    fn options(&self) -> Vec<&CatalogOption>;

    /// Find an option by identifier, failing on unknown identifiers
    fn lookup(&self, identifier: &str) -> Result<&CatalogOption> {
        self.get(identifier)
            .ok_or_else(|| EngineError::unknown(identifier))
    }
}

/// On-disk catalog document
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    options: Vec<CatalogOption>,
}

/// In-memory registry of catalog options, ordered by identifier.
#[derive(Debug, Clone, Default)]
pub struct OptionCatalog {
    options: BTreeMap<String, CatalogOption>,
}

impl OptionCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from options and run the integrity check
    pub fn from_options(options: impl IntoIterator<Item = CatalogOption>) -> Result<Self> {
        let mut catalog = Self::new();
        for option in options {
            catalog.register(option)?;
        }
        catalog.check_integrity()?;
        Ok(catalog)
    }

    /// Register an option; identifiers are unique across all categories
    pub fn register(&mut self, option: CatalogOption) -> Result<()> {
        if self.options.contains_key(&option.identifier) {
            return Err(EngineError::DuplicateIdentifier {
                identifier: option.identifier,
            });
        }
        self.options.insert(option.identifier.clone(), option);
        Ok(())
    }

    /// Parse a catalog document and check its integrity
    pub fn from_json(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_options(document.options)
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!("Loaded {} catalog options from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Serialize the catalog back into its document form
    pub fn to_json(&self) -> Result<String> {
        let document = CatalogDocument {
            options: self.options.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Verify every requirement clause names a known option and that no
    /// requirement chain loops back on itself.
    ///
    /// Prohibited sets are not checked: they may legitimately name content
    /// packs rather than options.
    pub fn check_integrity(&self) -> Result<()> {
        for option in self.options.values() {
            for clause in &option.requires {
                if let Some(missing) = clause.iter().find(|id| !self.options.contains_key(*id)) {
                    return Err(EngineError::unknown(missing));
                }
            }
        }

        let mut finished = HashSet::new();
        for identifier in self.options.keys() {
            let mut chain = Vec::new();
            self.visit_requirements(identifier, &mut chain, &mut finished)?;
        }
        debug!("Catalog integrity check passed for {} options", self.len());
        Ok(())
    }

    /// Depth-first walk along requirement edges; `chain` is the current path.
    fn visit_requirements<'a>(
        &'a self,
        identifier: &'a str,
        chain: &mut Vec<&'a str>,
        finished: &mut HashSet<&'a str>,
    ) -> Result<()> {
        if finished.contains(identifier) {
            return Ok(());
        }
        if let Some(start) = chain.iter().position(|id| *id == identifier) {
            let mut cycle: Vec<String> = chain[start..].iter().map(|id| id.to_string()).collect();
            cycle.push(identifier.to_string());
            return Err(EngineError::MalformedClauseGraph { chain: cycle });
        }

        let option = self.lookup(identifier)?;
        chain.push(identifier);
        for clause in &option.requires {
            for member in clause.iter() {
                self.visit_requirements(member, chain, finished)?;
            }
        }
        chain.pop();
        finished.insert(identifier);
        Ok(())
    }
}

impl Catalog for OptionCatalog {
    fn get(&self, identifier: &str) -> Option<&CatalogOption> {
        self.options.get(identifier)
    }

    fn options(&self) -> Vec<&CatalogOption> {
        self.options.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "options": [
            { "identifier": "ethic_militarist", "category": "ethic", "cost": 1,
              "prohibits": ["ethic_pacifist"] },
            { "identifier": "ethic_pacifist", "category": "ethic", "cost": 1 },
            { "identifier": "origin_doomsday", "category": "origin",
              "requires": [["ethic_militarist", "ethic_pacifist"]],
              "content_packs": ["ancient_relics"] },
            { "identifier": "trait_strong", "category": "trait" }
        ]
    }"#;

    #[test]
    fn test_from_json_parses_all_fields() {
        let catalog = OptionCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 4);

        let origin = catalog.lookup("origin_doomsday").unwrap();
        assert_eq!(origin.category, Category::Origin);
        assert_eq!(origin.requires.len(), 1);
        assert!(origin.content_packs.contains("ancient_relics"));

        let ethic = catalog.lookup("ethic_militarist").unwrap();
        assert_eq!(ethic.weighted_cost(), Some(1));
        assert!(ethic.prohibits.contains("ethic_pacifist"));
    }

    #[test]
    fn test_weighted_cost_only_for_budgeted() {
        let civic = CatalogOption::new("civic_x", Category::Civic).with_cost(5);
        assert_eq!(civic.weighted_cost(), None);
        let ethic = CatalogOption::new("ethic_x", Category::Ethic);
        assert_eq!(ethic.weighted_cost(), Some(0));
    }

    #[test]
    fn test_lookup_unknown_fails() {
        let catalog = OptionCatalog::from_json(SAMPLE).unwrap();
        let err = catalog.lookup("origin_missing").unwrap_err();
        assert!(matches!(err, EngineError::UnknownIdentifier { identifier } if identifier == "origin_missing"));
    }

    #[test]
    fn test_options_are_ordered() {
        let catalog = OptionCatalog::from_json(SAMPLE).unwrap();
        let ids: Vec<&str> = catalog.options().iter().map(|o| o.identifier.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let result = OptionCatalog::from_options([
            CatalogOption::new("shared", Category::Ethic),
            CatalogOption::new("shared", Category::Civic),
        ]);
        assert!(matches!(result, Err(EngineError::DuplicateIdentifier { .. })));
    }

    #[test]
    fn test_unknown_requirement_rejected() {
        let result = OptionCatalog::from_options([
            CatalogOption::new("origin_a", Category::Origin).requires_one_of(["ethic_ghost"]),
        ]);
        assert!(matches!(
            result,
            Err(EngineError::UnknownIdentifier { identifier }) if identifier == "ethic_ghost"
        ));
    }

    #[test]
    fn test_unknown_prohibition_allowed() {
        // Prohibited sets may hold content-pack identifiers
        let result = OptionCatalog::from_options([
            CatalogOption::new("civic_a", Category::Civic).prohibits("some_content_pack"),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_cycle_rejected_with_chain() {
        let result = OptionCatalog::from_options([
            CatalogOption::new("a", Category::Civic).requires_one_of(["b"]),
            CatalogOption::new("b", Category::Civic).requires_one_of(["c", "x"]),
            CatalogOption::new("c", Category::Civic).requires_one_of(["a"]),
            CatalogOption::new("x", Category::Ethic),
        ]);
        match result {
            Err(EngineError::MalformedClauseGraph { chain }) => {
                assert_eq!(chain, vec!["a", "b", "c", "a"]);
            }
            other => panic!("Expected MalformedClauseGraph, got {:?}", other),
        }
    }

    #[test]
    fn test_self_requirement_is_cycle() {
        let result = OptionCatalog::from_options([
            CatalogOption::new("a", Category::Origin).requires_one_of(["a"]),
        ]);
        assert!(matches!(result, Err(EngineError::MalformedClauseGraph { .. })));
    }

    #[test]
    fn test_shared_dependency_is_not_cycle() {
        let result = OptionCatalog::from_options([
            CatalogOption::new("a", Category::Origin).requires_one_of(["c"]),
            CatalogOption::new("b", Category::Authority).requires_one_of(["c"]),
            CatalogOption::new("c", Category::Ethic).with_cost(1),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let catalog = OptionCatalog::load_from_file(temp_file.path()).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = OptionCatalog::load_from_file("/nonexistent/catalog.json");
        assert!(matches!(result, Err(EngineError::Io(_))));
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let result = OptionCatalog::from_json(
            r#"{"options": [{"identifier": "a", "category": "ethic", "weight": 2}]}"#,
        );
        assert!(matches!(result, Err(EngineError::Json(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_options() {
        let catalog = OptionCatalog::from_json(SAMPLE).unwrap();
        let reloaded = OptionCatalog::from_json(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(catalog.options(), reloaded.options());
    }
}
