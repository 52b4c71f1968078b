//! Selection Validator
//!
//! The query surface a UI or CLI talks to. A validator borrows an immutable
//! catalog and owns an engine configuration; every query takes the
//! caller's selection snapshot by reference and never mutates it.
//!
//! # Example
//!
//! ```
//! use empire_rules::catalog::{CatalogOption, OptionCatalog};
//! use empire_rules::engine::validator::SelectionValidator;
//! use empire_rules::selection::Selection;
//! use empire_rules::types::Category;
//!
//! let catalog = OptionCatalog::from_options([
//!     CatalogOption::new("ethic_a", Category::Ethic).with_cost(1),
//!     CatalogOption::new("ethic_b", Category::Ethic).with_cost(2),
//!     CatalogOption::new("origin_o1", Category::Origin).requires_one_of(["ethic_a", "ethic_b"]),
//! ])
//! .unwrap();
//! let validator = SelectionValidator::new(&catalog);
//!
//! assert!(validator.validate(["ethic_a", "ethic_b"]).unwrap());
//!
//! let selection = Selection::from_options(&catalog, ["origin_o1"]).unwrap();
//! assert!(validator.is_completable(&selection).unwrap());
//! ```

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::{Catalog, CatalogOption};
use crate::clause::{Conjunctive, Disjunctive};
use crate::config_file::EngineConfig;
use crate::error::Result;
use crate::logic::{availability, completion, rules};
use crate::logic::rules::Violation;
use crate::selection::Selection;

/// Summary of a selection's state, for display surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    pub effective_options: Conjunctive,
    pub legal: bool,
    /// First rule the effective options break, if any
    pub violation: Option<String>,
    pub completable: bool,
    pub completions: usize,
    /// Requirement clauses of chosen options not yet met by the selection
    pub unmet_requirements: Vec<String>,
}

/// Validation queries bound to one catalog and configuration
#[derive(Debug, Clone)]
pub struct SelectionValidator<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
    config: EngineConfig,
}

impl<'c, C: Catalog + ?Sized> SelectionValidator<'c, C> {
    /// Create a validator with the standard rule set
    pub fn new(catalog: &'c C) -> Self {
        Self::with_config(catalog, EngineConfig::default())
    }

    pub fn with_config(catalog: &'c C, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &'c C {
        self.catalog
    }

    /// Check a complete candidate set of identifiers against the hard rules
    pub fn validate<I, S>(&self, identifiers: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidate: Conjunctive = identifiers.into_iter().collect();
        rules::is_legal(self.catalog, &candidate, &self.config.rules)
    }

    /// The first rule a candidate set breaks, if any
    pub fn explain(&self, candidate: &Conjunctive) -> Result<Option<Violation>> {
        rules::first_violation(self.catalog, candidate, &self.config.rules)
    }

    /// Legal as-is and at least one legal completion exists
    pub fn is_completable(&self, selection: &Selection) -> Result<bool> {
        completion::is_completable(self.catalog, selection, &self.config)
    }

    /// Every legal completion of the selection
    pub fn completions(&self, selection: &Selection) -> Result<BTreeSet<Conjunctive>> {
        completion::find_completions(self.catalog, selection, &self.config)
    }

    /// Requirement clauses the selection still has to satisfy
    pub fn unmet_requirements(&self, selection: &Selection) -> Result<Vec<Disjunctive>> {
        completion::unmet_requirements(self.catalog, selection)
    }

    /// Options the active content packs permit
    pub fn allowed_options(&self, selection: &Selection) -> Vec<&'c CatalogOption> {
        availability::allowed_options(self.catalog, &selection.content_packs)
    }

    /// Options that cannot be added without making the selection uncompletable
    pub fn unavailable_options(&self, selection: &Selection) -> Result<BTreeSet<String>> {
        availability::unavailable_options(self.catalog, selection, &self.config)
    }

    /// Options that can be added while keeping the selection completable
    pub fn available_options(&self, selection: &Selection) -> Result<BTreeSet<String>> {
        availability::available_options(self.catalog, selection, &self.config)
    }

    /// Legality, first violation, and completion count in one pass
    pub fn report(&self, selection: &Selection) -> Result<SelectionReport> {
        let effective_options = selection.effective_options();
        let unmet_requirements = self
            .unmet_requirements(selection)?
            .iter()
            .map(ToString::to_string)
            .collect();
        let violation = self.explain(&effective_options)?;
        let completions = match violation {
            Some(_) => 0,
            None => self.completions(selection)?.len(),
        };
        debug!(
            "Report for {}: violation={:?}, completions={}",
            effective_options, violation, completions
        );

        Ok(SelectionReport {
            legal: violation.is_none(),
            violation: violation.map(|v| v.to_string()),
            completable: completions > 0,
            completions,
            unmet_requirements,
            effective_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OptionCatalog;
    use crate::error::EngineError;
    use crate::types::Category;

    fn test_catalog() -> OptionCatalog {
        OptionCatalog::from_options([
            CatalogOption::new("A", Category::Ethic).with_cost(1),
            CatalogOption::new("B", Category::Ethic).with_cost(2),
            CatalogOption::new("C", Category::Ethic).with_cost(2).prohibits("B"),
            CatalogOption::new("O1", Category::Origin).requires_one_of(["A", "B"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_validate_identifiers() {
        let catalog = test_catalog();
        let validator = SelectionValidator::new(&catalog);
        assert!(validator.validate(["A", "B"]).unwrap());
        assert!(!validator.validate(["A", "B", "C"]).unwrap());
        assert!(matches!(
            validator.validate(["nope"]),
            Err(EngineError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn test_report_for_completable_selection() {
        let catalog = test_catalog();
        let validator = SelectionValidator::new(&catalog);
        let selection = Selection::from_options(&catalog, ["O1"]).unwrap();

        let report = validator.report(&selection).unwrap();
        assert!(report.legal);
        assert!(report.completable);
        assert_eq!(report.completions, 2);
        assert_eq!(report.violation, None);
        assert_eq!(report.unmet_requirements, vec!["(A | B)".to_string()]);

        let satisfied = Selection::from_options(&catalog, ["O1", "A"]).unwrap();
        assert!(validator.report(&satisfied).unwrap().unmet_requirements.is_empty());
    }

    #[test]
    fn test_report_for_illegal_selection() {
        let catalog = test_catalog();
        let validator = SelectionValidator::new(&catalog);
        let selection = Selection::from_options(&catalog, ["B", "C"]).unwrap();

        let report = validator.report(&selection).unwrap();
        assert!(!report.legal);
        assert!(!report.completable);
        assert_eq!(report.violation.as_deref(), Some("C cannot be combined with B"));
    }

    #[test]
    fn test_validator_works_through_dyn_catalog() {
        let catalog = test_catalog();
        let dynamic: &dyn Catalog = &catalog;
        let validator = SelectionValidator::new(dynamic);
        let selection = Selection::from_options(&catalog, ["A"]).unwrap();
        let unavailable = validator.unavailable_options(&selection).unwrap();
        assert!(unavailable.is_empty());
        assert!(validator.available_options(&selection).unwrap().contains("B"));
    }
}
