//! Completion Search
//!
//! Decides whether a partial selection can still be finished legally.
//!
//! 1. Every effective option with requirements is resolved on its own and
//!    each resolution is kept only if it is legal standing alone.
//! 2. One surviving resolution per option is unioned with the base
//!    selection, over every combination.
//! 3. Combined sets are re-checked; the legal ones are the completions.
//!
//! An option whose requirements have no legal resolution is handled by
//! [`RequirementPolicy`]: `Reject` leaves the selection with no
//! completions, `Ignore` drops that option from step 2.

use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogOption};
use crate::clause::{Conjunctive, Disjunctive};
use crate::config_file::EngineConfig;
use crate::error::{EngineError, Result};
use crate::logic::resolver::resolve_option;
use crate::logic::rules::is_legal;
use crate::selection::Selection;
use crate::types::RequirementPolicy;

// ============================================================================
// Completion Queries
// ============================================================================

/// Every legal completion of `selection`.
///
/// Without any requirements in play the only completion candidate is the
/// effective option set itself.
pub fn find_completions<C: Catalog + ?Sized>(
    catalog: &C,
    selection: &Selection,
    config: &EngineConfig,
) -> Result<BTreeSet<Conjunctive>> {
    let base = selection.effective_options();
    let options = base
        .iter()
        .map(|id| catalog.lookup(id))
        .collect::<Result<Vec<&CatalogOption>>>()?;

    let resolved = options
        .par_iter()
        .filter(|option| option.has_requirements())
        .map(|option| {
            legal_resolutions(catalog, option, config).map(|found| (option.identifier.as_str(), found))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut groups = Vec::with_capacity(resolved.len());
    for (identifier, candidates) in resolved {
        if candidates.is_empty() {
            match config.unsatisfiable_requirements {
                RequirementPolicy::Reject => {
                    debug!("{} has no legal way to meet its requirements", identifier);
                    return Ok(BTreeSet::new());
                }
                RequirementPolicy::Ignore => {
                    warn!(
                        "{} has no legal way to meet its requirements; ignoring them",
                        identifier
                    );
                    continue;
                }
            }
        }
        groups.push(candidates);
    }

    let combined = combine(catalog, base, &groups, config)?;
    let completions = combined
        .into_par_iter()
        .filter_map(|candidate| match is_legal(catalog, &candidate, &config.rules) {
            Ok(true) => Some(Ok(candidate)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<Result<BTreeSet<Conjunctive>>>()?;

    debug!(
        "Selection {} has {} completion(s)",
        selection.effective_options(),
        completions.len()
    );
    Ok(completions)
}

/// Legal as-is and has at least one legal completion
pub fn is_completable<C: Catalog + ?Sized>(
    catalog: &C,
    selection: &Selection,
    config: &EngineConfig,
) -> Result<bool> {
    if !is_legal(catalog, &selection.effective_options(), &config.rules)? {
        return Ok(false);
    }
    Ok(!find_completions(catalog, selection, config)?.is_empty())
}

/// Requirement clauses of the chosen options that the selection does not
/// satisfy yet. Duplicates are reported once, in catalog order.
pub fn unmet_requirements<C: Catalog + ?Sized>(
    catalog: &C,
    selection: &Selection,
) -> Result<Vec<Disjunctive>> {
    let base = selection.effective_options();
    let mut unmet: Vec<Disjunctive> = Vec::new();
    for identifier in base.iter() {
        for clause in &catalog.lookup(identifier)?.requires {
            if !base.satisfies(clause) && !unmet.contains(clause) {
                unmet.push(clause.clone());
            }
        }
    }
    Ok(unmet)
}

// ============================================================================
// Helpers
// ============================================================================

/// Resolutions of one option's requirements that are legal standing alone
fn legal_resolutions<C: Catalog + ?Sized>(
    catalog: &C,
    option: &CatalogOption,
    config: &EngineConfig,
) -> Result<BTreeSet<Conjunctive>> {
    let mut legal = BTreeSet::new();
    for candidate in resolve_option(catalog, option, &config.search)? {
        if is_legal(catalog, &candidate, &config.rules)? {
            legal.insert(candidate);
        }
    }
    Ok(legal)
}

/// Cartesian product of the groups, each combination unioned with `base`.
///
/// Every rule only gets stricter as a set grows, so a partial union that is
/// already illegal is dropped before it multiplies.
fn combine<C: Catalog + ?Sized>(
    catalog: &C,
    base: Conjunctive,
    groups: &[BTreeSet<Conjunctive>],
    config: &EngineConfig,
) -> Result<BTreeSet<Conjunctive>> {
    let mut combined = BTreeSet::from([base]);

    for group in groups {
        let mut next = BTreeSet::new();
        for partial in &combined {
            for candidate in group {
                let mut merged = partial.clone();
                merged.union_with(candidate);
                if is_legal(catalog, &merged, &config.rules)? {
                    next.insert(merged);
                }
            }
        }
        if next.len() > config.search.max_candidates {
            return Err(EngineError::SearchLimit {
                what: "completion combinations",
                limit: config.search.max_candidates,
            });
        }
        combined = next;
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OptionCatalog;
    use crate::types::Category;

    fn set(ids: &[&str]) -> Conjunctive {
        ids.iter().copied().collect()
    }

    fn test_catalog() -> OptionCatalog {
        OptionCatalog::from_options([
            CatalogOption::new("A", Category::Ethic).with_cost(1),
            CatalogOption::new("B", Category::Ethic).with_cost(2),
            CatalogOption::new("heavy", Category::Ethic).with_cost(3),
            CatalogOption::new("O1", Category::Origin).requires_one_of(["A", "B"]),
            CatalogOption::new("auth_needs_heavy", Category::Authority)
                .requires_one_of(["heavy"]),
            CatalogOption::new("civic_pair", Category::Civic).requires_one_of(["civic_x"]),
            CatalogOption::new("civic_x", Category::Civic),
            CatalogOption::new("civic_y", Category::Civic),
            CatalogOption::new("civic_z", Category::Civic),
            CatalogOption::new("origin_bad", Category::Origin)
                .requires_one_of(["civic_x"])
                .requires_one_of(["civic_y"])
                .requires_one_of(["civic_z"]),
        ])
        .unwrap()
    }

    fn selection(catalog: &OptionCatalog, ids: &[&str]) -> Selection {
        Selection::from_options(catalog, ids.iter().copied()).unwrap()
    }

    #[test]
    fn test_no_requirements_single_completion() {
        let catalog = test_catalog();
        let sel = selection(&catalog, &["A", "civic_x"]);
        let completions = find_completions(&catalog, &sel, &EngineConfig::default()).unwrap();
        assert_eq!(completions, BTreeSet::from([set(&["A", "civic_x"])]));
    }

    #[test]
    fn test_empty_selection_is_completable() {
        let catalog = test_catalog();
        let sel = Selection::new();
        assert!(is_completable(&catalog, &sel, &EngineConfig::default()).unwrap());
    }

    #[test]
    fn test_origin_requirement_completions() {
        let catalog = test_catalog();
        let sel = selection(&catalog, &["O1"]);
        let completions = find_completions(&catalog, &sel, &EngineConfig::default()).unwrap();
        assert_eq!(
            completions,
            BTreeSet::from([set(&["A", "O1"]), set(&["B", "O1"])])
        );
        assert!(is_completable(&catalog, &sel, &EngineConfig::default()).unwrap());
    }

    #[test]
    fn test_completion_respects_existing_budget() {
        let catalog = test_catalog();
        // B already spends 2; O1 + B is legal, O1 + A + B spends 3
        let sel = selection(&catalog, &["O1", "B"]);
        let completions = find_completions(&catalog, &sel, &EngineConfig::default()).unwrap();
        assert_eq!(
            completions,
            BTreeSet::from([set(&["A", "B", "O1"]), set(&["B", "O1"])])
        );
    }

    #[test]
    fn test_combination_fails_budget() {
        let catalog = test_catalog();
        // heavy (3) is the only way to satisfy the authority; B (2) is already chosen
        let sel = selection(&catalog, &["auth_needs_heavy", "B"]);
        assert!(find_completions(&catalog, &sel, &EngineConfig::default())
            .unwrap()
            .is_empty());
        assert!(!is_completable(&catalog, &sel, &EngineConfig::default()).unwrap());
    }

    #[test]
    fn test_combination_fails_civic_cap() {
        let catalog = test_catalog();
        let sel = selection(&catalog, &["civic_pair", "civic_y"]);
        // civic_pair + civic_y + civic_x is three civics
        assert!(!is_completable(&catalog, &sel, &EngineConfig::default()).unwrap());
    }

    #[test]
    fn test_unsatisfiable_requirement_rejected_by_default() {
        let catalog = test_catalog();
        // Any resolution holds three civics, illegal on its own
        let sel = selection(&catalog, &["origin_bad"]);
        let config = EngineConfig::default();
        assert!(find_completions(&catalog, &sel, &config).unwrap().is_empty());
        assert!(!is_completable(&catalog, &sel, &config).unwrap());
    }

    #[test]
    fn test_unsatisfiable_requirement_ignored_when_configured() {
        let catalog = test_catalog();
        let sel = selection(&catalog, &["origin_bad"]);
        let config = EngineConfig {
            unsatisfiable_requirements: RequirementPolicy::Ignore,
            ..EngineConfig::default()
        };
        let completions = find_completions(&catalog, &sel, &config).unwrap();
        assert_eq!(completions, BTreeSet::from([set(&["origin_bad"])]));
        assert!(is_completable(&catalog, &sel, &config).unwrap());
    }

    #[test]
    fn test_illegal_base_not_completable() {
        let catalog = test_catalog();
        let sel = selection(&catalog, &["A", "heavy"]);
        assert!(!is_completable(&catalog, &sel, &EngineConfig::default()).unwrap());
    }

    #[test]
    fn test_unknown_selection_identifier_fails() {
        let catalog = test_catalog();
        let mut sel = Selection::new();
        sel.civics.insert("civic_ghost".to_string());
        let result = find_completions(&catalog, &sel, &EngineConfig::default());
        assert!(matches!(result, Err(EngineError::UnknownIdentifier { .. })));
    }

    #[test]
    fn test_unmet_requirements_listed_until_satisfied() {
        let catalog = test_catalog();
        let sel = selection(&catalog, &["O1"]);
        assert_eq!(
            unmet_requirements(&catalog, &sel).unwrap(),
            vec![["A", "B"].into_iter().collect::<Disjunctive>()]
        );

        let sel = selection(&catalog, &["O1", "B"]);
        assert!(unmet_requirements(&catalog, &sel).unwrap().is_empty());

        let sel = selection(&catalog, &["origin_bad", "civic_y"]);
        let unmet = unmet_requirements(&catalog, &sel).unwrap();
        assert_eq!(unmet.len(), 2);
        assert!(unmet.iter().all(|clause| !clause.contains("civic_y")));
    }

    #[test]
    fn test_combination_limit() {
        let catalog = test_catalog();
        let sel = selection(&catalog, &["O1"]);
        let mut config = EngineConfig::default();
        config.search.max_candidates = 1;
        let result = find_completions(&catalog, &sel, &config);
        assert!(matches!(result, Err(EngineError::SearchLimit { .. })));
    }
}
