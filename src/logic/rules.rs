//! Rule Checker
//!
//! Pure predicate over a complete candidate set. Rules are applied in a
//! fixed order and the first failure wins:
//!
//! | # | Rule |
//! |---|------|
//! | 1 | No member's prohibited set intersects the candidate |
//! | 2 | At most `max_authorities` Authority options |
//! | 3 | At most `max_origins` Origin options |
//! | 4 | At most `max_civics` Civic options |
//! | 5 | Summed ethic cost within `ethic_budget` (inclusive) |
//!
//! Prohibitions are read only from each member's own list. A one-sided
//! declaration is enough to exclude the pair, and catalogs that want
//! symmetric exclusion need not mirror it.

use std::fmt;

use crate::catalog::{Catalog, CatalogOption};
use crate::clause::Conjunctive;
use crate::config_file::RuleLimits;
use crate::error::Result;
use crate::types::Category;

// ============================================================================
// Diagnostics
// ============================================================================

/// The first hard rule a candidate set breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Prohibited { option: String, prohibited: String },
    TooManyAuthorities { count: usize, max: usize },
    TooManyOrigins { count: usize, max: usize },
    TooManyCivics { count: usize, max: usize },
    BudgetExceeded { spent: u64, budget: u32 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prohibited { option, prohibited } => {
                write!(f, "{} cannot be combined with {}", option, prohibited)
            }
            Self::TooManyAuthorities { count, max } => {
                write!(f, "{} authorities selected (at most {})", count, max)
            }
            Self::TooManyOrigins { count, max } => {
                write!(f, "{} origins selected (at most {})", count, max)
            }
            Self::TooManyCivics { count, max } => {
                write!(f, "{} civics selected (at most {})", count, max)
            }
            Self::BudgetExceeded { spent, budget } => {
                write!(f, "ethic cost {} exceeds the budget of {}", spent, budget)
            }
        }
    }
}

// ============================================================================
// Rule Checking
// ============================================================================

/// Find the first rule `candidate` breaks, or `None` if it is legal.
///
/// Fails with `UnknownIdentifier` if any member is missing from the catalog.
pub fn first_violation<C: Catalog + ?Sized>(
    catalog: &C,
    candidate: &Conjunctive,
    limits: &RuleLimits,
) -> Result<Option<Violation>> {
    let options = candidate
        .iter()
        .map(|id| catalog.lookup(id))
        .collect::<Result<Vec<&CatalogOption>>>()?;

    for option in &options {
        if let Some(prohibited) = option.prohibits.iter().find(|p| candidate.contains(p)) {
            return Ok(Some(Violation::Prohibited {
                option: option.identifier.clone(),
                prohibited: prohibited.clone(),
            }));
        }
    }

    let count = |category: Category| options.iter().filter(|o| o.category == category).count();

    let authorities = count(Category::Authority);
    if authorities > limits.max_authorities {
        return Ok(Some(Violation::TooManyAuthorities {
            count: authorities,
            max: limits.max_authorities,
        }));
    }

    let origins = count(Category::Origin);
    if origins > limits.max_origins {
        return Ok(Some(Violation::TooManyOrigins {
            count: origins,
            max: limits.max_origins,
        }));
    }

    let civics = count(Category::Civic);
    if civics > limits.max_civics {
        return Ok(Some(Violation::TooManyCivics {
            count: civics,
            max: limits.max_civics,
        }));
    }

    // Widened so large catalog costs cannot wrap
    let spent: u64 = options
        .iter()
        .filter_map(|o| o.weighted_cost())
        .map(u64::from)
        .sum();
    if spent > u64::from(limits.ethic_budget) {
        return Ok(Some(Violation::BudgetExceeded {
            spent,
            budget: limits.ethic_budget,
        }));
    }

    Ok(None)
}

/// Whether `candidate` passes every hard rule
pub fn is_legal<C: Catalog + ?Sized>(
    catalog: &C,
    candidate: &Conjunctive,
    limits: &RuleLimits,
) -> Result<bool> {
    Ok(first_violation(catalog, candidate, limits)?.is_none())
}
