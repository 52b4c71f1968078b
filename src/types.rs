//! Type-safe tags for catalog options and engine policies
//!
//! Categories are a closed set, so they are modelled as an enum with
//! exhaustive matching rather than stringly-typed tags.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Classification of a catalog option.
///
/// The category decides which selection slot an option occupies and which
/// hard rules apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Origin,
    Authority,
    /// Budgeted category; each pick spends its weighted cost
    Ethic,
    /// Secondary category, capped in count
    Civic,
    Trait,
    Habitat,
    Archetype,
}

impl Category {
    /// Whether options of this category spend the ethic budget
    pub const fn is_budgeted(self) -> bool {
        matches!(self, Self::Ethic)
    }

    /// Whether a `Selection` has a slot for this category.
    ///
    /// Trait, Habitat and Archetype picks are bookkeeping only: they never
    /// reach the effective option set and are never hypothesized.
    pub const fn has_slot(self) -> bool {
        matches!(
            self,
            Self::Origin | Self::Authority | Self::Ethic | Self::Civic
        )
    }

    /// Whether the slot holds at most one identifier (later picks overwrite)
    pub const fn is_single_valued(self) -> bool {
        matches!(self, Self::Origin | Self::Authority)
    }
}

/// What the completion search does with a selected option whose own
/// requirements have no standalone-legal resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequirementPolicy {
    /// The selection has no completions
    #[default]
    Reject,
    /// The option contributes nothing and the search carries on without it
    Ignore,
}
