//! Selection working state
//!
//! A `Selection` records which options the caller has chosen, partitioned
//! by category slot. It holds identifiers only; every lookup goes through
//! the catalog handle passed into each call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::catalog::{Catalog, CatalogOption};
use crate::clause::Conjunctive;
use crate::error::{EngineError, Result};
use crate::types::Category;

/// The caller's current, possibly partial, set of choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Selection {
    pub origin: Option<String>,
    pub authority: Option<String>,
    pub ethics: BTreeSet<String>,
    pub civics: BTreeSet<String>,

    /// Trait, Habitat and Archetype picks. Recorded for the caller but
    /// never part of the effective options, so they cannot affect legality.
    pub species: BTreeSet<String>,

    /// Active content packs (external input)
    pub content_packs: BTreeSet<String>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a selection from identifiers, placing each by category
    pub fn from_options<C, I, S>(catalog: &C, identifiers: I) -> Result<Self>
    where
        C: Catalog + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for identifier in identifiers {
            selection.add(catalog, identifier.as_ref())?;
        }
        Ok(selection)
    }

    /// Builder-style content pack activation
    pub fn with_content_packs<I, S>(mut self, packs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_packs.extend(packs.into_iter().map(Into::into));
        self
    }

    /// Choose an option. Single-valued slots are overwritten.
    pub fn add<C: Catalog + ?Sized>(&mut self, catalog: &C, identifier: &str) -> Result<()> {
        let option = catalog.lookup(identifier)?;
        self.place(option);
        Ok(())
    }

    /// Put an option into the slot its category dictates
    pub fn place(&mut self, option: &CatalogOption) {
        let identifier = option.identifier.clone();
        match option.category {
            Category::Origin => self.origin = Some(identifier),
            Category::Authority => self.authority = Some(identifier),
            Category::Ethic => {
                self.ethics.insert(identifier);
            }
            Category::Civic => {
                self.civics.insert(identifier);
            }
            Category::Trait | Category::Habitat | Category::Archetype => {
                self.species.insert(identifier);
            }
        }
    }

    /// Remove an identifier from whichever slot holds it.
    ///
    /// Returns true if something was removed.
    pub fn remove(&mut self, identifier: &str) -> bool {
        let mut removed = false;
        if self.origin.as_deref() == Some(identifier) {
            self.origin = None;
            removed = true;
        }
        if self.authority.as_deref() == Some(identifier) {
            self.authority = None;
            removed = true;
        }
        removed |= self.ethics.remove(identifier);
        removed |= self.civics.remove(identifier);
        removed |= self.species.remove(identifier);
        removed
    }

    /// A copy of this selection with `option` placed in its slot.
    ///
    /// Returns `None` for categories without a slot; those are never
    /// hypothesized.
    pub fn with_option(&self, option: &CatalogOption) -> Option<Self> {
        if !option.category.has_slot() {
            return None;
        }
        let mut hypothetical = self.clone();
        hypothetical.place(option);
        Some(hypothetical)
    }

    /// Origin, Authority, Ethic and Civic choices as one conjunctive set
    pub fn effective_options(&self) -> Conjunctive {
        self.origin
            .iter()
            .chain(self.authority.iter())
            .chain(self.ethics.iter())
            .chain(self.civics.iter())
            .map(String::as_str)
            .collect()
    }

    /// Whether the identifier is one of the effective options
    pub fn contains(&self, identifier: &str) -> bool {
        self.origin.as_deref() == Some(identifier)
            || self.authority.as_deref() == Some(identifier)
            || self.ethics.contains(identifier)
            || self.civics.contains(identifier)
    }

    /// Check that every identifier is known and sits in the slot its
    /// category dictates. Deserialized selections skip `place`, so a file
    /// can put an origin under `civics`.
    pub fn check_slots<C: Catalog + ?Sized>(&self, catalog: &C) -> Result<()> {
        let slotted = self
            .origin
            .iter()
            .map(|id| ("origin", id))
            .chain(self.authority.iter().map(|id| ("authority", id)))
            .chain(self.ethics.iter().map(|id| ("ethics", id)))
            .chain(self.civics.iter().map(|id| ("civics", id)))
            .chain(self.species.iter().map(|id| ("species", id)));

        for (slot, identifier) in slotted {
            let option = catalog.lookup(identifier)?;
            if slot_of(option.category) != slot {
                return Err(EngineError::MisplacedIdentifier {
                    identifier: identifier.clone(),
                    slot,
                    category: option.category,
                });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.effective_options().is_empty() && self.species.is_empty()
    }

    /// Save selection to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load selection from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Name of the field that holds options of this category
fn slot_of(category: Category) -> &'static str {
    match category {
        Category::Origin => "origin",
        Category::Authority => "authority",
        Category::Ethic => "ethics",
        Category::Civic => "civics",
        Category::Trait | Category::Habitat | Category::Archetype => "species",
    }
}
