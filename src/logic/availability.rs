//! Availability Deriver
//!
//! Works out which not-yet-chosen options would leave the selection with no
//! legal way to finish. Each allowed option is placed into a copy of the
//! selection and the copy is asked whether it is still completable.
//!
//! An option is allowed when all of its content packs are active and none
//! of the identifiers it prohibits is an active content pack. Options that
//! are not allowed are filtered out before any hypothesis, so they are
//! never reported as unavailable.

use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::{Catalog, CatalogOption};
use crate::config_file::EngineConfig;
use crate::error::Result;
use crate::logic::completion::is_completable;
use crate::selection::Selection;

// ============================================================================
// Content Pack Gating
// ============================================================================

/// Whether the active content packs permit this option
pub fn is_allowed(option: &CatalogOption, content_packs: &BTreeSet<String>) -> bool {
    option.content_packs.is_subset(content_packs)
        && option.prohibits.is_disjoint(content_packs)
}

/// Catalog options permitted by the active content packs, in catalog order
pub fn allowed_options<'c, C: Catalog + ?Sized>(
    catalog: &'c C,
    content_packs: &BTreeSet<String>,
) -> Vec<&'c CatalogOption> {
    catalog
        .options()
        .into_iter()
        .filter(|option| is_allowed(option, content_packs))
        .collect()
}

// ============================================================================
// Availability
// ============================================================================

/// Allowed options that would be hypothesized: slotted and not yet chosen
fn hypothesis_candidates<'c, C: Catalog + ?Sized>(
    catalog: &'c C,
    selection: &Selection,
    config: &EngineConfig,
) -> Vec<&'c CatalogOption> {
    let candidates = allowed_options(catalog, &selection.content_packs)
        .into_iter()
        .filter(|option| option.category.has_slot() && !selection.contains(&option.identifier));

    match config.search.max_scanned_options {
        Some(cap) => candidates.take(cap).collect(),
        None => candidates.collect(),
    }
}

/// Identifiers that cannot currently be added without making the selection
/// impossible to complete
pub fn unavailable_options<C: Catalog + ?Sized>(
    catalog: &C,
    selection: &Selection,
    config: &EngineConfig,
) -> Result<BTreeSet<String>> {
    let candidates = hypothesis_candidates(catalog, selection, config);
    debug!("Testing {} option(s) for availability", candidates.len());

    candidates
        .par_iter()
        .filter_map(|option| {
            let hypothetical = selection.with_option(option)?;
            match is_completable(catalog, &hypothetical, config) {
                Ok(true) => None,
                Ok(false) => Some(Ok(option.identifier.clone())),
                Err(e) => Some(Err(e)),
            }
        })
        .collect()
}

/// Identifiers that can currently be added while keeping the selection
/// completable
pub fn available_options<C: Catalog + ?Sized>(
    catalog: &C,
    selection: &Selection,
    config: &EngineConfig,
) -> Result<BTreeSet<String>> {
    let unavailable = unavailable_options(catalog, selection, config)?;
    Ok(hypothesis_candidates(catalog, selection, config)
        .into_iter()
        .map(|option| option.identifier.clone())
        .filter(|identifier| !unavailable.contains(identifier))
        .collect())
}
