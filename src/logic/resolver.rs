//! Requirement Resolver
//!
//! Enumerates every way to satisfy a conjunction of disjunctive clauses by
//! picking one member per clause. When a picked member has requirements of
//! its own, those clauses join the pending work of that same branch.
//!
//! # Design
//!
//! - **Explicit worklist**: branches live on a stack of frames instead of
//!   the call stack, so depth and output size are bounded by config
//! - **Cycle detection**: every pending clause carries the chain of picks
//!   that introduced it; picking a member already on that chain is a
//!   `MalformedClauseGraph` error rather than endless expansion
//! - **Set output**: candidates are collected into an ordered set, so
//!   branches that end up with the same picks collapse

use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::{Catalog, CatalogOption};
use crate::clause::{Conjunctive, Disjunctive};
use crate::config_file::SearchLimits;
use crate::error::{EngineError, Result};

// ============================================================================
// Search State
// ============================================================================

/// A clause still to be satisfied, with the picks that led to it
#[derive(Debug, Clone)]
struct PendingClause {
    clause: Disjunctive,
    chain: Vec<String>,
}

/// One branch of the search
#[derive(Debug)]
struct Frame {
    pending: Vec<PendingClause>,
    picked: Conjunctive,
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a free-standing list of requirement clauses.
///
/// An empty clause list resolves to a single empty candidate; a clause with
/// no members has no resolution at all.
pub fn resolve<C: Catalog + ?Sized>(
    catalog: &C,
    clauses: &[Disjunctive],
    limits: &SearchLimits,
) -> Result<BTreeSet<Conjunctive>> {
    run(catalog, seed(clauses, &[]), limits)
}

/// Resolve the requirements of one catalog option.
///
/// The option itself heads every chain, so a requirement that loops back
/// to it is reported as a cycle.
pub fn resolve_option<C: Catalog + ?Sized>(
    catalog: &C,
    option: &CatalogOption,
    limits: &SearchLimits,
) -> Result<BTreeSet<Conjunctive>> {
    let root = [option.identifier.clone()];
    let candidates = run(catalog, seed(&option.requires, &root), limits)?;
    debug!(
        "Resolved {} requirement clause(s) of {} into {} candidate(s)",
        option.requires.len(),
        option.identifier,
        candidates.len()
    );
    Ok(candidates)
}

// ============================================================================
// Worklist
// ============================================================================

fn seed(clauses: &[Disjunctive], chain: &[String]) -> Vec<PendingClause> {
    let mut pending: Vec<PendingClause> = Vec::with_capacity(clauses.len());
    for clause in clauses {
        if !pending.iter().any(|p| p.clause == *clause) {
            pending.push(PendingClause {
                clause: clause.clone(),
                chain: chain.to_vec(),
            });
        }
    }
    pending
}

fn run<C: Catalog + ?Sized>(
    catalog: &C,
    pending: Vec<PendingClause>,
    limits: &SearchLimits,
) -> Result<BTreeSet<Conjunctive>> {
    let mut results = BTreeSet::new();
    let mut stack = vec![Frame {
        pending,
        picked: Conjunctive::new(),
    }];

    while let Some(mut frame) = stack.pop() {
        let Some(head) = frame.pending.pop() else {
            results.insert(frame.picked);
            if results.len() > limits.max_candidates {
                return Err(EngineError::SearchLimit {
                    what: "requirement candidates",
                    limit: limits.max_candidates,
                });
            }
            continue;
        };

        for member in head.clause.iter() {
            if head.chain.iter().any(|id| id == member) {
                let mut chain = head.chain.clone();
                chain.push(member.to_string());
                return Err(EngineError::MalformedClauseGraph { chain });
            }

            let option = catalog.lookup(member)?;
            let mut pending = frame.pending.clone();

            if option.has_requirements() {
                if head.chain.len() >= limits.max_requirement_depth {
                    return Err(EngineError::SearchLimit {
                        what: "requirement depth",
                        limit: limits.max_requirement_depth,
                    });
                }
                let mut chain = head.chain.clone();
                chain.push(member.to_string());
                for clause in &option.requires {
                    if !pending.iter().any(|p| p.clause == *clause) {
                        pending.push(PendingClause {
                            clause: clause.clone(),
                            chain: chain.clone(),
                        });
                    }
                }
            }

            let mut picked = frame.picked.clone();
            picked.insert(member);
            stack.push(Frame { pending, picked });
        }
    }

    Ok(results)
}
