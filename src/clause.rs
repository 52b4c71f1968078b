//! AND/OR identifier sets
//!
//! Both shapes share the same storage (an ordered set of identifiers) but
//! carry opposite meanings, so they are distinct types:
//!
//! - [`Conjunctive`]: every member is present together. Used for complete
//!   candidate selections and finished requirement resolutions.
//! - [`Disjunctive`]: at least one member must be present. Only appears
//!   inside a requirement list.
//!
//! Ordered sets keep every search result deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A set of identifiers that must all be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conjunctive(BTreeSet<String>);

/// A set of identifiers of which at least one must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Disjunctive(BTreeSet<String>);

/// A conjunction of disjunctive clauses: every clause must be satisfied.
pub type Requirements = Vec<Disjunctive>;

macro_rules! identifier_set {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn contains(&self, identifier: &str) -> bool {
                self.0.contains(identifier)
            }

            pub fn insert(&mut self, identifier: impl Into<String>) -> bool {
                self.0.insert(identifier.into())
            }

            pub fn remove(&mut self, identifier: &str) -> bool {
                self.0.remove(identifier)
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
                self.0.iter().map(String::as_str)
            }
        }

        impl<S: Into<String>> FromIterator<S> for $name {
            fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
                Self(iter.into_iter().map(Into::into).collect())
            }
        }

        impl From<BTreeSet<String>> for $name {
            fn from(set: BTreeSet<String>) -> Self {
                Self(set)
            }
        }

        impl IntoIterator for $name {
            type Item = String;
            type IntoIter = std::collections::btree_set::IntoIter<String>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }
    };
}

identifier_set!(Conjunctive);
identifier_set!(Disjunctive);

impl Conjunctive {
    /// Add every member of `other` to this set
    pub fn union_with(&mut self, other: &Conjunctive) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Whether this set holds at least one member of the clause
    pub fn satisfies(&self, clause: &Disjunctive) -> bool {
        clause.iter().any(|id| self.contains(id))
    }
}

impl fmt::Display for Conjunctive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().collect::<Vec<_>>().join(", "))
    }
}

impl fmt::Display for Disjunctive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.iter().collect::<Vec<_>>().join(" | "))
    }
}
