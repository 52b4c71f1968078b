//! Logic modules: the constraint engine proper.
//!
//! Every function here is pure: it reads an immutable catalog and a
//! caller-owned selection snapshot and never mutates either.
//!
//! # Modules
//!
//! - `rules`: hard-rule checker over a complete candidate set
//! - `resolver`: enumerates the ways to satisfy requirement clauses
//! - `completion`: combines resolutions with a selection into legal completions
//! - `availability`: content-pack gating and "what is still choosable"

pub mod availability;
pub mod completion;
pub mod resolver;
pub mod rules;
