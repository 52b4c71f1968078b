//! Engine modules: the entry point callers talk to.
//!
//! The engine layer binds a catalog handle and a configuration together and
//! exposes the validation queries a front end needs.

pub mod validator;
