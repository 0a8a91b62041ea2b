//! # Module Identity Resolution
//!
//! Turns a raw reference string plus the location of the file containing it
//! into a canonical [`ModuleId`](crate::core::ModuleId), or decides that the
//! reference is external, ignored, or unresolvable.
//!
//! Resolution order is fixed:
//!
//! 1. alias prefix substitution (first configured alias that applies)
//! 2. relative join against the referencing module's directory
//! 3. candidate suffix probing (`""`, `.ts`, ..., `/index.ts`, ...)
//!
//! The first candidate that exists on disk wins.

mod alias;
mod resolver_impl;

pub use alias::AliasPattern;
pub use resolver_impl::*;
