//! # Cycle Classification
//!
//! Assigns each detected cycle a [`SeverityTier`](crate::core::SeverityTier)
//! and a structured remediation hint.
//!
//! - **Infrastructure**: any member matches an infrastructure path pattern.
//!   Always wins.
//! - **Aggregator**: some member is a pure re-export module. The hint points
//!   at the edge into the aggregator and recommends importing the concrete
//!   module directly.
//! - **Standard**: everything else. The hint proposes extracting what the
//!   first module imports from the second into a new shared module.
//!
//! Classification reads only static per-module facts, so the same cycle in
//! the same tree always gets the same result.

mod classifier_impl;

pub use classifier_impl::*;
