//! # Dependency Cache
//!
//! Memoizes, per module, the resolved out-edges and the aggregator flag.
//! Entries are keyed by [`ModuleId`](crate::core::ModuleId) and invalidated
//! by comparing the file's current fingerprint (modification time and size)
//! with the one stored at resolution time. A record whose references now
//! resolve differently is re-linked without re-extraction. There is no
//! explicit invalidation call.
//!
//! The cache is an explicitly owned component. Tests build a fresh one; an
//! analysis run shares one `Arc<DependencyCache>` across all workers.

mod cache_impl;

pub use cache_impl::*;
