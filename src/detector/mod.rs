//! # Cycle Detection Module
//!
//! Enumerates every elementary cycle in the module graph, up to a configured
//! path length.
//!
//! ## Algorithm
//!
//! Each known module starts a depth-first traversal that tracks the current
//! path. Reaching a module that is already on the path closes a cycle; the
//! path suffix from that module is rotated into canonical form and inserted
//! into a shared set, so a cycle found from several starts is kept once.
//!
//! Traversals never enter modules ordered before their start, which keeps
//! the search complete (the cycle is found from its smallest member) while
//! pruning most duplicate work. A branch that would push the path past
//! `maxDepth` is abandoned and reported as an `analysis-truncated`
//! diagnostic.
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use roundabout::core::ModuleId;
//! use roundabout::detector::CycleDetector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let a = ModuleId::from_normalized("/repo/a.ts");
//! let b = ModuleId::from_normalized("/repo/b.ts");
//!
//! let mut graph = BTreeMap::new();
//! graph.insert(a.clone(), vec![b.clone()]);
//! graph.insert(b.clone(), vec![a.clone()]);
//!
//! let outcome = CycleDetector::new(10).detect_cycles(&graph, &[a.clone(), b.clone()])?;
//!
//! assert_eq!(outcome.cycle_count(), 1);
//! assert_eq!(outcome.cycles()[0].modules(), &[a, b]);
//! # Ok(())
//! # }
//! ```

mod detector_impl;

pub use detector_impl::*;
