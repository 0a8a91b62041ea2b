//! # Graph Construction and Rendering Module
//!
//! ## Components
//!
//! ### Graph Building
//! - **ModuleGraph**: the dependency graph seen through the cache. Edges are
//!   answered on demand; `all_known_modules` walks breadth-first from the
//!   entry files up to `maxModules`.
//! - **DependencyGraph**: the trait the cycle detector searches. Any map from
//!   module to out-edges implements it, which keeps the detector testable
//!   without a file system.
//!
//! ### Graph Rendering
//! - **GraphRenderer**: renders the module graph as ASCII, Mermaid, or DOT,
//!   colouring cycle members by severity tier.
//!
//! ## Example
//!
//! ```
//! use std::path::PathBuf;
//!
//! use petgraph::graph::DiGraph;
//! use roundabout::analyzer::AnalysisReport;
//! use roundabout::core::ModuleId;
//! use roundabout::graph::GraphRenderer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = DiGraph::new();
//! let a = graph.add_node(ModuleId::from_normalized("/repo/a.ts"));
//! let b = graph.add_node(ModuleId::from_normalized("/repo/b.ts"));
//! graph.add_edge(a, b, ());
//!
//! let report = AnalysisReport::new(PathBuf::from("/repo"), vec![], vec![], vec![]);
//! let mut output = Vec::new();
//! GraphRenderer::new(true, false).render_dot(&graph, &report, &mut output)?;
//!
//! assert!(String::from_utf8(output)?.contains(r#""a.ts" -> "b.ts""#));
//! # Ok(())
//! # }
//! ```

mod builder;
mod renderer;

pub use builder::{DependencyGraph, KnownModules, ModuleGraph};
pub use renderer::GraphRenderer;
