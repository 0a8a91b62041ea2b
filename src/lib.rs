//! # Roundabout - Detect Module Dependency Cycles
//!
//! Roundabout follows the import, re-export and require references of a
//! JavaScript or TypeScript codebase, builds the module dependency graph
//! reachable from a set of entry files, and reports every cycle it finds.
//! Each cycle is classified by severity and comes with a concrete suggestion
//! for breaking it.
//!
//! ## Main Components
//!
//! - **Resolver**: Maps reference specifiers to canonical module ids (aliases,
//!   relative paths, extension and index probing)
//! - **Extractor**: Pulls references out of module source text
//! - **Cache**: Memoizes per-module dependency records, invalidated by file
//!   fingerprint
//! - **Graph**: Discovers the modules reachable from the entries and renders
//!   the graph
//! - **Detector**: Enumerates elementary cycles with depth-limited parallel
//!   traversals
//! - **Classifier**: Assigns severity tiers and remediation hints
//! - **Reports**: Generates human-readable and machine-readable reports
//!
//! ## Usage
//!
//! ### Analyzing a project
//!
//! ```no_run
//! use roundabout::analyzer::ModuleAnalyzer;
//! use roundabout::common::ConfigBuilder;
//! use roundabout::config::AnalysisConfig;
//! use roundabout::reports::{HumanReportGenerator, JsonReportGenerator, ReportGenerator};
//! use miette::IntoDiagnostic;
//!
//! # fn main() -> miette::Result<()> {
//! let config = AnalysisConfig::builder()
//!     .with_root("/path/to/web-app")
//!     .with_entry_files(vec!["src/main.tsx".into()])
//!     .with_alias("@/*", "src/*")
//!     .with_infrastructure_patterns(vec!["src/services/**".to_string()])
//!     .build()?;
//!
//! let report = ModuleAnalyzer::new(config).analyze(None)?;
//!
//! if report.has_cycles() {
//!     // Human-readable report for console output, at most 5 cycles
//!     let human = HumanReportGenerator::new(Some(5));
//!     println!("{}", human.generate_report(&report)?);
//!
//!     // JSON report for programmatic processing
//!     let json = JsonReportGenerator::new().generate_report(&report)?;
//!     std::fs::write("cycles.json", json).into_diagnostic()?;
//! } else {
//!     println!("No circular dependencies found!");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Visualizing the module graph
//!
//! ```no_run
//! use roundabout::analyzer::ModuleAnalyzer;
//! use roundabout::common::ConfigBuilder;
//! use roundabout::config::AnalysisConfig;
//! use roundabout::graph::GraphRenderer;
//! use miette::IntoDiagnostic;
//!
//! # fn main() -> miette::Result<()> {
//! # let config = AnalysisConfig::builder()
//! #     .with_root(".")
//! #     .with_entry_files(vec!["src/index.ts".into()])
//! #     .build()?;
//! let (report, graph) = ModuleAnalyzer::new(config).analyze_graph(None)?;
//!
//! let renderer = GraphRenderer::new(
//!     true,  // highlight cycles
//!     true,  // group modules by directory
//! );
//!
//! let mut mermaid = Vec::new();
//! renderer.render_mermaid(&graph, &report, &mut mermaid)?;
//! std::fs::write("modules.mmd", mermaid).into_diagnostic()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Reusing the dependency cache
//!
//! ```no_run
//! # use roundabout::analyzer::ModuleAnalyzer;
//! # use roundabout::common::ConfigBuilder;
//! # use roundabout::config::AnalysisConfig;
//! # fn main() -> miette::Result<()> {
//! # let config = AnalysisConfig::builder()
//! #     .with_root(".")
//! #     .with_entry_files(vec!["src/index.ts".into()])
//! #     .build()?;
//! let analyzer = ModuleAnalyzer::new(config);
//! let cache = analyzer.build_cache()?;
//! let analyzer = analyzer.with_cache(cache.clone());
//!
//! let first = analyzer.analyze(None)?;
//! // Unchanged files are served from the cache on the second run
//! let second = analyzer.analyze(None)?;
//! assert_eq!(first.cycles(), second.cycles());
//! println!("{} cache hits", cache.hits());
//! # Ok(())
//! # }
//! ```

// Private modules
mod constants;
mod logging;
mod progress;
mod utils;

// Public modules
pub mod analyzer;
pub mod cache;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod core;
pub mod detector;
pub mod discovery;
pub mod error;
pub mod executors;
pub mod extractor;
pub mod graph;
pub mod patterns;
pub mod reference_filter;
pub mod reports;
pub mod resolver;

// Main entry point for the library
pub fn run() -> miette::Result<()> {
    use clap::Parser;

    use crate::cli::Cli;
    use crate::commands::execute_command;

    let cli = Cli::parse();
    logging::init(cli.verbose);

    execute_command(cli.command)
}
