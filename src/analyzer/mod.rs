//! # Analysis Orchestration
//!
//! Wires the pipeline together for one run: validate the configuration,
//! build (or reuse) the dependency cache, discover every module reachable
//! from the entry files, detect cycles, and classify them.
//!
//! Configuration problems (malformed aliases or globs, unreadable entry
//! files, zero limits) fail the run before any report exists. Everything
//! else that goes wrong for a single module is carried in the report as an
//! [`AnalysisDiagnostic`](crate::core::AnalysisDiagnostic).
//!
//! ## Example
//!
//! ```no_run
//! use roundabout::analyzer::ModuleAnalyzer;
//! use roundabout::common::ConfigBuilder;
//! use roundabout::config::AnalysisConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalysisConfig::builder()
//!     .with_root("./web")
//!     .with_entry_files(vec!["src/main.ts".into()])
//!     .with_infrastructure_patterns(vec!["src/services/**".to_string()])
//!     .build()?;
//!
//! let report = ModuleAnalyzer::new(config).analyze(None)?;
//! for classified in report.cycles() {
//!     println!("{} cycle of {} modules", classified.severity, classified.cycle.len());
//! }
//! # Ok(())
//! # }
//! ```

mod analyzer_impl;

pub use analyzer_impl::*;
