//! # Configuration Module
//!
//! Configuration structures for the analysis engine and for every roundabout
//! command.
//!
//! - **AnalysisConfig**: engine options, loadable from `roundabout.toml`
//! - **CommonAnalysisConfig**: engine options merged with command-line flags,
//!   plus the paths still to be scanned for entry files
//! - **CheckCyclesConfig**: the `inspect` command
//! - **SpotlightConfig**: the `spotlight` command
//! - **GraphOptions**: the `spectacle` command
//!
//! ## Example
//!
//! ```
//! use roundabout::common::ConfigBuilder;
//! use roundabout::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::builder()
//!     .with_root("/repo")
//!     .with_alias("@/*", "src/*")
//!     .with_infrastructure_patterns(vec!["src/services/**".into()])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_depth, 10);
//! ```

pub mod analysis;
pub mod check;
pub mod common;
pub mod graph;
pub mod spotlight;

pub use analysis::{AliasPatternConfig, AnalysisConfig, AnalysisConfigBuilder};
pub use check::CheckCyclesConfig;
pub use common::CommonAnalysisConfig;
pub use graph::GraphOptions;
pub use spotlight::SpotlightConfig;
