//! Configuration constants for roundabout
//!
//! This module contains all configurable constants used throughout the
//! application. These values can be overridden through environment variables or
//! configuration files.

use std::time::Duration;

/// Progress bar configuration
pub mod progress {
    use super::*;

    /// Duration between progress bar updates
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Spinner frames for the roundabout animation
    pub const SPINNER_FRAMES: &[&str] = &["◴", "◷", "◶", "◵"];
}

/// Output formatting configuration
pub mod output {
    /// Default output format when not specified
    pub const DEFAULT_FORMAT: &str = "human";
}

/// Analysis defaults
pub mod analysis {
    /// Longest path (in modules) a single traversal may hold
    pub const DEFAULT_MAX_DEPTH: usize = 10;

    /// Upper bound on modules discovered from the entry files
    pub const DEFAULT_MAX_MODULES: usize = 5000;

    /// Suffixes appended to a reference when probing for a file, in order
    pub const DEFAULT_CANDIDATE_SUFFIXES: &[&str] = &[
        "",
        ".ts",
        ".tsx",
        ".js",
        ".jsx",
        ".mjs",
        ".cjs",
        "/index.ts",
        "/index.tsx",
        "/index.js",
        "/index.jsx",
        "/index.mjs",
        "/index.cjs",
    ];

    pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/node_modules/**"];

    /// Directory names never descended into when collecting entry files
    pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "target", "dist", "build"];

    /// Configuration file picked up from the project root when present
    pub const CONFIG_FILE_NAME: &str = "roundabout.toml";

    /// Environment variable holding the tracing filter
    pub const LOG_ENV: &str = "ROUNDABOUT_LOG";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_constants() {
        assert_eq!(progress::TICK_INTERVAL, Duration::from_millis(100));
        assert_eq!(progress::SPINNER_FRAMES.len(), 4);
    }

    #[test]
    fn test_output_constants() {
        assert_eq!(output::DEFAULT_FORMAT, "human");
    }

    #[test]
    fn test_candidate_suffixes_probe_exact_path_first() {
        assert_eq!(analysis::DEFAULT_CANDIDATE_SUFFIXES.first(), Some(&""));
        assert_eq!(analysis::DEFAULT_MAX_DEPTH, 10);
    }
}
