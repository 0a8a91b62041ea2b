//! Common functionality shared across commands

use std::path::PathBuf;

use clap::Args;

/// Analysis options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Entry files or directories to scan for them (defaults to current
    /// directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Configuration file (defaults to roundabout.toml in the project root)
    #[arg(short, long, value_name = "FILE", env = "ROUNDABOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root used for aliases and path patterns
    #[arg(long, value_name = "DIR", env = "ROUNDABOUT_ROOT")]
    pub root: Option<PathBuf>,

    /// Longest module chain a single traversal may follow
    #[arg(long, env = "ROUNDABOUT_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Stop discovering modules after this many
    #[arg(long, env = "ROUNDABOUT_MAX_MODULES")]
    pub max_modules: Option<usize>,

    /// Import alias as PREFIX=REPLACEMENT, e.g. `@/*=src/*` (repeatable)
    #[arg(long = "alias", value_name = "PREFIX=REPLACEMENT")]
    pub aliases: Vec<String>,

    /// Glob marking infrastructure paths, e.g. `src/services/**` (repeatable)
    #[arg(long = "infrastructure", value_name = "GLOB")]
    pub infrastructure: Vec<String>,

    /// Glob for paths left out of the graph (repeatable)
    #[arg(long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Treat `import type` references as dependencies
    #[arg(long, env = "ROUNDABOUT_INCLUDE_TYPE_IMPORTS")]
    pub include_type_imports: bool,

    /// Treat dynamic `import()` references as dependencies
    #[arg(long, env = "ROUNDABOUT_INCLUDE_DYNAMIC_IMPORTS")]
    pub include_dynamic_imports: bool,

    /// Worker threads for cycle detection (defaults to one per core)
    #[arg(short, long, env = "ROUNDABOUT_JOBS")]
    pub jobs: Option<usize>,
}

/// Common output format arguments
#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = crate::constants::output::DEFAULT_FORMAT, env = "ROUNDABOUT_FORMAT")]
    pub format: crate::cli::OutputFormat,
}

/// Common cycle display arguments
#[derive(Args, Debug, Clone)]
pub struct CycleDisplayArgs {
    /// Maximum number of cycles to display (shows all by default)
    #[arg(long, env = "ROUNDABOUT_MAX_CYCLES")]
    pub max_cycles: Option<usize>,
}

impl CommonArgs {
    /// Get paths, using current directory if none provided
    pub fn get_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
        } else {
            self.paths.clone()
        }
    }
}

/// Generic builder trait for configuration objects
pub trait ConfigBuilder: Sized {
    type Config;

    /// Build the configuration, returning an error if validation fails
    fn build(self) -> Result<Self::Config, crate::error::RoundaboutError>;
}

/// Trait for configurations that can be created from CLI commands
pub trait FromCommand: Sized {
    /// The command variant that this config can be created from
    fn from_command(command: crate::cli::Commands) -> Result<Self, crate::error::RoundaboutError>;
}

/// Macro to implement `TryFrom<Commands>` using [`FromCommand`] trait
#[macro_export]
macro_rules! impl_try_from_command {
    ($config:ty) => {
        impl std::convert::TryFrom<$crate::cli::Commands> for $config {
            type Error = $crate::error::RoundaboutError;

            fn try_from(command: $crate::cli::Commands) -> Result<Self, Self::Error> {
                <$config as $crate::common::FromCommand>::from_command(command)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_args_get_paths_empty() {
        let args = CommonArgs::default();

        let paths = args.get_paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_absolute() || paths[0] == std::path::Path::new("."));
    }

    #[test]
    fn test_common_args_get_paths_with_values() {
        let test_paths = vec![PathBuf::from("/tmp/test1"), PathBuf::from("/tmp/test2")];

        let args = CommonArgs {
            paths: test_paths.clone(),
            ..CommonArgs::default()
        };

        assert_eq!(args.get_paths(), test_paths);
    }
}
