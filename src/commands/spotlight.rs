//! Spotlight command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::{CommonAnalysisConfig, SpotlightConfig};
use crate::error::RoundaboutError;

impl FromCommand for SpotlightConfig {
    fn from_command(command: Commands) -> Result<Self, RoundaboutError> {
        match command {
            Commands::Spotlight {
                module,
                common,
                format,
                cycle_display,
                error_on_cycles,
            } => SpotlightConfig::builder()
                .with_module(module)
                .with_analysis(CommonAnalysisConfig::from_args(&common)?)
                .with_format(format.format)
                .with_error_on_cycles(error_on_cycles)
                .with_max_cycles(cycle_display.max_cycles)
                .build(),
            _ => Err(RoundaboutError::ConfigurationError {
                message: "Invalid command type for SpotlightConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(SpotlightConfig);

/// Execute the spotlight command for analyzing cycles involving a specific
/// module
pub fn execute_spotlight_command(command: Commands) -> Result<()> {
    let config = SpotlightConfig::from_command(command)
        .wrap_err("Failed to parse spotlight command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::spotlight::SpotlightExecutor;
    SpotlightExecutor::execute(config)
}
