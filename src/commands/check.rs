//! Inspect command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::{CheckCyclesConfig, CommonAnalysisConfig};
use crate::error::RoundaboutError;

impl FromCommand for CheckCyclesConfig {
    fn from_command(command: Commands) -> Result<Self, RoundaboutError> {
        match command {
            Commands::Inspect {
                common,
                format,
                cycle_display,
                error_on_cycles,
            } => CheckCyclesConfig::builder()
                .with_analysis(CommonAnalysisConfig::from_args(&common)?)
                .with_format(format.format)
                .with_error_on_cycles(error_on_cycles)
                .with_max_cycles(cycle_display.max_cycles)
                .build(),
            _ => Err(RoundaboutError::ConfigurationError {
                message: "Invalid command type for CheckCyclesConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(CheckCyclesConfig);

/// Execute the inspect command for detecting module dependency cycles
pub fn execute_check_command(command: Commands) -> Result<()> {
    let config = CheckCyclesConfig::from_command(command)
        .wrap_err("Failed to parse inspect command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::check::CheckExecutor;
    CheckExecutor::execute(config)
}
