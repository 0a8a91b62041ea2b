//! Spectacle command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::{CommonAnalysisConfig, GraphOptions};
use crate::error::RoundaboutError;

impl FromCommand for GraphOptions {
    fn from_command(command: Commands) -> Result<Self, RoundaboutError> {
        match command {
            Commands::Spectacle {
                common,
                format,
                output,
                highlight_cycles,
                group_by_directory,
            } => GraphOptions::builder()
                .with_analysis(CommonAnalysisConfig::from_args(&common)?)
                .with_format(format)
                .with_output(output)
                .with_highlight_cycles(highlight_cycles)
                .with_group_by_directory(group_by_directory)
                .build(),
            _ => Err(RoundaboutError::ConfigurationError {
                message: "Invalid command type for GraphOptions".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(GraphOptions);

/// Execute the spectacle command for generating visual dependency graphs
pub fn execute_graph_command(command: Commands) -> Result<()> {
    let config = GraphOptions::from_command(command)
        .wrap_err("Failed to parse spectacle command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::graph::GraphExecutor;
    GraphExecutor::execute(config)
}
