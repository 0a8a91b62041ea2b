//! Command implementations for the roundabout CLI
//!
//! This module contains the implementations for each CLI command:
//! - inspect: Inspect the module graph for dependency cycles
//! - spotlight: Put a spotlight on cycles involving a specific module
//! - spectacle: Create a visualization of the module graph

pub mod check;
pub mod graph;
pub mod spotlight;

use miette::Result;

use crate::cli::Commands;

/// Execute a command based on CLI input
pub fn execute_command(command: Commands) -> Result<()> {
    match &command {
        Commands::Inspect { .. } => check::execute_check_command(command),
        Commands::Spectacle { .. } => graph::execute_graph_command(command),
        Commands::Spotlight { .. } => spotlight::execute_spotlight_command(command),
    }
}
