use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::common::{CommonArgs, CycleDisplayArgs, FormatArgs};

#[derive(Parser)]
#[command(
    name = "roundabout",
    about = "🔁 Detect module dependency cycles in JavaScript and TypeScript codebases",
    long_about = "roundabout follows the import, export-from and require references of your \
                  modules, builds the dependency graph reachable from your entry files and \
                  reports every cycle it finds, classified by severity with a concrete \
                  suggestion for breaking it.",
    subcommand_required = true,
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect the module graph for dependency cycles
    ///
    /// Follows every reference reachable from the entry files, enumerates
    /// the cycles within the configured depth and reports each with its
    /// severity and a remediation hint.
    #[command(
        long_about = "Analyze module references to detect circular dependency chains. This \
                      command resolves every import, re-export and require reachable from the \
                      entry files, builds the module graph and enumerates all of its elementary \
                      cycles up to --max-depth modules long. Each cycle is classified as \
                      standard, aggregator (passes through a re-export-only module) or \
                      infrastructure (touches a configured critical path)."
    )]
    Inspect {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        format: FormatArgs,

        #[command(flatten)]
        cycle_display: CycleDisplayArgs,

        /// Exit with error code if cycles found
        #[arg(long, env = "ROUNDABOUT_ERROR_ON_CYCLES")]
        error_on_cycles: bool,
    },

    /// Create a visualization of the module graph
    ///
    /// Renders the modules reachable from the entry files and the references
    /// between them, with cycle edges highlighted.
    #[command(
        long_about = "Generate visual dependency graphs as ASCII text, Mermaid diagrams or \
                      Graphviz DOT files. Cycle edges are highlighted by severity and re-export \
                      aggregators are drawn with a distinct shape. Use --group-by-directory to \
                      cluster modules by the directory they live in."
    )]
    Spectacle {
        #[command(flatten)]
        common: CommonArgs,

        /// Graph format
        #[arg(
            short,
            long,
            value_enum,
            default_value = "mermaid",
            env = "ROUNDABOUT_GRAPH_FORMAT"
        )]
        format: GraphFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long, env = "ROUNDABOUT_OUTPUT")]
        output: Option<PathBuf>,

        /// Highlight cycles in the graph
        #[arg(
            long,
            default_value = "true",
            env = "ROUNDABOUT_HIGHLIGHT_CYCLES"
        )]
        highlight_cycles: bool,

        /// Cluster modules by directory
        #[arg(long, env = "ROUNDABOUT_GROUP_BY_DIRECTORY")]
        group_by_directory: bool,
    },

    /// Put a spotlight on cycles involving a specific module
    ///
    /// Runs the full analysis and shows only the cycles that pass through a
    /// module whose path contains the given fragment.
    #[command(
        long_about = "Analyze circular dependencies involving a specific module. The whole \
                      graph is still analyzed, then the report is narrowed to cycles containing \
                      a module whose path (relative to the project root) contains MODULE, e.g. \
                      `src/components/Button`."
    )]
    Spotlight {
        /// Path fragment identifying the module
        #[arg(value_name = "MODULE", env = "ROUNDABOUT_MODULE")]
        module: String,

        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        format: FormatArgs,

        #[command(flatten)]
        cycle_display: CycleDisplayArgs,

        /// Exit with error code if cycles found
        #[arg(long, env = "ROUNDABOUT_ERROR_ON_CYCLES")]
        error_on_cycles: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Junit,
    #[value(name = "github")]
    GitHub,
}

#[derive(Clone, Copy, Debug, PartialEq, clap::ValueEnum)]
pub enum GraphFormat {
    Ascii,
    Mermaid,
    Dot,
}
