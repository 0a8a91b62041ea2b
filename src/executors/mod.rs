//! Command executors that handle the actual logic for each command

pub mod check;
pub mod graph;
pub mod spotlight;

use miette::Result;

use crate::analyzer::AnalysisReport;
use crate::cli::OutputFormat;
use crate::error::RoundaboutError;
use crate::progress::ProgressReporter;
use crate::reports::{
    GitHubReportGenerator, HumanReportGenerator, JsonReportGenerator, JunitReportGenerator,
    ReportGenerator,
};

/// Trait for command executors
pub trait CommandExecutor {
    type Config;

    /// Execute the command with the given configuration
    fn execute(config: Self::Config) -> Result<()>;
}

/// Progress reporter if we're in an interactive terminal
pub(crate) fn interactive_progress() -> Option<ProgressReporter> {
    if console::Term::stderr().is_term() {
        Some(ProgressReporter::new())
    } else {
        None
    }
}

/// Render `report` in the requested format
pub(crate) fn render_report(
    report: &AnalysisReport,
    format: OutputFormat,
    max_cycles: Option<usize>,
) -> Result<String, RoundaboutError> {
    match format {
        OutputFormat::Human => HumanReportGenerator::new(max_cycles).generate_report(report),
        OutputFormat::Json => JsonReportGenerator::new().generate_report(report),
        OutputFormat::Junit => JunitReportGenerator::new().generate_report(report),
        OutputFormat::GitHub => GitHubReportGenerator::new().generate_report(report),
    }
}
