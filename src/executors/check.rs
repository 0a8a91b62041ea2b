//! Check command executor

use console::style;
use miette::{Result, WrapErr};

use crate::analyzer::ModuleAnalyzer;
use crate::config::CheckCyclesConfig;
use crate::executors::{CommandExecutor, interactive_progress, render_report};

pub struct CheckExecutor;

impl CommandExecutor for CheckExecutor {
    type Config = CheckCyclesConfig;

    fn execute(config: Self::Config) -> Result<()> {
        eprintln!(
            "{} Checking for module dependency cycles...\n",
            style("🔁").cyan()
        );

        let mut progress = interactive_progress();

        let analysis = config
            .analysis
            .into_analysis_config(progress.as_mut())
            .wrap_err("Failed to collect entry files")?;

        if analysis.entry_files.is_empty() {
            eprintln!("{} No entry files found to analyze", style("ℹ").blue());
            return Ok(());
        }

        eprintln!(
            "  {} Max depth: {}",
            style("→").dim(),
            style(analysis.max_depth).yellow()
        );
        eprintln!(
            "  {} Infrastructure patterns: {}",
            style("→").dim(),
            if analysis.infrastructure_path_patterns.is_empty() {
                style("none".to_string()).dim()
            } else {
                style(analysis.infrastructure_path_patterns.join(", ")).green()
            }
        );

        let report = ModuleAnalyzer::new(analysis)
            .analyze(progress.as_mut())
            .wrap_err("Failed to analyze module dependencies")?;

        let output = render_report(&report, config.format, config.max_cycles)
            .wrap_err("Failed to generate report")?;
        print!("{output}");

        // Exit with error code if cycles found and requested
        if config.error_on_cycles && report.has_cycles() {
            std::process::exit(1);
        }

        Ok(())
    }
}
