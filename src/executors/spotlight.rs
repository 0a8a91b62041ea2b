//! Spotlight command executor

use console::style;
use miette::{Result, WrapErr};

use crate::analyzer::ModuleAnalyzer;
use crate::config::SpotlightConfig;
use crate::executors::{CommandExecutor, interactive_progress, render_report};
use crate::utils::string::pluralize;

pub struct SpotlightExecutor;

impl CommandExecutor for SpotlightExecutor {
    type Config = SpotlightConfig;

    fn execute(config: Self::Config) -> Result<()> {
        eprintln!(
            "{} Analyzing cycles involving module '{}'...\n",
            style("🔍").cyan(),
            style(&config.module).bold()
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

        let report = ModuleAnalyzer::new(analysis)
            .analyze(progress.as_mut())
            .wrap_err("Failed to analyze module dependencies")?;

        // The whole graph is analyzed; only the report is narrowed
        let focused = report.focused_on(&config.module);

        if focused.has_cycles() {
            eprintln!(
                "\n{} Found {} {} involving '{}'",
                style("⚠").yellow(),
                focused.cycle_count(),
                pluralize("cycle", focused.cycle_count()),
                style(&config.module).bold()
            );
        } else {
            eprintln!(
                "{} No cycles found involving module '{}'",
                style("✓").green(),
                style(&config.module).bold()
            );
        }

        let output = render_report(&focused, config.format, config.max_cycles)
            .wrap_err("Failed to generate report for module analysis")?;
        print!("{output}");

        if config.error_on_cycles && focused.has_cycles() {
            std::process::exit(1);
        }

        Ok(())
    }
}
