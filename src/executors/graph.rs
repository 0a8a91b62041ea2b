//! Graph command executor

use std::fs::File;
use std::io::{self, BufWriter, Write};

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::analyzer::ModuleAnalyzer;
use crate::cli::GraphFormat;
use crate::config::GraphOptions;
use crate::executors::CommandExecutor;
use crate::graph::GraphRenderer;

pub struct GraphExecutor;

impl CommandExecutor for GraphExecutor {
    type Config = GraphOptions;

    fn execute(config: Self::Config) -> Result<()> {
        eprintln!(
            "{} Generating {} dependency graph...",
            style("📊").cyan(),
            format!("{:?}", config.format).to_lowercase()
        );

        let analysis = config
            .analysis
            .into_analysis_config(None)
            .wrap_err("Failed to collect entry files")?;

        if analysis.entry_files.is_empty() {
            eprintln!("{} No entry files found to visualize", style("ℹ").blue());
            return Ok(());
        }

        let (report, graph) = ModuleAnalyzer::new(analysis)
            .analyze_graph(None)
            .wrap_err("Failed to build module graph")?;

        let renderer = GraphRenderer::new(config.highlight_cycles, config.group_by_directory);

        // Determine output destination
        let mut output_writer: Box<dyn Write> = if let Some(output_path) = config.output.as_ref()
        {
            Box::new(BufWriter::new(
                File::create(output_path)
                    .into_diagnostic()
                    .wrap_err_with(|| {
                        format!("Failed to create output file '{}'", output_path.display())
                    })?,
            ))
        } else {
            Box::new(io::stdout())
        };

        match config.format {
            GraphFormat::Ascii => {
                renderer
                    .render_ascii(&graph, &report, output_writer.as_mut())
                    .wrap_err("Failed to render ASCII graph")?;
            }
            GraphFormat::Mermaid => {
                renderer
                    .render_mermaid(&graph, &report, output_writer.as_mut())
                    .wrap_err("Failed to render Mermaid graph")?;
            }
            GraphFormat::Dot => {
                renderer
                    .render_dot(&graph, &report, output_writer.as_mut())
                    .wrap_err("Failed to render DOT graph")?;
            }
        }

        output_writer
            .flush()
            .into_diagnostic()
            .wrap_err("Failed to flush graph output")?;

        if let Some(output_path) = config.output {
            eprintln!(
                "{} Graph written to {}",
                style("✓").green(),
                style(output_path.display()).bold()
            );
        }

        Ok(())
    }
}
