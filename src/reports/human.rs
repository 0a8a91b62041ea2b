//! Human-readable console report generation

use std::fmt::Write;

use console::style;

use super::{ReportGenerator, describe_remediation};
use crate::analyzer::AnalysisReport;
use crate::core::SeverityTier;
use crate::error::RoundaboutError;
use crate::utils::string::{format_chain, pluralize};

pub struct HumanReportGenerator {
    max_cycles: Option<usize>,
}

impl HumanReportGenerator {
    pub fn new(max_cycles: Option<usize>) -> Self {
        Self { max_cycles }
    }
}

fn severity_label(severity: SeverityTier) -> String {
    match severity {
        SeverityTier::Infrastructure => style("INFRASTRUCTURE").red().bold().to_string(),
        SeverityTier::Aggregator => style("AGGREGATOR").magenta().bold().to_string(),
        SeverityTier::Standard => style("STANDARD").yellow().bold().to_string(),
    }
}

impl ReportGenerator for HumanReportGenerator {
    fn generate_report(&self, report: &AnalysisReport) -> Result<String, RoundaboutError> {
        let mut output = String::new();

        if !report.has_cycles() {
            write!(
                output,
                "\n{} No dependency cycles detected across {} {}.\n",
                style("✅").green().bold(),
                report.module_count(),
                pluralize("module", report.module_count())
            )?;
            self.write_diagnostics(report, &mut output)?;
            return Ok(output);
        }

        write!(
            output,
            "\n{} Found {} dependency {}:\n\n",
            style("❌").red().bold(),
            style(report.cycle_count()).red().bold(),
            pluralize("cycle", report.cycle_count())
        )?;

        let total_cycles = report.cycle_count();
        let limit = self.max_cycles.unwrap_or(total_cycles);

        for (i, classified) in report.cycles().iter().take(limit).enumerate() {
            let names: Vec<String> = classified
                .cycle
                .modules()
                .iter()
                .map(|m| report.display(m))
                .collect();

            writeln!(
                output,
                "{} Cycle #{} [{}]",
                style("🔄").yellow(),
                i + 1,
                severity_label(classified.severity)
            )?;
            writeln!(output, "  {}", style(format_chain(&names)).bold())?;

            if !classified.remediation.aggregators.is_empty() {
                let aggregators: Vec<String> = classified
                    .remediation
                    .aggregators
                    .iter()
                    .map(|m| report.display(m))
                    .collect();
                writeln!(
                    output,
                    "  {} Re-export {}: {}",
                    style("📦").blue(),
                    pluralize("module", aggregators.len()),
                    aggregators.join(", ")
                )?;
            }

            let (from, to) = &classified.remediation.remove_edge;
            writeln!(
                output,
                "  {} Break at: {} → {}",
                style("✂").cyan(),
                style(report.display(from)).yellow(),
                style(report.display(to)).yellow()
            )?;
            writeln!(
                output,
                "  {} {}",
                style("💡").yellow(),
                describe_remediation(report, &classified.remediation)
            )?;
            writeln!(output)?;
        }

        if limit < total_cycles {
            writeln!(
                output,
                "{} Showing {} of {} cycles. Use --max-cycles to see more.",
                style("ℹ️").blue(),
                style(limit).yellow(),
                style(total_cycles).yellow()
            )?;
        }

        let counts = report.count_by_severity();
        let summary: Vec<String> = counts
            .iter()
            .rev()
            .map(|(severity, count)| format!("{count} {severity}"))
            .collect();
        writeln!(
            output,
            "{} By severity: {}",
            style("📊").blue(),
            summary.join(", ")
        )?;

        self.write_diagnostics(report, &mut output)?;

        Ok(output)
    }
}

impl HumanReportGenerator {
    fn write_diagnostics(
        &self,
        report: &AnalysisReport,
        output: &mut String,
    ) -> Result<(), RoundaboutError> {
        if report.diagnostics().is_empty() {
            return Ok(());
        }

        writeln!(
            output,
            "\n{} {} {}:",
            style("⚠").yellow().bold(),
            report.diagnostics().len(),
            pluralize("diagnostic", report.diagnostics().len())
        )?;
        for diagnostic in report.diagnostics() {
            writeln!(
                output,
                "  {} [{}] {}",
                style("•").dim(),
                style(diagnostic.kind).dim(),
                diagnostic.detail
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use predicates::prelude::*;

    use super::*;
    use crate::reports::test_support::{empty_report, sample_report};

    fn plain(text: String) -> String {
        console::strip_ansi_codes(&text).into_owned()
    }

    #[test]
    fn test_no_cycles() {
        let output = plain(
            HumanReportGenerator::new(None)
                .generate_report(&empty_report())
                .unwrap(),
        );
        assert!(predicate::str::contains("No dependency cycles detected across 1 module").eval(&output));
    }

    #[test]
    fn test_cycles_with_remediation() {
        let output = plain(
            HumanReportGenerator::new(None)
                .generate_report(&sample_report())
                .unwrap(),
        );

        assert!(predicate::str::contains("Found 2 dependency cycles").eval(&output));
        assert!(predicate::str::contains("Cycle #1 [STANDARD]").eval(&output));
        assert!(predicate::str::contains("src/a.ts → src/b.ts → src/a.ts").eval(&output));
        assert!(predicate::str::contains("Cycle #2 [AGGREGATOR]").eval(&output));
        assert!(predicate::str::contains("Re-export module: ui/index.ts").eval(&output));
        assert!(predicate::str::contains("Break at: ui/Button.tsx → ui/index.ts").eval(&output));
        assert!(predicate::str::contains("import ui/Modal.tsx directly instead").eval(&output));
        assert!(predicate::str::contains("1 aggregator, 1 standard").eval(&output));
        assert!(predicate::str::contains("[extraction-failed] invalid UTF-8").eval(&output));
    }

    #[test]
    fn test_max_cycles_limits_output() {
        let output = plain(
            HumanReportGenerator::new(Some(1))
                .generate_report(&sample_report())
                .unwrap(),
        );

        assert!(predicate::str::contains("Cycle #1").eval(&output));
        assert!(predicate::str::contains("Cycle #2").not().eval(&output));
        assert!(predicate::str::contains("Showing 1 of 2 cycles").eval(&output));
    }
}
