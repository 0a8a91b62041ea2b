//! GitHub Actions format report generation

use std::fmt::Write;

use super::{ReportGenerator, describe_remediation};
use crate::analyzer::AnalysisReport;
use crate::core::SeverityTier;
use crate::error::RoundaboutError;
use crate::utils::string::{format_chain, pluralize};

pub struct GitHubReportGenerator;

impl Default for GitHubReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubReportGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for GitHubReportGenerator {
    fn generate_report(&self, report: &AnalysisReport) -> Result<String, RoundaboutError> {
        let mut output = String::new();

        for diagnostic in report.diagnostics() {
            writeln!(
                output,
                "::notice title={}::{}",
                diagnostic.kind, diagnostic.detail
            )?;
        }

        if !report.has_cycles() {
            writeln!(
                output,
                "::notice title=Dependency Check::No module dependency cycles detected! ✅"
            )?;
            return Ok(output);
        }

        writeln!(
            output,
            "::error title=Dependency Cycles::Found {} module dependency {}",
            report.cycle_count(),
            pluralize("cycle", report.cycle_count())
        )?;

        for (i, classified) in report.cycles().iter().enumerate() {
            let names: Vec<String> = classified
                .cycle
                .modules()
                .iter()
                .map(|m| report.display(m))
                .collect();
            let level = match classified.severity {
                SeverityTier::Infrastructure => "error",
                SeverityTier::Aggregator | SeverityTier::Standard => "warning",
            };
            let (from, _) = &classified.remediation.remove_edge;

            writeln!(
                output,
                "::{} file={},title=Cycle {} ({})::{}",
                level,
                report.display(from),
                i + 1,
                classified.severity,
                format_chain(&names)
            )?;
            writeln!(
                output,
                "::notice file={},title=Remediation::{}",
                report.display(from),
                describe_remediation(report, &classified.remediation)
            )?;
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use predicates::prelude::*;

    use super::*;
    use crate::reports::test_support::{empty_report, sample_report};

    #[test]
    fn test_github_clean() {
        let output = GitHubReportGenerator::new()
            .generate_report(&empty_report())
            .unwrap();
        assert!(predicate::str::starts_with("::notice title=Dependency Check::").eval(&output));
    }

    #[test]
    fn test_github_annotations() {
        let output = GitHubReportGenerator::new()
            .generate_report(&sample_report())
            .unwrap();

        assert!(
            predicate::str::contains("::error title=Dependency Cycles::Found 2 module dependency cycles")
                .eval(&output)
        );
        assert!(
            predicate::str::contains(
                "::warning file=src/a.ts,title=Cycle 1 (standard)::src/a.ts → src/b.ts → src/a.ts"
            )
            .eval(&output)
        );
        assert!(predicate::str::contains("::notice title=extraction-failed::invalid UTF-8").eval(&output));
    }
}
