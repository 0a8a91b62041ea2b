//! Check command configuration

use crate::cli::OutputFormat;
use crate::config::common::CommonAnalysisConfig;
use crate::error::RoundaboutError;

/// Configuration for the inspect command
///
/// This struct contains all options for detecting and reporting module
/// dependency cycles.
#[derive(Debug, Clone)]
pub struct CheckCyclesConfig {
    /// Engine settings and the paths to collect entry files from
    pub analysis: CommonAnalysisConfig,
    /// Output format for the report
    pub format: OutputFormat,
    /// Whether to exit with error code if cycles are found
    pub error_on_cycles: bool,
    /// Maximum number of cycles to report (None = all)
    pub max_cycles: Option<usize>,
}

impl CheckCyclesConfig {
    pub fn builder() -> CheckCyclesConfigBuilder {
        CheckCyclesConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct CheckCyclesConfigBuilder {
    analysis: Option<CommonAnalysisConfig>,
    format: Option<OutputFormat>,
    error_on_cycles: Option<bool>,
    max_cycles: Option<Option<usize>>,
}

impl CheckCyclesConfigBuilder {
    pub fn new() -> Self {
        Self {
            analysis: None,
            format: None,
            error_on_cycles: None,
            max_cycles: None,
        }
    }

    pub fn with_analysis(mut self, analysis: CommonAnalysisConfig) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_error_on_cycles(mut self, error_on_cycles: bool) -> Self {
        self.error_on_cycles = Some(error_on_cycles);
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<usize>) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }
}

impl crate::common::ConfigBuilder for CheckCyclesConfigBuilder {
    type Config = CheckCyclesConfig;

    fn build(self) -> Result<Self::Config, RoundaboutError> {
        Ok(CheckCyclesConfig {
            analysis: self
                .analysis
                .ok_or_else(|| RoundaboutError::ConfigurationError {
                    message: "Missing required field: analysis".to_string(),
                })?,
            format: self
                .format
                .ok_or_else(|| RoundaboutError::ConfigurationError {
                    message: "Missing required field: format".to_string(),
                })?,
            error_on_cycles: self.error_on_cycles.unwrap_or(false),
            max_cycles: self.max_cycles.unwrap_or(None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ConfigBuilder;
    use crate::config::AnalysisConfig;

    #[test]
    fn test_missing_format_is_rejected() {
        let err = CheckCyclesConfig::builder()
            .with_analysis(CommonAnalysisConfig::new(vec![], AnalysisConfig::default()))
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("Missing required field: format"));
    }

    #[test]
    fn test_optional_fields_default() {
        let config = CheckCyclesConfig::builder()
            .with_analysis(CommonAnalysisConfig::new(vec![], AnalysisConfig::default()))
            .with_format(OutputFormat::Json)
            .build()
            .unwrap();

        assert!(!config.error_on_cycles);
        assert_eq!(config.max_cycles, None);
    }
}
