//! Spotlight command configuration

use crate::cli::OutputFormat;
use crate::config::common::CommonAnalysisConfig;
use crate::error::RoundaboutError;

#[derive(Debug, Clone)]
pub struct SpotlightConfig {
    /// Path fragment a cycle member must contain
    pub module: String,
    pub analysis: CommonAnalysisConfig,
    pub format: OutputFormat,
    pub error_on_cycles: bool,
    pub max_cycles: Option<usize>,
}

impl SpotlightConfig {
    pub fn builder() -> SpotlightConfigBuilder {
        SpotlightConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct SpotlightConfigBuilder {
    module: Option<String>,
    analysis: Option<CommonAnalysisConfig>,
    format: Option<OutputFormat>,
    error_on_cycles: bool,
    max_cycles: Option<usize>,
}

impl SpotlightConfigBuilder {
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
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
        self.error_on_cycles = error_on_cycles;
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<usize>) -> Self {
        self.max_cycles = max_cycles;
        self
    }
}

impl crate::common::ConfigBuilder for SpotlightConfigBuilder {
    type Config = SpotlightConfig;

    fn build(self) -> Result<Self::Config, RoundaboutError> {
        let module = self
            .module
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| RoundaboutError::ConfigurationError {
                message: "Missing required field: module".to_string(),
            })?;

        Ok(SpotlightConfig {
            module,
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
            error_on_cycles: self.error_on_cycles,
            max_cycles: self.max_cycles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ConfigBuilder;
    use crate::config::AnalysisConfig;

    #[test]
    fn test_blank_module_is_rejected() {
        let err = SpotlightConfig::builder()
            .with_module("  ")
            .with_analysis(CommonAnalysisConfig::new(vec![], AnalysisConfig::default()))
            .with_format(OutputFormat::Human)
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("module"));
    }
}
