//! Config validation with user-friendly error messages.

use crate::schema::ScanFlowConfig;
use thiserror::Error;

/// Analysis providers this build knows how to construct.
pub const SUPPORTED_PROVIDERS: [&str; 1] = ["gemini"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate against the process environment.
pub fn validate(config: &ScanFlowConfig) -> ValidationReport {
    validate_with_env(config, |name| std::env::var(name).ok())
}

/// Validate, resolving env-provided API keys through `lookup`.
pub fn validate_with_env(
    config: &ScanFlowConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_analysis(config, &lookup, &mut report);
    validate_signature(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_analysis(
    config: &ScanFlowConfig,
    lookup: &impl Fn(&str) -> Option<String>,
    report: &mut ValidationReport,
) {
    let analysis = config.analysis();
    let provider = analysis.provider();
    if !SUPPORTED_PROVIDERS.contains(&provider) {
        report.error(
            "analysis.provider",
            format!("Unknown provider '{provider}'. Use 'gemini'"),
        );
    }
    if analysis.model().trim().is_empty() {
        report.error("analysis.model", "Model cannot be empty");
    }
    if analysis.timeout_secs == Some(0) {
        report.error("analysis.timeoutSecs", "timeoutSecs must be >= 1");
    }
    if analysis.resolve_api_key_with(lookup).is_none() {
        report.warn(
            "analysis.apiKey",
            "No API key configured and GEMINI_API_KEY / API_KEY are unset; scans will fail",
        );
    }
}

fn validate_signature(config: &ScanFlowConfig, report: &mut ValidationReport) {
    let signature = config.signature();
    if signature.width() == 0 || signature.height() == 0 {
        report.error("signature", "Surface width and height must be > 0");
    }
    let stroke = signature.stroke_width();
    if !(stroke.is_finite() && stroke > 0.0) {
        report.error("signature.strokeWidth", "strokeWidth must be > 0");
    }
}

fn validate_logging(config: &ScanFlowConfig, report: &mut ValidationReport) {
    let level = config.logging().level().to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        report.warn(
            "logging.level",
            format!("Unrecognized level '{level}'; RUST_LOG-style directives are passed through"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AnalysisConfig, SignatureConfig};

    fn with_key(_: &str) -> Option<String> {
        Some("key".into())
    }

    #[test]
    fn default_config_is_valid() {
        let report = validate_with_env(&ScanFlowConfig::default(), with_key);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_api_key_is_a_warning() {
        let report = validate_with_env(&ScanFlowConfig::default(), |_| None);
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].path, "analysis.apiKey");
    }

    #[test]
    fn rejects_bad_values() {
        let config = ScanFlowConfig {
            analysis: Some(AnalysisConfig {
                provider: Some("openai".into()),
                timeout_secs: Some(0),
                model: Some(" ".into()),
                ..Default::default()
            }),
            signature: Some(SignatureConfig {
                width: Some(0),
                stroke_width: Some(-1.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate_with_env(&config, with_key);
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "analysis.provider",
                "analysis.model",
                "analysis.timeoutSecs",
                "signature",
                "signature.strokeWidth"
            ]
        );
    }
}
