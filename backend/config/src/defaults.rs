//! Config defaults: fills unset fields of a parsed config.

use crate::schema::{AnalysisConfig, LoggingConfig, ScanFlowConfig, SignatureConfig};

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 60;

/// Signature surface size in pixels.
pub const DEFAULT_SIGNATURE_WIDTH: u32 = 500;
pub const DEFAULT_SIGNATURE_HEIGHT: u32 = 250;
pub const DEFAULT_SIGNATURE_STROKE_WIDTH: f32 = 3.0;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ScanFlowConfig) -> ScanFlowConfig {
    let config = apply_analysis_defaults(config);
    let config = apply_signature_defaults(config);
    apply_logging_defaults(config)
}

fn apply_analysis_defaults(mut config: ScanFlowConfig) -> ScanFlowConfig {
    let analysis = config.analysis.get_or_insert_with(AnalysisConfig::default);
    analysis
        .provider
        .get_or_insert_with(|| DEFAULT_PROVIDER.to_string());
    analysis.model.get_or_insert_with(|| DEFAULT_MODEL.to_string());
    analysis
        .base_url
        .get_or_insert_with(|| DEFAULT_BASE_URL.to_string());
    analysis
        .timeout_secs
        .get_or_insert(DEFAULT_ANALYSIS_TIMEOUT_SECS);
    config
}

fn apply_signature_defaults(mut config: ScanFlowConfig) -> ScanFlowConfig {
    let signature = config.signature.get_or_insert_with(SignatureConfig::default);
    signature.width.get_or_insert(DEFAULT_SIGNATURE_WIDTH);
    signature.height.get_or_insert(DEFAULT_SIGNATURE_HEIGHT);
    signature
        .stroke_width
        .get_or_insert(DEFAULT_SIGNATURE_STROKE_WIDTH);
    config
}

fn apply_logging_defaults(mut config: ScanFlowConfig) -> ScanFlowConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}
