//! ScanFlow runtime configuration schema.
//!
//! Every field is optional on disk; `defaults::apply_all_defaults` fills in
//! the gaps after loading and the accessors fall back to the same defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_ANALYSIS_TIMEOUT_SECS, DEFAULT_BASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_MODEL,
    DEFAULT_PROVIDER, DEFAULT_SIGNATURE_HEIGHT, DEFAULT_SIGNATURE_STROKE_WIDTH,
    DEFAULT_SIGNATURE_WIDTH,
};

/// Environment variables consulted, in order, when no API key is configured.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Root configuration for ScanFlow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFlowConfig {
    /// Remote document analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisConfig>,

    /// Where the document blob lives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    /// Signature surface geometry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<SignatureConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

impl ScanFlowConfig {
    pub fn analysis(&self) -> AnalysisConfig {
        self.analysis.clone().unwrap_or_default()
    }

    pub fn storage(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    pub fn signature(&self) -> SignatureConfig {
        self.signature.clone().unwrap_or_default()
    }

    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Analysis provider; only `gemini` is supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Upper bound on one analysis call, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AnalysisConfig {
    pub fn provider(&self) -> &str {
        self.provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_ANALYSIS_TIMEOUT_SECS))
    }

    /// Configured key, else the first non-empty of `GEMINI_API_KEY`, `API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|name| lookup(name))
                    .find(|k| !k.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Document blob file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
}

impl SignatureConfig {
    pub fn width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_SIGNATURE_WIDTH)
    }

    pub fn height(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_SIGNATURE_HEIGHT)
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width.unwrap_or(DEFAULT_SIGNATURE_STROKE_WIDTH)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for the rolling NDJSON log; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Emit console logs as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn json(&self) -> bool {
        self.json.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
analysis:
  apiKey: abc
  timeoutSecs: 15
signature:
  strokeWidth: 2.5
logging:
  level: debug
  dir: /var/log/scanflow
"#;
        let config: ScanFlowConfig = serde_yaml::from_str(yaml).unwrap();
        let analysis = config.analysis();
        assert_eq!(analysis.api_key.as_deref(), Some("abc"));
        assert_eq!(analysis.timeout(), Duration::from_secs(15));
        assert_eq!(analysis.model(), DEFAULT_MODEL);
        assert_eq!(config.signature().stroke_width(), 2.5);
        assert_eq!(config.signature().width(), DEFAULT_SIGNATURE_WIDTH);
        assert_eq!(config.logging().level(), "debug");
        assert_eq!(config.logging().dir, Some(PathBuf::from("/var/log/scanflow")));
    }

    #[test]
    fn api_key_falls_back_to_environment_in_order() {
        let analysis = AnalysisConfig::default();
        let env = |name: &str| match name {
            "GEMINI_API_KEY" => Some(String::new()),
            "API_KEY" => Some("from-api-key".to_string()),
            _ => None,
        };
        assert_eq!(analysis.resolve_api_key_with(env).as_deref(), Some("from-api-key"));

        let configured = AnalysisConfig {
            api_key: Some("configured".into()),
            ..Default::default()
        };
        assert_eq!(configured.resolve_api_key_with(env).as_deref(), Some("configured"));
        assert_eq!(analysis.resolve_api_key_with(|_| None), None);
    }
}
