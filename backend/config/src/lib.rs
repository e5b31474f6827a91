//! `scanflow-config`: ScanFlow runtime configuration.
//!
//! Provides:
//! - Typed config schema (analysis provider, storage, signature, logging)
//! - YAML read/write with an atomic replace and backup
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, load_raw_config, write_config};
pub use schema::{AnalysisConfig, LoggingConfig, ScanFlowConfig, SignatureConfig, StorageConfig};
pub use validation::{validate, validate_with_env, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load a config file, substitute env vars, apply defaults and validate.
///
/// Warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<ScanFlowConfig> {
    let raw = load_raw_config(path).await?;
    let value = resolve_env_vars(&raw).context("Failed to resolve env vars in config")?;

    let config: ScanFlowConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        bail!("{} config error(s); first: {first}", report.errors.len());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepares_defaults_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_and_prepare(&config_file_path(dir.path())).await.unwrap();
        assert_eq!(config.analysis().model(), defaults::DEFAULT_MODEL);
        assert_eq!(config.signature.and_then(|s| s.width), Some(500));
    }

    #[tokio::test]
    async fn invalid_config_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "signature:\n  height: 0\n").unwrap();
        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(err.to_string().contains("signature"));
    }

    #[tokio::test]
    async fn unresolved_env_reference_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "analysis:\n  apiKey: ${SCANFLOW_TEST_UNSET_VAR}\n").unwrap();
        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("SCANFLOW_TEST_UNSET_VAR"));
    }
}
