//! `scanflow config`: show the effective configuration or write a starter
//! file.

use anyhow::{Context as _, Result};

use scanflow_config::{apply_all_defaults, write_config, ScanFlowConfig};

use crate::context::Context;
use crate::terminal_output::{note_info, note_success, note_warn};

pub async fn show(ctx: &Context) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(analysis) = config.analysis.as_mut() {
        if analysis.api_key.is_some() {
            analysis.api_key = Some("[REDACTED]".to_string());
        }
    }

    note_info(&format!("Config file: {}", ctx.config_path.display()));
    note_info(&format!("Document store: {}", ctx.blob_path().display()));
    if ctx.config.analysis().resolved_api_key().is_none() {
        note_warn("No API key found; scans will fail until one is configured");
    }
    let yaml = serde_yaml::to_string(&config).context("Failed to render config")?;
    print!("{yaml}");
    Ok(())
}

/// Write a config file holding every default, unless one exists. The API
/// key is left out so it keeps coming from the environment.
pub async fn init(ctx: &Context) -> Result<()> {
    if ctx.config_path.exists() {
        note_warn(&format!("{} already exists", ctx.config_path.display()));
        return Ok(());
    }
    let config = apply_all_defaults(ScanFlowConfig::default());
    write_config(&config, &ctx.config_path).await?;
    note_success(&format!("Wrote {}", ctx.config_path.display()));
    Ok(())
}
