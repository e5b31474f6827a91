//! `scanflow scan <image>`: capture, analyze, store.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use tokio::fs;

use scanflow_core::EncodedImage;

use crate::context::Context;
use crate::documents_cmd::print_record;
use crate::terminal_output::{note_error, note_info, note_success};

pub async fn run(ctx: &Context, image_path: &Path) -> Result<()> {
    if ctx.config.analysis().resolved_api_key().is_none() {
        bail!(
            "No API key configured. Set analysis.apiKey in {} or export GEMINI_API_KEY",
            ctx.config_path.display()
        );
    }

    let bytes = fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read image: {}", image_path.display()))?;
    let image = EncodedImage::from_bytes(&bytes)?;

    let app = ctx.app()?;
    app.start_capture().await?;
    note_info("AI is analyzing your scan...");

    match app.submit_capture(image).await {
        Ok(record) => {
            note_success(&format!("Stored \"{}\" ({})", record.title, record.category));
            print_record(&record);
            Ok(())
        }
        Err(e) => {
            if let Some(notice) = app.take_notice().await {
                note_error(&notice);
            }
            Err(e.into())
        }
    }
}
