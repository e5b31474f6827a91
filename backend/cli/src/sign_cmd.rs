//! `scanflow sign <id> --strokes <json|file>`: replay recorded strokes onto
//! a signature surface and attach it to the document.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use tokio::fs;
use uuid::Uuid;

use scanflow_signature::parse_strokes;

use crate::context::Context;
use crate::terminal_output::note_success;

pub async fn run(ctx: &Context, id: Uuid, strokes: &str, png: Option<&Path>) -> Result<()> {
    let json = read_strokes(strokes).await?;
    let strokes = parse_strokes(&json).context("Invalid stroke data")?;

    let mut surface = ctx.signature_surface();
    surface.draw_strokes(&strokes);
    if surface.is_blank() {
        bail!("Strokes left the signature surface blank");
    }

    if let Some(path) = png {
        let bytes = surface.flatten()?;
        fs::write(path, bytes)
            .await
            .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
    }

    let app = ctx.app()?;
    app.open(id).await?;
    app.sign_active(&surface).await?;
    note_success(&format!("Signed {id}"));
    Ok(())
}

/// `arg` is either inline JSON or a path to a JSON file.
async fn read_strokes(arg: &str) -> Result<String> {
    if arg.trim_start().starts_with('[') {
        return Ok(arg.to_string());
    }
    let path = PathBuf::from(arg);
    fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read strokes: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_inline_or_file_strokes() {
        let inline = r#"[[{"x":1,"y":1},{"x":5,"y":5}]]"#;
        assert_eq!(read_strokes(inline).await.unwrap(), inline);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strokes.json");
        std::fs::write(&path, inline).unwrap();
        assert_eq!(read_strokes(path.to_str().unwrap()).await.unwrap(), inline);

        assert!(read_strokes("/nonexistent/strokes.json").await.is_err());
    }
}
