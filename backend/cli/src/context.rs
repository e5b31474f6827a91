//! Wires configuration into a ready [`ScannerApp`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use scanflow_app::ScannerApp;
use scanflow_config::{config_dir, config_file_path, load_and_prepare, ScanFlowConfig};
use scanflow_signature::{SignatureSurface, StrokeStyle};
use scanflow_store::{default_blob_path, FileBlobStore};
use scanflow_understanding::GeminiAnalyzer;

pub struct Context {
    pub config_path: PathBuf,
    pub config: ScanFlowConfig,
}

impl Context {
    /// Load config from `path`, or the default location.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config_file_path(&config_dir()));
        let config = load_and_prepare(&config_path).await?;
        Ok(Self { config_path, config })
    }

    pub fn blob_path(&self) -> PathBuf {
        self.config.storage().path.unwrap_or_else(default_blob_path)
    }

    /// Build the app. The analyzer is created even without an API key so
    /// read-only commands work; `scan` checks for the key itself.
    pub fn app(&self) -> Result<ScannerApp> {
        let analysis = self.config.analysis();
        if analysis.provider() != "gemini" {
            bail!("Unsupported analysis provider '{}'", analysis.provider());
        }
        let analyzer = GeminiAnalyzer::new(analysis.resolved_api_key().unwrap_or_default())
            .with_model(analysis.model())
            .with_base_url(analysis.base_url())
            .with_timeout(analysis.timeout());

        let blob_path = self.blob_path();
        info!(blob = %blob_path.display(), model = analysis.model(), "Opening document store");
        Ok(ScannerApp::new(
            Arc::new(FileBlobStore::new(blob_path)),
            Arc::new(analyzer),
        ))
    }

    /// An empty signature surface sized and styled per config.
    pub fn signature_surface(&self) -> SignatureSurface {
        let signature = self.config.signature();
        SignatureSurface::with_style(
            signature.width(),
            signature.height(),
            StrokeStyle::with_width(signature.stroke_width()),
        )
    }
}
