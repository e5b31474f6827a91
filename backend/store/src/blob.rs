//! Blob store backends for the serialized document collection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use scanflow_core::BlobStore;

/// Name of the blob entry, kept from the browser storage key.
pub const BLOB_KEY: &str = "scanflow_docs";

/// Default blob location: `<data_dir>/scanflow/scanflow_docs.json`.
pub fn default_blob_path() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("scanflow");
    path.push(format!("{BLOB_KEY}.json"));
    path
}

/// A blob stored as a single JSON file, overwritten atomically.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Document blob does not exist yet");
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read document blob: {}", self.path.display()))?;
        Ok(Some(raw))
    }

    /// Write to a temp file, then rename over the blob.
    fn save(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create blob directory: {}", parent.display())
                })?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents.as_bytes())
            .with_context(|| format!("Failed to write temp blob: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to rename temp blob to: {}", self.path.display()))?;

        debug!(path = %self.path.display(), bytes = contents.len(), "Wrote document blob");
        Ok(())
    }
}

/// In-process blob, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    contents: Mutex<Option<String>>,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing contents, as if written by an earlier session.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            ..Self::default()
        }
    }

    /// A blob whose every write fails.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self) -> Result<Option<String>> {
        let guard = self
            .contents
            .lock()
            .map_err(|_| anyhow!("memory blob lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, contents: &str) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("memory blob is read-only"));
        }
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| anyhow!("memory blob lock poisoned"))?;
        *guard = Some(contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
