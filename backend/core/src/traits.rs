use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::image::EncodedImage;
use crate::types::Analysis;

/// Remote OCR / classification / summarization of a captured image.
///
/// One logical call per image with no partial results. Implementations do
/// not retry; retry policy belongs to the caller.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Provider name (e.g., "gemini", "mock").
    fn name(&self) -> &str;

    /// Analyze a captured image. Categories outside the closed set are
    /// rejected with `AnalysisError::UnknownCategory`.
    async fn analyze(&self, image: &EncodedImage) -> Result<Analysis, AnalysisError>;
}

/// A single named entry holding the serialized document collection.
pub trait BlobStore: Send + Sync {
    /// Read the entry. `Ok(None)` when nothing has been written yet.
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the entry with `contents`.
    fn save(&self, contents: &str) -> Result<()>;
}

/// Existence check used to guard entry into the review screen.
pub trait RecordIndex {
    fn contains(&self, id: &Uuid) -> bool;
}
