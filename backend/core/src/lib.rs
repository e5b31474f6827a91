pub mod error;
pub mod image;
pub mod traits;
pub mod types;

pub use error::{AnalysisError, NavigationError, ScanError, StoreError};
pub use image::{sniff_image_mime, EncodedImage};
pub use traits::{BlobStore, DocumentAnalyzer, RecordIndex};
pub use types::{Analysis, Category, DocumentRecord, DocumentStatus, NavigationState, View};
