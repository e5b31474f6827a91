//! Document understanding: OCR, classification, and summarization of
//! captured images behind the [`DocumentAnalyzer`](scanflow_core::DocumentAnalyzer)
//! seam.

pub mod mock;
pub mod schema;
pub mod vision;

pub use mock::MockAnalyzer;
pub use schema::{parse_analysis, response_schema, ANALYSIS_INSTRUCTION};
pub use vision::{GeminiAnalyzer, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
