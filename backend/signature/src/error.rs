use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("failed to encode signature image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("invalid stroke data: {0}")]
    InvalidStrokes(#[from] serde_json::Error),
}
