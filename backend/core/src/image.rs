//! Encoded images carried between capture, analysis and storage.
//!
//! Images travel as data URLs (`data:image/jpeg;base64,...`), the same form
//! they are persisted in.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::ScanError;

/// A base64-encoded image with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    /// Base64 payload without the data URL prefix.
    pub data: String,
}

impl EncodedImage {
    /// Encode raw bytes, sniffing the MIME type from the magic number.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScanError> {
        let mime_type = sniff_image_mime(bytes)
            .ok_or_else(|| ScanError::InvalidImage("unrecognized image format".into()))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        })
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self, ScanError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| ScanError::InvalidImage("missing data: prefix".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ScanError::InvalidImage("missing payload separator".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| ScanError::InvalidImage("only base64 data URLs are supported".into()))?;
        if !mime_type.starts_with("image/") {
            return Err(ScanError::InvalidImage(format!("not an image: {mime_type}")));
        }
        if payload.is_empty() {
            return Err(ScanError::InvalidImage("empty payload".into()));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ScanError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| ScanError::InvalidImage(e.to_string()))
    }
}

/// Detect an image MIME type from its leading bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_image_mime(&PNG_MAGIC), Some("image/png"));
        assert_eq!(sniff_image_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_image_mime(b"%PDF-1.7"), None);
    }

    #[test]
    fn data_url_round_trips_bytes() {
        let image = EncodedImage::from_bytes(&PNG_MAGIC).unwrap();
        assert_eq!(image.mime_type, "image/png");

        let url = image.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = EncodedImage::from_data_url(&url).unwrap();
        assert_eq!(parsed.decode().unwrap(), PNG_MAGIC);
    }

    #[test]
    fn rejects_malformed_data_urls() {
        assert!(EncodedImage::from_data_url("image/jpeg;base64,AAAA").is_err());
        assert!(EncodedImage::from_data_url("data:image/jpeg;base64").is_err());
        assert!(EncodedImage::from_data_url("data:text/plain;base64,AAAA").is_err());
        assert!(EncodedImage::from_data_url("data:image/jpeg,AAAA").is_err());
        assert!(EncodedImage::from_data_url("data:image/jpeg;base64,").is_err());
    }

    #[test]
    fn rejects_unknown_bytes() {
        assert!(matches!(
            EncodedImage::from_bytes(b"hello"),
            Err(ScanError::InvalidImage(_))
        ));
    }
}
