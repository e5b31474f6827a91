//! Freehand signature capture.
//!
//! A [`SignatureSurface`] records pointer strokes on a fixed-size raster and
//! flattens them into a PNG that can be attached to a document.

pub mod error;
pub mod stroke;
pub mod surface;

pub use error::SignatureError;
pub use stroke::{Point, Stroke, StrokeStyle};
pub use surface::{SignatureSurface, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Parse recorded strokes from JSON: an array of polylines, each an array of
/// `{"x": .., "y": ..}` points.
pub fn parse_strokes(json: &str) -> Result<Vec<Stroke>, SignatureError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stroke_json() {
        let strokes = parse_strokes(r#"[[{"x":1,"y":2},{"x":3.5,"y":4}],[]]"#).unwrap();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0][1], Point::new(3.5, 4.0));
        assert!(strokes[1].is_empty());
    }

    #[test]
    fn rejects_malformed_stroke_json() {
        assert!(matches!(
            parse_strokes(r#"[{"x":1}]"#),
            Err(SignatureError::InvalidStrokes(_))
        ));
    }
}
