use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::error::SignatureError;
use crate::stroke::{draw_segment, Point, Stroke, StrokeStyle};

/// Default surface size, matching the signature dialog canvas.
pub const DEFAULT_WIDTH: u32 = 500;
pub const DEFAULT_HEIGHT: u32 = 250;

/// Fixed-size drawing surface that tracks pointer movement and rasterizes
/// strokes into a single flattened image.
///
/// Coordinates are surface-local; translating from device space is the
/// caller's job. Strokes are only drawn between `begin` and `end`, and
/// `extend` outside of a stroke is silently ignored so a pointer leaving and
/// re-entering the surface cannot corrupt the drawing.
pub struct SignatureSurface {
    canvas: RgbaImage,
    style: StrokeStyle,
    /// Last recorded point of the active stroke.
    last: Option<Point>,
}

impl SignatureSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_style(width, height, StrokeStyle::default())
    }

    pub fn with_style(width: u32, height: u32, style: StrokeStyle) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            style,
            last: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Start a new stroke at `point` without drawing anything.
    pub fn begin(&mut self, point: Point) {
        self.last = Some(point);
    }

    /// Draw from the last recorded point to `point` if a stroke is active.
    pub fn extend(&mut self, point: Point) {
        let Some(last) = self.last else { return };
        draw_segment(&mut self.canvas, last, point, &self.style);
        self.last = Some(point);
    }

    /// Terminate the current stroke.
    pub fn end(&mut self) {
        self.last = None;
    }

    pub fn is_drawing(&self) -> bool {
        self.last.is_some()
    }

    /// Erase everything and drop any active stroke.
    pub fn clear(&mut self) {
        let (w, h) = self.canvas.dimensions();
        self.canvas = RgbaImage::new(w, h);
        self.last = None;
    }

    pub fn is_blank(&self) -> bool {
        self.canvas.pixels().all(|p| p[3] == 0)
    }

    /// Replay recorded strokes. Each stroke is begun at its first point,
    /// extended through the rest, then ended.
    pub fn draw_strokes(&mut self, strokes: &[Stroke]) {
        for stroke in strokes {
            let Some((first, rest)) = stroke.split_first() else { continue };
            self.begin(*first);
            for point in rest {
                self.extend(*point);
            }
            self.end();
        }
        debug!(strokes = strokes.len(), "Replayed signature strokes");
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Encode everything drawn so far as a PNG. A blank surface yields a
    /// fully transparent image.
    pub fn flatten(&self) -> Result<Vec<u8>, SignatureError> {
        let mut buf = Vec::new();
        self.canvas.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }

    /// The flattened image as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> Result<String, SignatureError> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(self.flatten()?)))
    }
}

impl Default for SignatureSurface {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl std::fmt::Debug for SignatureSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("style", &self.style)
            .field("drawing", &self.is_drawing())
            .finish()
    }
}
