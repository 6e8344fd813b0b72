//! Evidence collected before export: the evaluator's name, a still photo and a
//! hand-drawn signature.
//!
//! Capture devices are capabilities supplied by the caller. The core only
//! needs an opaque image from the camera and an "is empty" predicate from the
//! signature surface, so sessions can be driven without hardware.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("the evaluator's full name is required")]
    MissingName,
    #[error("the evaluation must be signed")]
    EmptySignature,
    #[error("a photo must be captured before finalizing")]
    MissingPhoto,
    #[error("image data is empty")]
    EmptyImage,
    #[error("malformed image data URL: {0}")]
    InvalidDataUrl(&'static str),
    #[error("unsupported image type '{0}'")]
    UnsupportedImage(String),
    #[error("image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image could not be processed: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    Png,
    Jpeg,
}

impl ImageEncoding {
    pub fn mime(self) -> mime::Mime {
        match self {
            Self::Png => mime::IMAGE_PNG,
            Self::Jpeg => mime::IMAGE_JPEG,
        }
    }

    fn from_mime(value: &str) -> Option<Self> {
        let parsed: mime::Mime = value.parse().ok()?;
        if parsed.type_() != mime::IMAGE {
            return None;
        }
        if parsed.subtype() == mime::PNG {
            Some(Self::Png)
        } else if parsed.subtype() == mime::JPEG {
            Some(Self::Jpeg)
        } else {
            None
        }
    }
}

/// Encoded still image handed over by a capture device.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    encoding: ImageEncoding,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("encoding", &self.encoding)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ImageHandle {
    /// Sniffs the encoding from the payload.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EvidenceError> {
        if bytes.is_empty() {
            return Err(EvidenceError::EmptyImage);
        }
        let encoding = match image::guess_format(&bytes)? {
            image::ImageFormat::Png => ImageEncoding::Png,
            image::ImageFormat::Jpeg => ImageEncoding::Jpeg,
            other => return Err(EvidenceError::UnsupportedImage(format!("{other:?}"))),
        };
        Ok(Self { encoding, bytes })
    }

    /// Accepts `data:image/png;base64,...` and `data:image/jpeg;base64,...`.
    pub fn from_data_url(value: &str) -> Result<Self, EvidenceError> {
        let rest = value
            .trim()
            .strip_prefix("data:")
            .ok_or(EvidenceError::InvalidDataUrl("missing 'data:' scheme"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(EvidenceError::InvalidDataUrl("missing ',' separator"))?;
        let media_type = header
            .strip_suffix(";base64")
            .ok_or(EvidenceError::InvalidDataUrl("payload must be base64"))?;
        let encoding = ImageEncoding::from_mime(media_type)
            .ok_or_else(|| EvidenceError::UnsupportedImage(media_type.to_string()))?;

        let bytes = STANDARD.decode(payload.trim())?;
        if bytes.is_empty() {
            return Err(EvidenceError::EmptyImage);
        }
        Ok(Self { encoding, bytes })
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.encoding.mime(),
            STANDARD.encode(&self.bytes)
        )
    }

    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded RGB pixels with transparency flattened onto white.
    pub fn to_rgb_on_white(&self) -> Result<FlatImage, EvidenceError> {
        let rgba = image::load_from_memory(&self.bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for Rgba([r, g, b, a]) in rgba.pixels().copied() {
            let alpha = u32::from(a);
            for channel in [r, g, b] {
                let blended = (u32::from(channel) * alpha + 255 * (255 - alpha)) / 255;
                pixels.push(blended as u8);
            }
        }
        Ok(FlatImage {
            width,
            height,
            pixels,
        })
    }
}

/// 8-bit RGB raster, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Still-image source.
pub trait Camera {
    /// `None` when no frame is available.
    fn capture_image(&mut self) -> Option<ImageHandle>;
}

/// Camera that hands out a frame supplied up front (a file, an upload).
#[derive(Debug, Clone, Default)]
pub struct StillCamera {
    frame: Option<ImageHandle>,
}

impl StillCamera {
    pub fn new(frame: ImageHandle) -> Self {
        Self { frame: Some(frame) }
    }
}

impl Camera for StillCamera {
    fn capture_image(&mut self) -> Option<ImageHandle> {
        self.frame.clone()
    }
}

/// Drawing surface a signature is collected on.
pub trait SignatureSurface {
    fn is_empty(&self) -> bool;
    fn clear(&mut self);
    fn export_image(&self) -> Result<ImageHandle, EvidenceError>;
}

pub type Point = (f32, f32);

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Vector strokes rendered to a transparent PNG on export.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePad {
    width: u32,
    height: u32,
    strokes: Vec<Vec<Point>>,
}

impl StrokePad {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            strokes: Vec::new(),
        }
    }

    /// Points are clamped onto the canvas and non-finite ones discarded;
    /// strokes left without points are dropped.
    pub fn add_stroke(&mut self, points: Vec<Point>) {
        let (max_x, max_y) = ((self.width - 1) as f32, (self.height - 1) as f32);
        let points: Vec<Point> = points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| (x.clamp(0.0, max_x), y.clamp(0.0, max_y)))
            .collect();
        if !points.is_empty() {
            self.strokes.push(points);
        }
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    fn render(&self) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width, self.height);
        for stroke in &self.strokes {
            if let [only] = stroke.as_slice() {
                stamp(&mut canvas, *only);
                continue;
            }
            for segment in stroke.windows(2) {
                draw_segment(&mut canvas, segment[0], segment[1]);
            }
        }
        canvas
    }
}

impl Default for StrokePad {
    fn default() -> Self {
        Self::new(500, 200)
    }
}

impl SignatureSurface for StrokePad {
    fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    fn clear(&mut self) {
        self.strokes.clear();
    }

    fn export_image(&self) -> Result<ImageHandle, EvidenceError> {
        if self.is_empty() {
            return Err(EvidenceError::EmptySignature);
        }
        let canvas = self.render();
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ColorType::Rgba8,
        )?;
        Ok(ImageHandle {
            encoding: ImageEncoding::Png,
            bytes,
        })
    }
}

fn draw_segment(canvas: &mut RgbaImage, from: Point, to: Point) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        stamp(canvas, (from.0 + dx * t, from.1 + dy * t));
    }
}

/// 3x3 pen tip.
fn stamp(canvas: &mut RgbaImage, (x, y): Point) {
    let (cx, cy) = (x.round() as i64, y.round() as i64);
    for oy in -1..=1 {
        for ox in -1..=1 {
            let (px, py) = (cx + ox, cy + oy);
            if px >= 0 && py >= 0 && px < i64::from(canvas.width()) && py < i64::from(canvas.height())
            {
                canvas.put_pixel(px as u32, py as u32, INK);
            }
        }
    }
}

/// Signature delivered already rasterized. Blank when no pixel carries
/// visible, non-white ink.
#[derive(Debug, Clone, Default)]
pub struct ImageSignature {
    image: Option<ImageHandle>,
}

impl ImageSignature {
    pub fn from_image(image: ImageHandle) -> Result<Self, EvidenceError> {
        let rgba = image::load_from_memory(image.bytes())?.to_rgba8();
        let inked = rgba
            .pixels()
            .any(|Rgba([r, g, b, a])| *a > 0 && (*r < 240 || *g < 240 || *b < 240));
        Ok(Self {
            image: inked.then_some(image),
        })
    }
}

impl SignatureSurface for ImageSignature {
    fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    fn clear(&mut self) {
        self.image = None;
    }

    fn export_image(&self) -> Result<ImageHandle, EvidenceError> {
        self.image.clone().ok_or(EvidenceError::EmptySignature)
    }
}

/// Name, photo and signature authorizing an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceRecord {
    pub full_name: String,
    pub photo: ImageHandle,
    pub signature: ImageHandle,
}

impl EvidenceRecord {
    /// Checks run in order: name, signature, photo.
    pub fn collect(
        full_name: &str,
        photo: Option<&ImageHandle>,
        signature: &dyn SignatureSurface,
    ) -> Result<Self, EvidenceError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(EvidenceError::MissingName);
        }
        if signature.is_empty() {
            return Err(EvidenceError::EmptySignature);
        }
        let photo = photo.cloned().ok_or(EvidenceError::MissingPhoto)?;
        let signature = signature.export_image()?;

        Ok(Self {
            full_name: full_name.to_string(),
            photo,
            signature,
        })
    }
}
