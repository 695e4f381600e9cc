//! Export actions: capture the preview surface and turn it into files or
//! clipboard content.
//!
//! Capture itself is an external concern behind [`CaptureBackend`]; this
//! module owns the encoding (lossless PNG, quality-0.9 JPEG), the fixed
//! output names, and the single-slot busy gate that serializes export
//! actions. A failed export releases the gate and never touches the live
//! surface.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage, RgbaImage};
use log::debug;

use crate::surface::{Color, PreviewSurface};
use crate::{Error, Result};

/// Fixed output name for the lossless variant
pub const PNG_FILE_NAME: &str = "fake-tweet-repixify.png";
/// Fixed output name for the lossy variant
pub const JPEG_FILE_NAME: &str = "fake-tweet-repixify.jpeg";
/// JPEG quality (0.9 on the encoder's 0..=100 scale)
pub const JPEG_QUALITY: u8 = 90;

/// Options handed to the capture backend.
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Pixel density multiplier over the surface's natural size
    pub scale: f32,
    /// Backdrop; `None` keeps the capture transparent
    pub background: Option<Color>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: None,
        }
    }
}

/// A raw RGBA capture of the rendered surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl Bitmap {
    /// A uniformly filled bitmap.
    pub fn filled(width: u32, height: u32, rgba: (u8, u8, u8, u8)) -> Self {
        let (r, g, b, a) = rgba;
        let mut buffer = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            buffer.extend_from_slice(&[r, g, b, a]);
        }
        Self {
            width,
            height,
            rgba: buffer,
        }
    }
}

/// The external export-surface contract: snapshot the rendered surface
/// into a bitmap at the requested density.
pub trait CaptureBackend {
    fn capture(&self, surface: &PreviewSurface, options: &CaptureOptions) -> Result<Bitmap>;
}

/// Capture backend that produces an empty (transparent) bitmap of the
/// right dimensions. Used in tests and as a safe default for hosts without
/// a rasterizer.
pub struct NoopCapture {
    width: u32,
    height: u32,
}

impl NoopCapture {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl CaptureBackend for NoopCapture {
    fn capture(&self, _surface: &PreviewSurface, options: &CaptureOptions) -> Result<Bitmap> {
        let width = (self.width as f32 * options.scale).round() as u32;
        let height = (self.height as f32 * options.scale).round() as u32;
        Ok(Bitmap::filled(width.max(1), height.max(1), (0, 0, 0, 0)))
    }
}

/// Destination for the clipboard export variant.
pub trait ClipboardSink {
    /// Write encoded PNG bytes as an image object.
    fn write_image(&mut self, png: &[u8]) -> Result<()>;
}

/// Clipboard sink for hosts without clipboard support.
#[derive(Debug, Default)]
pub struct NoopClipboard;

impl ClipboardSink for NoopClipboard {
    fn write_image(&mut self, _png: &[u8]) -> Result<()> {
        Err(Error::ClipboardUnsupported)
    }
}

/// In-memory clipboard sink, used in tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    image: Option<Vec<u8>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently written image, if any.
    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_image(&mut self, png: &[u8]) -> Result<()> {
        self.image = Some(png.to_vec());
        Ok(())
    }
}

/// One requested export action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRequest {
    /// Lossless raster saved as [`PNG_FILE_NAME`]
    SavePng,
    /// Quality-0.9 raster saved as [`JPEG_FILE_NAME`]
    SaveJpeg,
    /// Lossless raster written to the clipboard as an image object
    CopyToClipboard,
}

/// What an export action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Copied,
}

/// Serializes export actions through a single-slot busy gate: a request
/// arriving while another is in flight fails fast with
/// [`Error::ExportBusy`] and leaves the first untouched.
#[derive(Debug, Default)]
pub struct Exporter {
    in_flight: AtomicBool,
}

/// Releases the busy gate when the export action finishes, on success or
/// failure alike.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self) -> Result<BusyGuard<'_>> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(Error::ExportBusy);
        }
        Ok(BusyGuard {
            flag: &self.in_flight,
        })
    }

    /// Run one export action: capture the surface through the backend,
    /// encode, and hand the result to its destination.
    pub fn run(
        &self,
        surface: &PreviewSurface,
        backend: &dyn CaptureBackend,
        options: &CaptureOptions,
        request: ExportRequest,
        out_dir: &Path,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<ExportOutcome> {
        let _gate = self.begin()?;

        let bitmap = backend.capture(surface, options)?;
        debug!(
            "Captured {}x{} bitmap for {:?}",
            bitmap.width, bitmap.height, request
        );

        match request {
            ExportRequest::SavePng => {
                let path = out_dir.join(PNG_FILE_NAME);
                std::fs::write(&path, encode_png(&bitmap)?)?;
                Ok(ExportOutcome::Saved(path))
            }
            ExportRequest::SaveJpeg => {
                let path = out_dir.join(JPEG_FILE_NAME);
                std::fs::write(&path, encode_jpeg(&bitmap, JPEG_QUALITY)?)?;
                Ok(ExportOutcome::Saved(path))
            }
            ExportRequest::CopyToClipboard => {
                clipboard.write_image(&encode_png(&bitmap)?)?;
                Ok(ExportOutcome::Copied)
            }
        }
    }
}

/// Encode a bitmap as lossless PNG.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>> {
    let img = RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.rgba.clone())
        .ok_or_else(|| Error::CaptureError("Bitmap buffer does not match its dimensions".to_string()))?;

    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| Error::CaptureError(format!("PNG encode failed: {}", e)))?;
    Ok(cursor.into_inner())
}

/// Encode a bitmap as JPEG at the given quality, compositing transparent
/// pixels over white since JPEG has no alpha channel.
pub fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>> {
    if bitmap.rgba.len() != (bitmap.width * bitmap.height * 4) as usize {
        return Err(Error::CaptureError(
            "Bitmap buffer does not match its dimensions".to_string(),
        ));
    }

    let mut rgb = RgbImage::new(bitmap.width, bitmap.height);
    for (i, pixel) in rgb.pixels_mut().enumerate() {
        let src = &bitmap.rgba[i * 4..i * 4 + 4];
        let alpha = src[3] as u16;
        for c in 0..3 {
            let blended = (src[c] as u16 * alpha + 255 * (255 - alpha)) / 255;
            pixel.0[c] = blended as u8;
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| Error::CaptureError(format!("JPEG encode failed: {}", e)))?;
    Ok(cursor.into_inner())
}
