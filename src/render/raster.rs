//! CPU rasterizer: turns paint commands into an RGBA bitmap.
//!
//! Implements the capture contract at the requested pixel density. Glyphs
//! are greeked (one block per character cell) so the output is fully
//! deterministic without a font stack. A broken inline image degrades to a
//! placeholder fill; it never aborts the capture.

use image::imageops::FilterType;
use log::warn;

use crate::assets::decode_data_uri;
use crate::export::{Bitmap, CaptureBackend, CaptureOptions};
use crate::render::layout::{layout_surface, CHAR_WIDTH, LINE_HEIGHT};
use crate::render::paint::{paint_surface, PaintCommand};
use crate::surface::PreviewSurface;
use crate::{Result, SurfaceSize};

/// The built-in software capture backend.
#[derive(Debug, Clone, Copy)]
pub struct SoftwareRaster {
    size: SurfaceSize,
}

impl SoftwareRaster {
    pub fn new(size: SurfaceSize) -> Self {
        Self { size }
    }
}

impl Default for SoftwareRaster {
    fn default() -> Self {
        Self::new(SurfaceSize::default())
    }
}

impl CaptureBackend for SoftwareRaster {
    fn capture(&self, surface: &PreviewSurface, options: &CaptureOptions) -> Result<Bitmap> {
        let nodes = layout_surface(surface, self.size);
        let commands = paint_surface(&nodes, surface.theme, self.size);
        Ok(rasterize(&commands, self.size, options))
    }
}

/// A pixel buffer under construction.
struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, rgba: (u8, u8, u8, u8)) {
        let x0 = x.max(0) as u32;
        let y0 = y.max(0) as u32;
        let x1 = ((x + width as i32).max(0) as u32).min(self.width);
        let y1 = ((y + height as i32).max(0) as u32).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                self.put(px, py, rgba);
            }
        }
    }

    fn put(&mut self, x: u32, y: u32, rgba: (u8, u8, u8, u8)) {
        let idx = ((y * self.width + x) * 4) as usize;
        let (r, g, b, a) = rgba;
        if a == 255 {
            self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
        } else if a > 0 {
            // Straight-alpha source over destination
            let da = self.pixels[idx + 3] as u32;
            let sa = a as u32;
            let out_a = sa + da * (255 - sa) / 255;
            if out_a > 0 {
                for (c, s) in [(0, r), (1, g), (2, b)] {
                    let d = self.pixels[idx + c] as u32;
                    let blended = (s as u32 * sa + d * da * (255 - sa) / 255) / out_a;
                    self.pixels[idx + c] = blended.min(255) as u8;
                }
            }
            self.pixels[idx + 3] = out_a.min(255) as u8;
        }
    }
}

fn scaled(value: i32, scale: f32) -> i32 {
    (value as f32 * scale).round() as i32
}

fn scaled_u32(value: u32, scale: f32) -> u32 {
    (value as f32 * scale).round() as u32
}

/// Rasterize paint commands into a bitmap at `options.scale` times the
/// logical surface size.
pub fn rasterize(commands: &[PaintCommand], size: SurfaceSize, options: &CaptureOptions) -> Bitmap {
    let scale = options.scale.max(0.1);
    let width = scaled_u32(size.width, scale).max(1);
    let height = scaled_u32(size.height, scale).max(1);
    let mut frame = Frame::new(width, height);

    if let Some(bg) = options.background {
        frame.fill_rect(0, 0, width, height, (bg.r, bg.g, bg.b, 255));
    }

    for command in commands {
        match command {
            PaintCommand::SolidRect {
                x,
                y,
                width,
                height,
                rgba,
            } => {
                frame.fill_rect(
                    scaled(*x, scale),
                    scaled(*y, scale),
                    scaled_u32(*width, scale),
                    scaled_u32(*height, scale),
                    *rgba,
                );
            }
            PaintCommand::TextRun {
                x,
                y,
                text,
                scale: text_scale,
                rgba,
            } => {
                draw_greeked_text(&mut frame, *x, *y, text, *text_scale, scale, *rgba);
            }
            PaintCommand::InlineImage {
                x,
                y,
                width,
                height,
                data_uri,
            } => {
                let dst_x = scaled(*x, scale);
                let dst_y = scaled(*y, scale);
                let dst_w = scaled_u32(*width, scale);
                let dst_h = scaled_u32(*height, scale);
                if let Err(e) = blit_data_uri(&mut frame, dst_x, dst_y, dst_w, dst_h, data_uri) {
                    warn!("Inline image degraded to placeholder: {}", e);
                    frame.fill_rect(dst_x, dst_y, dst_w, dst_h, (0xcf, 0xd9, 0xde, 255));
                }
            }
        }
    }

    Bitmap {
        width,
        height,
        rgba: frame.pixels,
    }
}

/// One block per non-space character, inset one logical pixel inside its
/// cell.
fn draw_greeked_text(
    frame: &mut Frame,
    x: i32,
    y: i32,
    text: &str,
    text_scale: usize,
    scale: f32,
    rgba: (u8, u8, u8, u8),
) {
    let cell = (CHAR_WIDTH * text_scale as u32) as i32;
    let glyph_w = CHAR_WIDTH * text_scale as u32 - 2;
    let glyph_h = LINE_HEIGHT * text_scale as u32 - 1;

    for (i, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let cx = x + i as i32 * cell + 1;
        frame.fill_rect(
            scaled(cx, scale),
            scaled(y, scale),
            scaled_u32(glyph_w, scale),
            scaled_u32(glyph_h, scale),
            rgba,
        );
    }
}

/// Decode an inlined data URI and blit it, resized to the destination box.
fn blit_data_uri(
    frame: &mut Frame,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    data_uri: &str,
) -> Result<()> {
    if width == 0 || height == 0 {
        return Ok(());
    }

    let bytes = decode_data_uri(data_uri)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| crate::Error::ReadError(format!("Inline image decode failed: {}", e)))?;
    let resized = image::imageops::resize(&decoded.to_rgba8(), width, height, FilterType::Triangle);

    for (px, py, pixel) in resized.enumerate_pixels() {
        let fx = x + px as i32;
        let fy = y + py as i32;
        if fx < 0 || fy < 0 || fx as u32 >= frame.width || fy as u32 >= frame.height {
            continue;
        }
        let [r, g, b, a] = pixel.0;
        frame.put(fx as u32, fy as u32, (r, g, b, a));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Color;

    #[test]
    fn capture_honors_the_density_multiplier() {
        let backend = SoftwareRaster::new(SurfaceSize {
            width: 100,
            height: 50,
        });
        let bitmap = backend
            .capture(&PreviewSurface::new(), &CaptureOptions::default())
            .unwrap();
        assert_eq!(bitmap.width, 200);
        assert_eq!(bitmap.height, 100);
    }

    #[test]
    fn capture_is_deterministic() {
        let backend = SoftwareRaster::default();
        let surface = PreviewSurface {
            name: "Ada".to_string(),
            message: "determinism check".to_string(),
            ..Default::default()
        };
        let options = CaptureOptions::default();

        let first = backend.capture(&surface, &options).unwrap();
        let second = backend.capture(&surface, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn background_option_fills_behind_the_card() {
        let commands = Vec::new();
        let size = SurfaceSize {
            width: 4,
            height: 4,
        };
        let options = CaptureOptions {
            scale: 1.0,
            background: Some(Color {
                r: 10,
                g: 20,
                b: 30,
            }),
        };

        let bitmap = rasterize(&commands, size, &options);
        assert_eq!(&bitmap.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn solid_rect_is_clipped_to_the_frame() {
        let commands = vec![PaintCommand::SolidRect {
            x: -2,
            y: -2,
            width: 100,
            height: 100,
            rgba: (1, 2, 3, 255),
        }];
        let size = SurfaceSize {
            width: 4,
            height: 4,
        };
        let options = CaptureOptions {
            scale: 1.0,
            background: None,
        };

        let bitmap = rasterize(&commands, size, &options);
        assert_eq!(bitmap.width, 4);
        assert_eq!(&bitmap.rgba[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn broken_inline_image_degrades_to_placeholder() {
        let commands = vec![PaintCommand::InlineImage {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
            data_uri: "data:image/png;base64,!!!!".to_string(),
        }];
        let size = SurfaceSize {
            width: 2,
            height: 2,
        };
        let options = CaptureOptions {
            scale: 1.0,
            background: None,
        };

        let bitmap = rasterize(&commands, size, &options);
        // Placeholder fill, not transparent
        assert_eq!(bitmap.rgba[3], 255);
    }
}
