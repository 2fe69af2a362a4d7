//! RGBA raster with cover-fit image drawing.
//!
//! # Algorithm
//!
//! Drawing uses inverse mapping: for each destination pixel center inside the
//! draw rectangle, the matching source coordinate is
//!
//! ```text
//! src_x = (dst_x + 0.5 - rect.x) * src_w / rect.width - 0.5
//! ```
//!
//! which is sampled bilinearly with edge clamping and composited over the
//! existing pixel. Interpolation is done on premultiplied values so
//! transparent source pixels do not bleed dark fringes.

use crate::decode::DecodedImage;
use crate::mask::CircleClip;
use crate::transform::{Dimensions, DrawRect};

use super::Color;

/// An RGBA8 raster, row-major, 4 bytes per pixel.
///
/// The layout matches `ImageData`, so the wasm side can hand the buffer to a
/// 2D context without conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with a solid color.
    pub fn filled(size: Dimensions, color: Color) -> Self {
        let pixels = color
            .to_array()
            .iter()
            .copied()
            .cycle()
            .take((size.width as usize) * (size.height as usize) * 4)
            .collect();
        Self {
            width: size.width,
            height: size.height,
            pixels,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    /// Read one pixel. Callers must stay in bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Source-over blend of a straight-alpha color with extra coverage.
    #[inline]
    fn blend(&mut self, x: u32, y: u32, rgb: [f64; 3], alpha: f64) {
        if alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let idx = self.index(x, y);
        for (c, value) in rgb.iter().enumerate() {
            let dst = self.pixels[idx + c] as f64;
            self.pixels[idx + c] = (value * alpha + dst * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
        }
        let dst_a = self.pixels[idx + 3] as f64 / 255.0;
        self.pixels[idx + 3] = ((alpha + dst_a * (1.0 - alpha)) * 255.0).round() as u8;
    }

    /// Draw `image` scaled into `rect`, optionally clipped to a circle.
    ///
    /// Pixels outside the rectangle or the clip keep their current value.
    pub fn draw_image(&mut self, image: &DecodedImage, rect: DrawRect, clip: Option<&CircleClip>) {
        if image.is_empty() || rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }

        let scale_x = image.width as f64 / rect.width;
        let scale_y = image.height as f64 / rect.height;
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;

        for y in 0..self.height {
            let cy = y as f64 + 0.5;
            if cy < rect.y || cy > bottom {
                continue;
            }
            let src_y = (cy - rect.y) * scale_y - 0.5;

            for x in 0..self.width {
                let cx = x as f64 + 0.5;
                if cx < rect.x || cx > right {
                    continue;
                }

                let coverage = clip.map_or(1.0, |clip| clip.coverage(x, y));
                if coverage <= 0.0 {
                    continue;
                }

                let src_x = (cx - rect.x) * scale_x - 0.5;
                let (rgb, alpha) = sample_bilinear(image, src_x, src_y);
                self.blend(x, y, rgb, alpha * coverage);
            }
        }
    }

    /// Stroke the outline ring of a circular clip.
    pub fn stroke_ring(&mut self, clip: &CircleClip) {
        let reach = clip.radius + clip.ring_width;
        let min_x = (clip.center_x - reach).floor().max(0.0) as u32;
        let min_y = (clip.center_y - reach).floor().max(0.0) as u32;
        let max_x = ((clip.center_x + reach).ceil().max(0.0) as u32).min(self.width);
        let max_y = ((clip.center_y + reach).ceil().max(0.0) as u32).min(self.height);

        let color = clip.ring_color;
        let rgb = [color.r as f64, color.g as f64, color.b as f64];
        for y in min_y..max_y {
            for x in min_x..max_x {
                let coverage = clip.ring_coverage(x, y);
                self.blend(x, y, rgb, color.alpha() * coverage);
            }
        }
    }

    /// Drop the alpha channel, producing packed RGB8.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }
}

/// Bilinear sample with edge clamping.
///
/// Returns the straight-alpha color and the interpolated alpha.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> ([f64; 3], f64) {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let taps = [
        (image.pixel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (image.pixel(x1, y0), fx * (1.0 - fy)),
        (image.pixel(x0, y1), (1.0 - fx) * fy),
        (image.pixel(x1, y1), fx * fy),
    ];

    let mut premultiplied = [0.0f64; 3];
    let mut alpha = 0.0;
    for (px, weight) in taps {
        let a = px[3] as f64 / 255.0 * weight;
        premultiplied[0] += px[0] as f64 * a;
        premultiplied[1] += px[1] as f64 * a;
        premultiplied[2] += px[2] as f64 * a;
        alpha += a;
    }

    if alpha <= f64::EPSILON {
        return ([0.0; 3], 0.0);
    }

    (
        [
            premultiplied[0] / alpha,
            premultiplied[1] / alpha,
            premultiplied[2] / alpha,
        ],
        alpha,
    )
}
