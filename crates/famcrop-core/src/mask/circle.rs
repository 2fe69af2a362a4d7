//! Circular clip with an outline ring.
//!
//! The clip is centered on the target with radius `0.42 * min(width, height)`.
//! The ring is a 3px stroke centered on the clip edge.

use super::edge_coverage;
use crate::render::Color;
use crate::transform::Dimensions;

/// Radius of the clip as a fraction of the shorter target side.
pub const RADIUS_RATIO: f64 = 0.42;

/// Width of the outline stroke in pixels.
pub const RING_WIDTH: f64 = 3.0;

/// Outline color, `rgba(62, 125, 221, 0.86)`.
pub const RING_COLOR: Color = Color::rgba(62, 125, 221, 219);

/// Circular clip region in target pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleClip {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub ring_width: f64,
    pub ring_color: Color,
}

impl CircleClip {
    /// The standard avatar clip for a target raster.
    pub fn for_target(target: Dimensions) -> Self {
        Self {
            center_x: target.width as f64 / 2.0,
            center_y: target.height as f64 / 2.0,
            radius: target.min_side() as f64 * RADIUS_RATIO,
            ring_width: RING_WIDTH,
            ring_color: RING_COLOR,
        }
    }

    #[inline]
    fn distance(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Fraction of the pixel at `(px, py)` that lies inside the clip.
    ///
    /// Sampled at the pixel center.
    pub fn coverage(&self, px: u32, py: u32) -> f64 {
        let d = self.distance(px as f64 + 0.5, py as f64 + 0.5);
        edge_coverage(self.radius - d)
    }

    /// Fraction of the pixel at `(px, py)` covered by the outline stroke.
    pub fn ring_coverage(&self, px: u32, py: u32) -> f64 {
        let d = self.distance(px as f64 + 0.5, py as f64 + 0.5);
        edge_coverage(self.ring_width / 2.0 - (d - self.radius).abs())
    }

    /// Whether a pixel center lies inside the clip.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        self.coverage(px, py) >= 0.5
    }
}
