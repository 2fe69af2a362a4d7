//! Cover-fit placement of a source image inside a fixed target rectangle.
//!
//! # Algorithm
//!
//! ```text
//! base_scale = max(target_w / source_w, target_h / source_h)
//! draw_w     = source_w * base_scale * zoom
//! max_shift  = max(0, (draw_w - target_w) / 2)
//! draw_x     = (target_w - draw_w) / 2 - max_shift * pan_x
//! ```
//!
//! and symmetrically for the vertical axis. With `zoom >= 1` the drawn image
//! always covers the target, and clamping the pan ratio to `[-1, 1]` keeps
//! every edge of the target on top of image pixels.

use serde::{Deserialize, Serialize};

/// Width and height of a raster or a target rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Length of the shorter side.
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// Normalized pan offset, each axis in `[-1, 1]`.
///
/// `0` is centered. `-1` shows the far left (or top) edge of the image,
/// `1` the far right (or bottom), matching the direction a drag moves the image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    pub const CENTER: PanOffset = PanOffset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Copy of this offset with both axes clamped to `[-1, 1]`.
    ///
    /// NaN collapses to the center on that axis.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_ratio(self.x),
            y: clamp_ratio(self.y),
        }
    }
}

#[inline]
fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Scaled size of the source and how far it may slide on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverGeometry {
    pub draw_width: f64,
    pub draw_height: f64,
    pub max_shift_x: f64,
    pub max_shift_y: f64,
}

/// Where to draw the source on the target, in target pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Compute the cover-fit draw size and maximum shifts for a target.
///
/// With no source (or a zero-sized one) the draw size equals the target and
/// both shifts are zero. Callers render a placeholder in that case.
///
/// `zoom` below 1 (or non-finite) is treated as 1 so the cover invariant
/// cannot be broken by a bad slider value.
pub fn cover_geometry(source: Option<Dimensions>, target: Dimensions, zoom: f64) -> CoverGeometry {
    let tw = target.width as f64;
    let th = target.height as f64;

    let source = match source {
        Some(source) if !source.is_empty() => source,
        _ => {
            return CoverGeometry {
                draw_width: tw,
                draw_height: th,
                max_shift_x: 0.0,
                max_shift_y: 0.0,
            }
        }
    };

    let zoom = if zoom.is_finite() { zoom.max(1.0) } else { 1.0 };
    let sw = source.width as f64;
    let sh = source.height as f64;

    let base_scale = (tw / sw).max(th / sh);
    let draw_width = sw * base_scale * zoom;
    let draw_height = sh * base_scale * zoom;

    CoverGeometry {
        draw_width,
        draw_height,
        max_shift_x: ((draw_width - tw) / 2.0).max(0.0),
        max_shift_y: ((draw_height - th) / 2.0).max(0.0),
    }
}

/// Compute the draw rectangle for a source on a target at the given zoom and pan.
///
/// The pan is clamped to `[-1, 1]` before use.
pub fn draw_rect(
    source: Option<Dimensions>,
    target: Dimensions,
    zoom: f64,
    pan: PanOffset,
) -> DrawRect {
    let geometry = cover_geometry(source, target, zoom);
    let pan = pan.clamped();

    let x = (target.width as f64 - geometry.draw_width) / 2.0 - geometry.max_shift_x * pan.x;
    let y = (target.height as f64 - geometry.draw_height) / 2.0 - geometry.max_shift_y * pan.y;

    DrawRect {
        x,
        y,
        width: geometry.draw_width,
        height: geometry.draw_height,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
