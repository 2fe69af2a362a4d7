//! Preview clip shapes.
//!
//! The profile photo dialog clips its preview to a circle with a thin ring,
//! so the admin sees how the avatar will be framed. The other call sites
//! preview the full rectangle. Exports are never clipped.
//!
//! Coverage values run from 0.0 (outside) to 1.0 (inside), with a one-pixel
//! antialiased transition at the edge.

pub mod circle;

pub use circle::CircleClip;

use serde::{Deserialize, Serialize};

use crate::transform::Dimensions;

/// Shape the preview is clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskShape {
    /// Full rectangle, no clip.
    #[default]
    Rectangle,
    /// Centered circle with an outline ring.
    Circle,
}

impl MaskShape {
    /// Build the clip for a target raster, if this shape clips at all.
    pub fn clip_for(self, target: Dimensions) -> Option<CircleClip> {
        match self {
            MaskShape::Rectangle => None,
            MaskShape::Circle => Some(CircleClip::for_target(target)),
        }
    }
}

/// Antialiased coverage for a signed distance to an edge.
///
/// `inside_distance` is positive inside the shape. Returns 0.5 exactly on
/// the edge.
#[inline]
pub fn edge_coverage(inside_distance: f64) -> f64 {
    (inside_distance + 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_coverage_boundaries() {
        assert_eq!(edge_coverage(5.0), 1.0);
        assert_eq!(edge_coverage(-5.0), 0.0);
        assert!((edge_coverage(0.0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_coverage_monotonic() {
        let mut prev = 0.0;
        for i in -20..=20 {
            let val = edge_coverage(i as f64 / 10.0);
            assert!(val >= prev);
            prev = val;
        }
    }

    #[test]
    fn test_rectangle_has_no_clip() {
        assert!(MaskShape::Rectangle.clip_for(Dimensions::new(100, 100)).is_none());
        assert!(MaskShape::Circle.clip_for(Dimensions::new(100, 100)).is_some());
    }

    #[test]
    fn test_mask_shape_serde_names() {
        let json = serde_json::to_string(&MaskShape::Circle).unwrap();
        assert_eq!(json, "\"circle\"");
        let shape: MaskShape = serde_json::from_str("\"rectangle\"").unwrap();
        assert_eq!(shape, MaskShape::Rectangle);
    }
}
