//! Cover-fit geometry for the crop preview and the export raster.
//!
//! # Coordinate System
//!
//! - Target coordinates are pixels of the preview or output raster
//! - Origin is the top-left corner
//! - Pan offsets are normalized ratios in `[-1, 1]`, `0` = centered
//!
//! The same zoom and pan produce the same framing at any target size, which
//! is what lets the 600px preview and the 512px export agree.

mod cover;

pub use cover::{cover_geometry, draw_rect, CoverGeometry, Dimensions, DrawRect, PanOffset};
