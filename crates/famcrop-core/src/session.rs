//! Per-dialog crop state.
//!
//! A [`CropSession`] owns the decoded source and the zoom/pan controls for
//! one editor instance. Geometry is always derived on demand from the
//! session, never cached, so the preview and the export cannot drift apart.

use crate::decode::DecodedImage;
use crate::transform::{cover_geometry, draw_rect, CoverGeometry, Dimensions, DrawRect, PanOffset};

/// Upper bound of the zoom slider unless a preset says otherwise.
pub const DEFAULT_MAX_ZOOM: f64 = 3.0;

/// Mutable crop state for one open dialog.
#[derive(Debug, Clone)]
pub struct CropSession {
    source: Option<DecodedImage>,
    generation: u64,
    zoom: f64,
    max_zoom: f64,
    pan: PanOffset,
    preview: Dimensions,
    output: Dimensions,
}

impl CropSession {
    /// Create an empty session for fixed preview and output sizes.
    pub fn new(preview: Dimensions, output: Dimensions, max_zoom: f64) -> Self {
        let max_zoom = if max_zoom.is_finite() && max_zoom >= 1.0 {
            max_zoom
        } else {
            DEFAULT_MAX_ZOOM
        };
        Self {
            source: None,
            generation: 0,
            zoom: 1.0,
            max_zoom,
            pan: PanOffset::CENTER,
            preview,
            output,
        }
    }

    /// Install a new source, replacing (and dropping) the previous one.
    ///
    /// Controls are reset so the new image starts centered at zoom 1.
    /// Returns the new source generation.
    pub fn load_source(&mut self, image: DecodedImage) -> u64 {
        self.source = Some(image);
        self.generation += 1;
        self.reset_controls();
        self.generation
    }

    /// Drop the source and reset the controls.
    pub fn clear(&mut self) {
        self.source = None;
        self.reset_controls();
    }

    /// Back to zoom 1, centered.
    pub fn reset_controls(&mut self) {
        self.zoom = 1.0;
        self.pan = PanOffset::CENTER;
    }

    /// Set the zoom, clamped to `[1, max_zoom]`. Non-finite values reset to 1.
    ///
    /// The pan ratio is re-clamped but not renormalized, so the same ratio maps
    /// to a proportionally larger shift at higher zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(1.0, self.max_zoom)
        } else {
            1.0
        };
        self.pan = self.pan.clamped();
        self.zoom
    }

    /// Set the pan, clamped to `[-1, 1]` on both axes.
    pub fn set_pan(&mut self, pan: PanOffset) {
        self.pan = pan.clamped();
    }

    pub fn source(&self) -> Option<&DecodedImage> {
        self.source.as_ref()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Monotonic counter of installed sources. Zero until the first load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    pub fn preview_size(&self) -> Dimensions {
        self.preview
    }

    pub fn output_size(&self) -> Dimensions {
        self.output
    }

    fn source_dimensions(&self) -> Option<Dimensions> {
        self.source
            .as_ref()
            .map(|image| Dimensions::new(image.width, image.height))
    }

    /// Cover geometry of the current source on `target`.
    pub fn geometry(&self, target: Dimensions) -> CoverGeometry {
        cover_geometry(self.source_dimensions(), target, self.zoom)
    }

    /// Draw rectangle of the current source on `target`.
    pub fn draw_rect(&self, target: Dimensions) -> DrawRect {
        draw_rect(self.source_dimensions(), target, self.zoom, self.pan)
    }
}
