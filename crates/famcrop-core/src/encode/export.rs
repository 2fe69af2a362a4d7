//! Output-resolution composition and blob production.

use crate::render::{Canvas, Color};
use crate::session::CropSession;

use super::jpeg::{encode_jpeg, EncodeError, DEFAULT_JPEG_QUALITY};

/// A compressed image ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub mime: &'static str,
}

impl EncodedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Turns a finished raster into upload bytes.
pub trait FrameEncoder {
    fn encode(&self, canvas: &Canvas) -> Result<EncodedImage, EncodeError>;
}

/// Baseline JPEG at a fixed quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegFrameEncoder {
    pub quality: u8,
}

impl Default for JpegFrameEncoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&self, canvas: &Canvas) -> Result<EncodedImage, EncodeError> {
        let bytes = encode_jpeg(&canvas.to_rgb(), canvas.width, canvas.height, self.quality)?;
        Ok(EncodedImage {
            bytes,
            width: canvas.width,
            height: canvas.height,
            mime: "image/jpeg",
        })
    }
}

/// Compose the session at output resolution over opaque white.
///
/// The output is never clipped, even when the preview shows a circle.
/// Returns `None` when no source is loaded.
pub fn compose_output(session: &CropSession) -> Option<Canvas> {
    let source = session.source()?;
    let target = session.output_size();
    let mut canvas = Canvas::filled(target, Color::WHITE);
    canvas.draw_image(source, session.draw_rect(target), None);
    Some(canvas)
}

/// Compose and encode the current crop.
///
/// `Ok(None)` means there was nothing to export.
pub fn export_session(
    session: &CropSession,
    encoder: &dyn FrameEncoder,
) -> Result<Option<EncodedImage>, EncodeError> {
    let Some(canvas) = compose_output(session) else {
        return Ok(None);
    };

    let encoded = encoder.encode(&canvas)?;
    if encoded.is_empty() {
        return Err(EncodeError::EmptyOutput);
    }

    log::info!(
        "exported {}x{} {} ({} bytes)",
        encoded.width,
        encoded.height,
        encoded.mime,
        encoded.len()
    );
    Ok(Some(encoded))
}
