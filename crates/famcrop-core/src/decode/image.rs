//! Decoding of user-chosen files with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Default decoded-pixel budget (40 megapixels).
pub const DEFAULT_MAX_PIXELS: u64 = 40_000_000;

/// Decode a chosen file into an RGBA raster, applying EXIF orientation.
///
/// `mime` is the type the browser reported for the file, when known. Anything
/// outside `image/*` is rejected before the bytes are looked at, matching the
/// upload filter on the server side.
///
/// The header dimensions are checked against `max_pixels` before the full
/// decode so an oversized file fails fast.
pub fn decode_image(
    bytes: &[u8],
    mime: Option<&str>,
    max_pixels: u64,
) -> Result<DecodedImage, DecodeError> {
    if let Some(mime) = mime {
        let mime = mime.trim();
        if !mime.is_empty() && !mime.to_ascii_lowercase().starts_with("image/") {
            return Err(DecodeError::NotAnImage {
                mime: mime.to_string(),
            });
        }
    }

    let (width, height) = inspect_dimensions(bytes)?;
    let pixels = (width as u64) * (height as u64);
    if pixels == 0 {
        return Err(DecodeError::CorruptedFile("image has no pixels".to_string()));
    }
    if pixels > max_pixels {
        return Err(DecodeError::TooLarge {
            width,
            height,
            max_pixels,
        });
    }

    let orientation = extract_orientation(bytes);

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let decoded = DecodedImage::from_rgba_image(apply_orientation(img, orientation).into_rgba8());
    log::info!(
        "decoded source image {}x{} (orientation {:?})",
        decoded.width,
        decoded.height,
        orientation
    );
    Ok(decoded)
}

/// Read width and height from the image header without decoding pixels.
fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .into_dimensions()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Extract EXIF orientation from the file bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
