//! Source image decoding.
//!
//! Turns the bytes of a file the user picked into a [`DecodedImage`] the crop
//! session can own. EXIF orientation is applied up front so the preview shows
//! the photo the same way an `<img>` element would.
//!
//! All operations are synchronous. In the browser the host reads the file
//! (`File.arrayBuffer()`) and hands the bytes over once that await resolves.

mod image;
mod types;

pub use self::image::{decode_image, extract_orientation, DEFAULT_MAX_PIXELS};
pub use types::{DecodeError, DecodedImage, Orientation};
