//! Export pipeline: compose at output resolution, then encode.
//!
//! # Architecture
//!
//! [`compose_output`] redraws the session at the call site's output size
//! with the same zoom and pan as the preview, over opaque white.
//! A [`FrameEncoder`] then turns the raster into the upload blob. The
//! default [`JpegFrameEncoder`] writes JPEG at quality 92.
//!
//! # Examples
//!
//! ```ignore
//! use famcrop_core::encode::{export_session, JpegFrameEncoder};
//!
//! if let Some(blob) = export_session(&session, &JpegFrameEncoder::default())? {
//!     println!("{} bytes", blob.len());
//! }
//! ```

mod export;
mod jpeg;

pub use export::{compose_output, export_session, EncodedImage, FrameEncoder, JpegFrameEncoder};
pub use jpeg::{encode_jpeg, EncodeError, DEFAULT_JPEG_QUALITY};
