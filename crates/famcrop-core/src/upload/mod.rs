//! Multipart upload of finished images to the site backend.
//!
//! Every call site posts a single file under the `imageFile` field and gets
//! back JSON of the shape
//!
//! ```text
//! { ok: bool, imageUrl?: string, imageRef?: string, location?: string, error?: string }
//! ```
//!
//! The HTTP layer sits behind [`UploadTransport`] so the client can be driven
//! by `reqwest` in production and by an in-memory fake in tests.

mod client;
mod purpose;
mod response;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{safe_extension, UploadClient, UploadHints, UploadResult};
pub use purpose::UploadPurpose;
pub use response::parse_upload_response;
pub use transport::{MultipartRequest, ReqwestTransport, TransportResponse, UploadTransport};

use thiserror::Error;

/// Errors from the upload round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a failure.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The server reported success but returned no usable URL.
    #[error("Upload succeeded but the server returned no image URL.")]
    MissingUrl,

    /// The payload exceeds the server's size limit.
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    /// The request could not be built.
    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),
}
