//! Media references and their display URLs.
//!
//! Uploaded images may be stored in a private bucket. The site then persists
//! an opaque `sb://bucket/path` reference and resolves it to a short-lived
//! signed URL only when a page is rendered.

mod signed_url;
mod storage_ref;

pub use signed_url::{SignedUrlCache, UrlSigner};
pub use storage_ref::{is_storage_ref, NotAStorageRef, StorageRef, STORAGE_REF_PREFIX};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The storage backend could not sign the object.
    #[error("failed to sign storage URL: {0}")]
    Sign(String),
}
