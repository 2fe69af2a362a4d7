//! famcrop core - crop-and-upload pipeline
//!
//! This crate provides the image side of the family site's crop dialogs:
//! decoding a chosen file, cover-fit framing with zoom and pan, preview
//! rendering, JPEG export and the multipart upload to the backend, plus
//! resolution of `sb://` storage references to signed URLs.
//!
//! Everything here is single-threaded and free of DOM access, so the whole
//! pipeline runs under `cargo test`. Browser bindings live in `famcrop-wasm`.

pub mod clock;
pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod interaction;
pub mod mask;
pub mod media;
pub mod render;
pub mod session;
pub mod transform;
pub mod upload;

pub use clock::Clock;
pub use config::{CropPreset, MediaCacheConfig, PresetOverrides, UploadConfig};
pub use editor::{CropEditor, EditorError, PendingUpload, SavedImage};
pub use session::CropSession;
pub use transform::{cover_geometry, draw_rect, Dimensions, DrawRect, PanOffset};
pub use upload::{UploadClient, UploadError, UploadPurpose, UploadResult};
