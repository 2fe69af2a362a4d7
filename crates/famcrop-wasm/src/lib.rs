//! famcrop WASM - browser bindings for the crop-and-upload editor
//!
//! The page owns the DOM (dialogs, file inputs, the `<canvas>`); this crate
//! owns the crop state, rendering, export and upload.
//!
//! # Module Structure
//!
//! - `editor` - `JsCropEditor`, one per crop dialog, and `uploadImageFile` for
//!   uncropped inline blog images
//! - `types` - `JsFrame`, the rendered preview handed back to the page
//! - `geometry` - cover-fit draw rectangle for custom drawing
//! - `media` - `sb://` storage reference helpers
//! - `logging` - `log` records forwarded to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropEditor } from '@famcrop/wasm';
//!
//! await init();
//!
//! const editor = new JsCropEditor('landing-background', undefined, undefined);
//! editor.open({ kind: 'landing-background' });
//! const frame = editor.frame();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(frame.pixels()), frame.width), 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod geometry;
mod logging;
mod media;
mod types;

pub use editor::{upload_image_file, JsCropEditor};
pub use geometry::compute_draw_rect;
pub use media::{is_storage_ref, parse_storage_ref};
pub use types::JsFrame;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    logging::init(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
