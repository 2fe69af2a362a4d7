//! JavaScript-facing wrappers for editor output.

use famcrop_core::render::Frame;
use wasm_bindgen::prelude::*;

/// A rendered preview frame.
///
/// `pixels()` is RGBA in row-major order, ready for
/// `new ImageData(new Uint8ClampedArray(frame.pixels()), frame.width)`.
/// When `placeholder` is set the host draws that label centered in
/// `placeholderColor` on top of the background.
#[wasm_bindgen]
pub struct JsFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    cursor: &'static str,
    placeholder: Option<String>,
    placeholder_color: Option<String>,
    sequence: u64,
}

#[wasm_bindgen]
impl JsFrame {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// CSS cursor for the preview canvas.
    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> String {
        self.cursor.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn placeholder(&self) -> Option<String> {
        self.placeholder.clone()
    }

    #[wasm_bindgen(getter, js_name = placeholderColor)]
    pub fn placeholder_color(&self) -> Option<String> {
        self.placeholder_color.clone()
    }

    /// Increases with every render; lets the host skip repaints.
    #[wasm_bindgen(getter)]
    pub fn sequence(&self) -> f64 {
        self.sequence as f64
    }

    /// Copy of the RGBA pixels.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsFrame {
    pub(crate) fn from_frame(frame: &Frame) -> Self {
        Self {
            width: frame.canvas.width,
            height: frame.canvas.height,
            pixels: frame.canvas.pixels.clone(),
            cursor: frame.cursor.as_css(),
            placeholder: frame.placeholder.as_ref().map(|p| p.text.clone()),
            placeholder_color: frame.placeholder.as_ref().map(|p| p.color.to_string()),
            sequence: frame.sequence,
        }
    }
}
