//! Cover-fit geometry for hosts that draw the source themselves.

use famcrop_core::transform::{draw_rect, Dimensions, PanOffset};
use wasm_bindgen::prelude::*;

/// Draw rectangle `{ x, y, width, height }` for a source on a target.
///
/// Pass `0` for the source size when nothing is loaded; the result then
/// covers the whole target.
#[wasm_bindgen(js_name = computeDrawRect)]
pub fn compute_draw_rect(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> Result<JsValue, JsValue> {
    let rect = draw_rect(
        Some(Dimensions::new(source_width, source_height)),
        Dimensions::new(target_width, target_height),
        zoom,
        PanOffset::new(pan_x, pan_y),
    );
    Ok(serde_wasm_bindgen::to_value(&rect)?)
}
