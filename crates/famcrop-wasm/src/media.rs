//! Storage reference helpers for rendering saved images.

use famcrop_core::media::{self, StorageRef};
use wasm_bindgen::prelude::*;

/// Parse `sb://bucket/path` into `{ bucket, objectPath }`, or `undefined`.
#[wasm_bindgen(js_name = parseStorageRef)]
pub fn parse_storage_ref(value: &str) -> Result<JsValue, JsValue> {
    match StorageRef::parse(value) {
        Some(parsed) => Ok(serde_wasm_bindgen::to_value(&parsed)?),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Whether `value` uses the `sb://` scheme.
#[wasm_bindgen(js_name = isStorageRef)]
pub fn is_storage_ref(value: &str) -> bool {
    media::is_storage_ref(value)
}
