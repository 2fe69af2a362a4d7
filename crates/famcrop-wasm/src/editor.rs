//! The crop editor exposed to the page scripts.
//!
//! # Example
//!
//! ```typescript
//! import { JsCropEditor } from '@famcrop/wasm';
//!
//! const editor = new JsCropEditor('profile-photo', undefined, undefined);
//! editor.open({ kind: 'profile-photo', profileId: 3 });
//! paint(editor.frame());
//!
//! fileInput.onchange = async () => {
//!   const file = fileInput.files[0];
//!   editor.fileChosen(new Uint8Array(await file.arrayBuffer()), file.type);
//!   paint(editor.frame());
//! };
//!
//! const saved = await editor.save(); // { purpose, reference, displayUrl }
//!
//! // Inline blog images go up as-is, without the crop dialog.
//! const { reference, displayUrl } = await uploadImageFile(bytes, file.name, file.type);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use famcrop_core::upload::UploadHints;
use famcrop_core::{
    CropEditor, CropPreset, EditorError, PresetOverrides, UploadClient, UploadConfig,
    UploadPurpose,
};
use js_sys::{Date, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::types::JsFrame;

fn editor_error(e: EditorError) -> JsValue {
    JsValue::from_str(&e.user_message())
}

/// `location.origin` of the page, if there is one.
fn page_origin() -> Option<String> {
    let location = Reflect::get(&js_sys::global(), &JsValue::from_str("location")).ok()?;
    Reflect::get(&location, &JsValue::from_str("origin"))
        .ok()?
        .as_string()
}

/// Upload client for `base_url`, or the page origin when absent.
fn upload_client(base_url: Option<String>) -> Result<UploadClient, JsValue> {
    let base_url = base_url.or_else(page_origin).unwrap_or_default();
    UploadClient::new(UploadConfig::new(base_url)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Upload a file for the blog body without cropping.
///
/// Resolves to `{ reference, displayUrl }` or rejects with a message for the
/// user. Non-image types are rejected before any request is made.
#[wasm_bindgen(js_name = uploadImageFile)]
pub fn upload_image_file(
    bytes: Vec<u8>,
    file_name: String,
    mime: String,
    base_url: Option<String>,
) -> Promise {
    future_to_promise(async move {
        let client = upload_client(base_url)?;
        let hints = UploadHints {
            purpose: UploadPurpose::BlogInline,
            timestamp_ms: Date::now() as u64,
        };
        let uploaded = client
            .upload_file(bytes, &file_name, &mime, hints)
            .await
            .map_err(|e| editor_error(e.into()))?;
        Ok(serde_wasm_bindgen::to_value(&uploaded)?)
    })
}

/// Resolve a preset name plus optional overrides object.
pub(crate) fn resolve_preset(name: &str, overrides: Option<PresetOverrides>) -> Result<CropPreset, String> {
    let preset = CropPreset::by_name(name).ok_or_else(|| format!("unknown preset: {name}"))?;
    Ok(match overrides {
        Some(overrides) => preset.with_overrides(overrides),
        None => preset,
    })
}

/// One crop dialog.
#[wasm_bindgen]
pub struct JsCropEditor {
    inner: Rc<RefCell<CropEditor>>,
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Create an editor from a preset name (`profile-photo`,
    /// `landing-background` or `blog-cover`).
    ///
    /// `overrides` is an optional partial preset object. `base_url` defaults
    /// to the page origin.
    #[wasm_bindgen(constructor)]
    pub fn new(
        preset: &str,
        overrides: JsValue,
        base_url: Option<String>,
    ) -> Result<JsCropEditor, JsValue> {
        let overrides: Option<PresetOverrides> = if overrides.is_undefined() || overrides.is_null() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value(overrides)?)
        };
        let preset = resolve_preset(preset, overrides).map_err(|e| JsValue::from_str(&e))?;

        let client = upload_client(base_url)?;
        let clock = Rc::new(|| Date::now() as u64);

        Ok(JsCropEditor {
            inner: Rc::new(RefCell::new(CropEditor::new(preset, client, clock))),
        })
    }

    /// Open for a destination, e.g. `{ kind: 'landing-background' }`.
    pub fn open(&self, purpose: JsValue) -> Result<(), JsValue> {
        let purpose: UploadPurpose = serde_wasm_bindgen::from_value(purpose)?;
        self.inner.borrow_mut().open(purpose);
        Ok(())
    }

    pub fn close(&self) {
        self.inner.borrow_mut().close();
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.inner.borrow().is_open()
    }

    /// Decode and load the chosen file.
    #[wasm_bindgen(js_name = fileChosen)]
    pub fn file_chosen(&self, bytes: &[u8], mime: Option<String>) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .on_file_chosen(bytes, mime.as_deref())
            .map_err(editor_error)
    }

    /// Returns the zoom actually applied.
    #[wasm_bindgen(js_name = zoomChanged)]
    pub fn zoom_changed(&self, zoom: f64) -> f64 {
        self.inner.borrow_mut().on_zoom_changed(zoom)
    }

    /// Call from `pointerdown`. When this returns `true` the host should
    /// `setPointerCapture(pointerId)`.
    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&self, pointer_id: i32, x: f64, y: f64) -> bool {
        self.inner.borrow_mut().on_drag_start(pointer_id, x, y)
    }

    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&self, pointer_id: i32, x: f64, y: f64) -> bool {
        self.inner.borrow_mut().on_drag_move(pointer_id, x, y)
    }

    /// Call from `pointerup`. When this returns `true` the host should
    /// release pointer capture.
    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&self, pointer_id: i32) -> bool {
        self.inner.borrow_mut().on_drag_end(pointer_id)
    }

    #[wasm_bindgen(js_name = dragCancel)]
    pub fn drag_cancel(&self) {
        self.inner.borrow_mut().on_drag_cancel();
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().on_reset();
    }

    /// The latest preview.
    pub fn frame(&self) -> JsFrame {
        JsFrame::from_frame(self.inner.borrow().frame())
    }

    #[wasm_bindgen(getter, js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.borrow().last_error().map(str::to_string)
    }

    /// Export, upload and close. Resolves to `{ purpose, reference,
    /// displayUrl }` or rejects with a message for the user.
    pub fn save(&self) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let (pending, client) = {
                let mut editor = inner.borrow_mut();
                let pending = editor.prepare_save().map_err(editor_error)?;
                (pending, editor.upload_client())
            };

            let purpose = pending.hints.purpose;
            let outcome = client.upload(pending.image, pending.hints).await;
            let saved = inner
                .borrow_mut()
                .complete_save(purpose, outcome)
                .map_err(editor_error)?;

            Ok(serde_wasm_bindgen::to_value(&saved)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use famcrop_core::mask::MaskShape;

    #[test]
    fn test_resolve_known_presets() {
        let preset = resolve_preset("profile-photo", None).unwrap();
        assert_eq!(preset.mask, MaskShape::Circle);
        assert!(resolve_preset("landing-background", None).is_ok());
        assert!(resolve_preset("blog-cover", None).is_ok());
    }

    #[test]
    fn test_resolve_unknown_preset() {
        assert_eq!(
            resolve_preset("poster", None).unwrap_err(),
            "unknown preset: poster"
        );
    }

    #[test]
    fn test_resolve_with_overrides() {
        let overrides = PresetOverrides {
            max_zoom: Some(5.0),
            ..PresetOverrides::default()
        };
        let preset = resolve_preset("blog-cover", Some(overrides)).unwrap();
        assert_eq!(preset.max_zoom, 5.0);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_editor_shows_placeholder() {
        let editor = JsCropEditor::new(
            "profile-photo",
            JsValue::UNDEFINED,
            Some("http://localhost".to_string()),
        )
        .unwrap();

        let frame = editor.frame();
        assert_eq!((frame.width(), frame.height()), (600, 600));
        assert!(frame.placeholder().is_some());
        assert!(!editor.is_open());
    }

    #[wasm_bindgen_test]
    fn test_unknown_preset_rejected() {
        assert!(JsCropEditor::new("poster", JsValue::UNDEFINED, None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_open_with_purpose_object() {
        let editor = JsCropEditor::new(
            "landing-background",
            JsValue::NULL,
            Some("http://localhost".to_string()),
        )
        .unwrap();
        let purpose = js_sys::Object::new();
        Reflect::set(&purpose, &"kind".into(), &"landing-background".into()).unwrap();

        editor.open(purpose.into()).unwrap();

        assert!(editor.is_open());
    }

    #[wasm_bindgen_test]
    fn test_file_chosen_rejects_text() {
        let editor = JsCropEditor::new(
            "blog-cover",
            JsValue::UNDEFINED,
            Some("http://localhost".to_string()),
        )
        .unwrap();
        let purpose = js_sys::Object::new();
        Reflect::set(&purpose, &"kind".into(), &"blog-cover".into()).unwrap();
        editor.open(purpose.into()).unwrap();

        assert!(editor
            .file_chosen(b"hello", Some("text/plain".to_string()))
            .is_err());
        assert_eq!(
            editor.last_error().as_deref(),
            Some("Only image uploads are allowed.")
        );
    }

    #[wasm_bindgen_test]
    async fn test_upload_image_file_rejects_non_image() {
        let promise = upload_image_file(
            b"plain text".to_vec(),
            "notes.txt".to_string(),
            "text/plain".to_string(),
            Some("http://localhost".to_string()),
        );

        let error = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .unwrap_err();

        assert_eq!(
            error.as_string().as_deref(),
            Some("Invalid upload request: Only image uploads are allowed.")
        );
    }
}
