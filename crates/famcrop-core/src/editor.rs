//! The crop-and-upload editor component.
//!
//! One [`CropEditor`] backs one dialog. It is configured by a [`CropPreset`]
//! and driven by host events (`on_file_chosen`, `on_zoom_changed`, the drag
//! callbacks, `on_reset`, `on_save`). After every state change it re-renders
//! and exposes the latest [`Frame`] for the host to paint.
//!
//! Saving is split in three steps so a host that keeps the editor in a
//! `RefCell` never holds the borrow across the network round trip:
//!
//! ```text
//! prepare_save()  -> PendingUpload        (sync: compose + encode)
//! client.upload() -> UploadResult         (async, editor not borrowed)
//! complete_save() -> SavedImage           (sync: close on success)
//! ```
//!
//! Any failure leaves the session intact and records a message in
//! [`CropEditor::last_error`].

use serde::Serialize;
use thiserror::Error;

use crate::clock::Clock;
use crate::config::CropPreset;
use crate::decode::{decode_image, DecodeError, DEFAULT_MAX_PIXELS};
use crate::encode::{export_session, EncodeError, EncodedImage, FrameEncoder, JpegFrameEncoder};
use crate::interaction::{InteractionController, MaxShift};
use crate::render::{Frame, Renderer};
use crate::session::CropSession;
use crate::upload::{
    ReqwestTransport, UploadClient, UploadError, UploadHints, UploadPurpose, UploadResult,
    UploadTransport,
};

/// Errors surfaced to the host by editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Choose an image first.")]
    NoImage,

    #[error("The editor is not open.")]
    NotOpen,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl EditorError {
    /// Text to show the user, as specific as the failure allows.
    pub fn user_message(&self) -> String {
        match self {
            EditorError::Decode(DecodeError::NotAnImage { .. }) => {
                "Only image uploads are allowed.".to_string()
            }
            EditorError::Decode(_) => "This file could not be read as an image.".to_string(),
            EditorError::Encode(_) => "Image processing failed.".to_string(),
            other => other.to_string(),
        }
    }
}

/// An encoded crop waiting to be uploaded.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub image: EncodedImage,
    pub hints: UploadHints,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedImage {
    pub purpose: UploadPurpose,
    /// Value to persist.
    pub reference: String,
    /// URL to show now, cache-busted when the preset asks for it.
    pub display_url: String,
}

/// Crop dialog state machine for one call site.
pub struct CropEditor<T = ReqwestTransport> {
    preset: CropPreset,
    purpose: Option<UploadPurpose>,
    session: CropSession,
    controller: InteractionController,
    renderer: Renderer,
    encoder: Box<dyn FrameEncoder>,
    client: UploadClient<T>,
    clock: Clock,
    frame: Frame,
    last_error: Option<String>,
    max_pixels: u64,
}

impl<T: UploadTransport> CropEditor<T> {
    pub fn new(preset: CropPreset, client: UploadClient<T>, clock: Clock) -> Self {
        let session = CropSession::new(preset.preview, preset.output, preset.max_zoom);
        let mut renderer = Renderer::new(preset.render_style());
        let frame = renderer.render(&session, false);
        let encoder = Box::new(JpegFrameEncoder {
            quality: preset.quality,
        });

        Self {
            preset,
            purpose: None,
            session,
            controller: InteractionController::new(),
            renderer,
            encoder,
            client,
            clock,
            frame,
            last_error: None,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Replace the frame encoder.
    pub fn with_encoder(mut self, encoder: Box<dyn FrameEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Limit the decoded size of chosen files.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn preset(&self) -> &CropPreset {
        &self.preset
    }

    pub fn session(&self) -> &CropSession {
        &self.session
    }

    pub fn purpose(&self) -> Option<UploadPurpose> {
        self.purpose
    }

    pub fn is_open(&self) -> bool {
        self.purpose.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// The most recent preview.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Message from the last failed operation, cleared on open and close.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// A handle to the upload client, for awaiting outside the editor.
    pub fn upload_client(&self) -> UploadClient<T> {
        self.client.clone()
    }

    fn refresh(&mut self) {
        self.frame = self
            .renderer
            .render(&self.session, self.controller.is_dragging());
    }

    fn fail(&mut self, error: EditorError) -> EditorError {
        log::warn!("crop editor: {error}");
        self.last_error = Some(error.user_message());
        error
    }

    /// Open the dialog for a destination.
    pub fn open(&mut self, purpose: UploadPurpose) {
        log::info!("opening crop editor for {}", purpose.endpoint());
        self.purpose = Some(purpose);
        self.last_error = None;
        self.controller.cancel();
        self.session.reset_controls();
        self.refresh();
    }

    /// Close the dialog and release the source. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.purpose = None;
        self.last_error = None;
        self.controller.cancel();
        self.session.clear();
        self.refresh();
    }

    /// Decode and install a chosen file.
    ///
    /// On failure the previous source (if any) stays loaded.
    pub fn on_file_chosen(&mut self, bytes: &[u8], mime: Option<&str>) -> Result<(), EditorError> {
        if !self.is_open() {
            return Err(self.fail(EditorError::NotOpen));
        }

        let image = match decode_image(bytes, mime, self.max_pixels) {
            Ok(image) => image,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.controller.cancel();
        self.session.load_source(image);
        self.last_error = None;
        self.refresh();
        Ok(())
    }

    /// Apply the zoom slider. Returns the zoom actually used.
    pub fn on_zoom_changed(&mut self, zoom: f64) -> f64 {
        let applied = self.session.set_zoom(zoom);
        self.refresh();
        applied
    }

    /// Pointer down on the preview. Returns `true` if a drag started.
    pub fn on_drag_start(&mut self, pointer_id: i32, x: f64, y: f64) -> bool {
        let started = self.controller.pointer_down(
            pointer_id,
            x,
            y,
            self.session.pan(),
            self.session.has_source(),
        );
        if started {
            self.refresh();
        }
        started
    }

    /// Pointer move. Returns `true` if the pan changed.
    pub fn on_drag_move(&mut self, pointer_id: i32, x: f64, y: f64) -> bool {
        if !self.session.has_source() {
            return false;
        }
        let geometry = self.session.geometry(self.session.preview_size());
        let max_shift = MaxShift {
            x: geometry.max_shift_x,
            y: geometry.max_shift_y,
        };

        match self.controller.pointer_move(pointer_id, x, y, max_shift) {
            Some(pan) => {
                self.session.set_pan(pan);
                self.refresh();
                true
            }
            None => false,
        }
    }

    /// Pointer up. Returns `true` if it ended the active drag.
    pub fn on_drag_end(&mut self, pointer_id: i32) -> bool {
        let ended = self.controller.pointer_up(pointer_id);
        if ended {
            self.refresh();
        }
        ended
    }

    /// Pointer cancel or lost capture. Always ends the drag.
    pub fn on_drag_cancel(&mut self) {
        self.controller.cancel();
        self.refresh();
    }

    /// Back to zoom 1, centered.
    pub fn on_reset(&mut self) {
        self.session.reset_controls();
        self.refresh();
    }

    /// Compose and encode the crop. No network access.
    pub fn prepare_save(&mut self) -> Result<PendingUpload, EditorError> {
        let Some(purpose) = self.purpose else {
            return Err(self.fail(EditorError::NotOpen));
        };

        let image = match export_session(&self.session, self.encoder.as_ref()) {
            Ok(Some(image)) => image,
            Ok(None) => return Err(self.fail(EditorError::NoImage)),
            Err(e) => return Err(self.fail(e.into())),
        };

        Ok(PendingUpload {
            image,
            hints: UploadHints {
                purpose,
                timestamp_ms: (self.clock)(),
            },
        })
    }

    /// Apply the upload outcome. Closes the dialog on success.
    pub fn complete_save(
        &mut self,
        purpose: UploadPurpose,
        outcome: Result<UploadResult, UploadError>,
    ) -> Result<SavedImage, EditorError> {
        let uploaded = match outcome {
            Ok(uploaded) => uploaded,
            Err(e) => return Err(self.fail(e.into())),
        };

        let display_url = if self.preset.cache_bust {
            uploaded.cache_busted((self.clock)())
        } else {
            uploaded.display_url.clone()
        };

        log::info!("saved {} for {}", uploaded.reference, purpose.endpoint());
        self.close();

        Ok(SavedImage {
            purpose,
            reference: uploaded.reference,
            display_url,
        })
    }

    /// Export, upload and close. Holds `&mut self` for the whole round trip.
    pub async fn on_save(&mut self) -> Result<SavedImage, EditorError> {
        let pending = self.prepare_save()?;
        let purpose = pending.hints.purpose;
        let outcome = self.client.upload(pending.image, pending.hints).await;
        self.complete_save(purpose, outcome)
    }
}
