//! Frame production for the interactive preview.

use serde::{Deserialize, Serialize};

use crate::mask::MaskShape;
use crate::session::CropSession;

use super::{Canvas, Color};

/// Text color of the "no image" placeholder.
pub const PLACEHOLDER_COLOR: Color = Color::rgb(0x5b, 0x7e, 0xa9);

/// Cursor the host should show over the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorHint {
    Default,
    Grab,
    Grabbing,
}

impl CursorHint {
    /// CSS `cursor` value.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Grab => "grab",
            CursorHint::Grabbing => "grabbing",
        }
    }
}

/// Centered label the host draws when no image is loaded.
///
/// Text rendering stays on the host side, which has the fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub text: String,
    pub color: Color,
}

/// One rendered preview.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub canvas: Canvas,
    pub cursor: CursorHint,
    pub placeholder: Option<Placeholder>,
    /// Increases on every render of the owning renderer.
    pub sequence: u64,
}

/// Look of the preview for one call site.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub background: Color,
    pub mask: MaskShape,
    pub placeholder_label: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::rgb(0xea, 0xf4, 0xff),
            mask: MaskShape::Rectangle,
            placeholder_label: "Choose an image".to_string(),
        }
    }
}

/// Draws preview frames from a session.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: RenderStyle,
    sequence: u64,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style, sequence: 0 }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Render the preview for the current session state.
    pub fn render(&mut self, session: &CropSession, dragging: bool) -> Frame {
        self.sequence += 1;
        let target = session.preview_size();
        let mut canvas = Canvas::filled(target, self.style.background);

        let Some(source) = session.source() else {
            return Frame {
                canvas,
                cursor: CursorHint::Default,
                placeholder: Some(Placeholder {
                    text: self.style.placeholder_label.clone(),
                    color: PLACEHOLDER_COLOR,
                }),
                sequence: self.sequence,
            };
        };

        let rect = session.draw_rect(target);
        let clip = self.style.mask.clip_for(target);
        canvas.draw_image(source, rect, clip.as_ref());
        if let Some(clip) = &clip {
            canvas.stroke_ring(clip);
        }

        Frame {
            canvas,
            cursor: if dragging {
                CursorHint::Grabbing
            } else {
                CursorHint::Grab
            },
            placeholder: None,
            sequence: self.sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodedImage;
    use crate::transform::{Dimensions, PanOffset};

    fn session(preview: u32) -> CropSession {
        CropSession::new(
            Dimensions::new(preview, preview),
            Dimensions::new(preview, preview),
            3.0,
        )
    }

    #[test]
    fn test_placeholder_without_source() {
        let mut renderer = Renderer::default();
        let frame = renderer.render(&session(20), false);

        assert_eq!(frame.cursor, CursorHint::Default);
        let placeholder = frame.placeholder.unwrap();
        assert_eq!(placeholder.text, "Choose an image");
        assert_eq!(placeholder.color, PLACEHOLDER_COLOR);
        assert_eq!(frame.canvas.pixel(10, 10), [0xea, 0xf4, 0xff, 255]);
    }

    #[test]
    fn test_cursor_follows_drag() {
        let mut renderer = Renderer::default();
        let mut s = session(20);
        s.load_source(DecodedImage::solid(4, 4, [0, 0, 0, 255]));

        assert_eq!(renderer.render(&s, false).cursor, CursorHint::Grab);
        assert_eq!(renderer.render(&s, true).cursor, CursorHint::Grabbing);
    }

    #[test]
    fn test_sequence_increases() {
        let mut renderer = Renderer::default();
        let s = session(4);
        let a = renderer.render(&s, false).sequence;
        let b = renderer.render(&s, false).sequence;
        assert!(b > a);
    }

    #[test]
    fn test_rectangle_preview_fully_covered() {
        let mut renderer = Renderer::default();
        let mut s = session(30);
        s.load_source(DecodedImage::solid(40, 20, [200, 0, 0, 255]));
        s.set_pan(PanOffset::new(1.0, 0.0));

        let frame = renderer.render(&s, false);

        assert!(frame.placeholder.is_none());
        for (x, y) in [(0, 0), (29, 0), (0, 29), (29, 29), (15, 15)] {
            assert_eq!(frame.canvas.pixel(x, y), [200, 0, 0, 255]);
        }
    }

    #[test]
    fn test_circle_preview_keeps_background_corners() {
        let mut renderer = Renderer::new(RenderStyle {
            mask: MaskShape::Circle,
            ..RenderStyle::default()
        });
        let mut s = session(100);
        s.load_source(DecodedImage::solid(100, 100, [0, 0, 0, 255]));

        let frame = renderer.render(&s, false);

        assert_eq!(frame.canvas.pixel(0, 0), [0xea, 0xf4, 0xff, 255]);
        assert_eq!(frame.canvas.pixel(50, 50), [0, 0, 0, 255]);
    }

    #[test]
    fn test_cursor_css() {
        assert_eq!(CursorHint::Grab.as_css(), "grab");
        assert_eq!(CursorHint::Grabbing.as_css(), "grabbing");
        assert_eq!(CursorHint::Default.as_css(), "default");
    }
}
