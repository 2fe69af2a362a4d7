//! Preview rendering.
//!
//! The render loop is event-driven: the editor calls [`Renderer::render`]
//! after every state change and hands the resulting [`Frame`] to the host.
//! There is no animation timer.

mod canvas;
mod color;
mod preview;

pub use canvas::Canvas;
pub use color::{Color, ColorParseError};
pub use preview::{CursorHint, Frame, Placeholder, RenderStyle, Renderer, PLACEHOLDER_COLOR};
