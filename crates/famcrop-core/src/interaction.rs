//! Pointer-drag state machine for panning the crop.
//!
//! ```text
//! Idle --pointer_down (source loaded)--> Dragging
//! Dragging --pointer_up (same id)------> Idle
//! Dragging --cancel--------------------> Idle
//! ```
//!
//! The controller never touches the session directly. It turns pointer
//! positions into pan offsets and leaves applying them to the caller.

use crate::transform::PanOffset;

/// Where a drag started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub pointer_id: i32,
    pub start_x: f64,
    pub start_y: f64,
    pub start_offset: PanOffset,
}

/// Current drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragAnchor),
}

/// Maximum shift in pixels on each axis, from the cover geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaxShift {
    pub x: f64,
    pub y: f64,
}

/// Tracks a single-pointer drag and converts pointer motion to pan offsets.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: DragState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Pointer id of the drag in progress, if any.
    pub fn active_pointer(&self) -> Option<i32> {
        match self.state {
            DragState::Dragging(anchor) => Some(anchor.pointer_id),
            DragState::Idle => None,
        }
    }

    /// Start a drag. Returns `true` if the drag started.
    ///
    /// Ignored when no source is loaded or another pointer is already dragging.
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        x: f64,
        y: f64,
        current: PanOffset,
        has_source: bool,
    ) -> bool {
        if !has_source || self.is_dragging() {
            return false;
        }

        self.state = DragState::Dragging(DragAnchor {
            pointer_id,
            start_x: x,
            start_y: y,
            start_offset: current,
        });
        log::debug!("drag start pointer={pointer_id} at ({x}, {y})");
        true
    }

    /// Compute the pan for a pointer move.
    ///
    /// Returns `None` when idle or when the move belongs to another pointer.
    /// An axis with zero slack keeps its starting offset.
    pub fn pointer_move(&self, pointer_id: i32, x: f64, y: f64, max_shift: MaxShift) -> Option<PanOffset> {
        let anchor = match self.state {
            DragState::Dragging(anchor) if anchor.pointer_id == pointer_id => anchor,
            _ => return None,
        };

        let dx = x - anchor.start_x;
        let dy = y - anchor.start_y;
        let mut offset = anchor.start_offset;

        if max_shift.x > 0.0 {
            offset.x = anchor.start_offset.x - dx / max_shift.x;
        }
        if max_shift.y > 0.0 {
            offset.y = anchor.start_offset.y - dy / max_shift.y;
        }

        Some(offset.clamped())
    }

    /// End the drag for `pointer_id`. Returns `true` if a drag ended.
    pub fn pointer_up(&mut self, pointer_id: i32) -> bool {
        if self.active_pointer() != Some(pointer_id) {
            return false;
        }
        self.state = DragState::Idle;
        log::debug!("drag end pointer={pointer_id}");
        true
    }

    /// Abort any drag. Safe to call when idle.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
