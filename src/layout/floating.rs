//! Pure pixel-space math behind window gestures and placement.
//!
//! The manager captures gesture state on pointer-down and feeds every
//! pointer-move through the apply functions here; nothing in this module
//! touches the registry, so the clamping rules are testable in isolation.

use crate::constants::{
    CASCADE_ORIGIN, CASCADE_RESET_MARGIN_X, CASCADE_RESET_MARGIN_Y, CASCADE_STEP,
    DRAG_KEEP_VISIBLE_PX, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};
use crate::window::{PxSize, WindowId};

/// A header drag in flight: the pointer and window origin at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub id: WindowId,
    pub start_pointer: (i32, i32),
    pub start_origin: (i32, i32),
}

/// A corner resize in flight: the pointer and window size at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeState {
    pub id: WindowId,
    pub start_pointer: (i32, i32),
    pub start_size: (u16, u16),
}

/// The single pointer gesture slot. Only one pointer exists, so a drag and a
/// resize can never be in flight together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerGesture {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
}

impl PointerGesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, PointerGesture::Idle)
    }

    /// Window the gesture is acting on, if any.
    pub fn target(&self) -> Option<WindowId> {
        match self {
            PointerGesture::Idle => None,
            PointerGesture::Dragging(drag) => Some(drag.id),
            PointerGesture::Resizing(resize) => Some(resize.id),
        }
    }
}

/// New window origin for a drag, clamped so at least
/// [`DRAG_KEEP_VISIBLE_PX`] of the window stays reachable on each axis.
pub fn apply_drag(drag: &DragState, pointer: (i32, i32), viewport: PxSize) -> (i32, i32) {
    let dx = pointer.0 - drag.start_pointer.0;
    let dy = pointer.1 - drag.start_pointer.1;
    let max_x = (viewport.width as i32 - DRAG_KEEP_VISIBLE_PX).max(0);
    let max_y = (viewport.height as i32 - DRAG_KEEP_VISIBLE_PX).max(0);
    (
        (drag.start_origin.0 + dx).clamp(0, max_x),
        (drag.start_origin.1 + dy).clamp(0, max_y),
    )
}

/// New window size for a resize, floored at the minimum usable size.
pub fn apply_resize(resize: &ResizeState, pointer: (i32, i32)) -> (u16, u16) {
    let dx = pointer.0 - resize.start_pointer.0;
    let dy = pointer.1 - resize.start_pointer.1;
    let width = (resize.start_size.0 as i32 + dx).max(MIN_WINDOW_WIDTH as i32);
    let height = (resize.start_size.1 as i32 + dy).max(MIN_WINDOW_HEIGHT as i32);
    (
        width.min(u16::MAX as i32) as u16,
        height.min(u16::MAX as i32) as u16,
    )
}

/// Placement cursor for newly opened windows.
///
/// Each placement hands out the current slot and steps diagonally; once the
/// stepped cursor gets too close to the far viewport edges it wraps back to
/// the origin, repeating the cascade instead of drifting off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeCursor {
    next: (i32, i32),
}

impl Default for CascadeCursor {
    fn default() -> Self {
        Self {
            next: CASCADE_ORIGIN,
        }
    }
}

impl CascadeCursor {
    /// Takes the next placement slot and advances the cursor.
    pub fn advance(&mut self, viewport: PxSize) -> (i32, i32) {
        let slot = self.next;
        self.next.0 += CASCADE_STEP.0;
        self.next.1 += CASCADE_STEP.1;
        if self.next.0 > viewport.width as i32 - CASCADE_RESET_MARGIN_X
            || self.next.1 > viewport.height as i32 - CASCADE_RESET_MARGIN_Y
        {
            self.next = CASCADE_ORIGIN;
        }
        slot
    }
}
