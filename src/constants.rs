//! Shared crate-wide constants.
//!
//! All geometry is expressed in viewport pixels. The demo shell maps the
//! terminal grid onto a virtual pixel viewport using [`CELL_PX_WIDTH`] and
//! [`CELL_PX_HEIGHT`]; the manager itself never sees terminal cells.

use std::time::Duration;

/// Built-in cap on simultaneously open report windows, used until the
/// config collaborator supplies a server-side value.
pub const DEFAULT_MAX_WINDOWS: usize = 5;

/// Lower bound accepted for the configurable window cap.
pub const MAX_WINDOWS_FLOOR: usize = 1;

/// Upper bound accepted for the configurable window cap.
pub const MAX_WINDOWS_CEIL: usize = 10;

/// First cascade slot, offset from the viewport's top-left corner.
///
/// Units: pixels, (x, y).
pub const CASCADE_ORIGIN: (i32, i32) = (80, 60);

/// Diagonal advance applied to the cascade cursor after each placement.
///
/// Units: pixels, (dx, dy).
pub const CASCADE_STEP: (i32, i32) = (30, 30);

/// Right-edge margin at which the cascade cursor wraps back to
/// [`CASCADE_ORIGIN`]. A cursor past `viewport_width - CASCADE_RESET_MARGIN_X`
/// would leave too little room for a usable window.
pub const CASCADE_RESET_MARGIN_X: i32 = 500;

/// Bottom-edge counterpart of [`CASCADE_RESET_MARGIN_X`].
pub const CASCADE_RESET_MARGIN_Y: i32 = 400;

/// Widest a newly opened window will be, before the 70%-of-viewport cap.
pub const DEFAULT_WINDOW_MAX_WIDTH: u16 = 1200;

/// Tallest a newly opened window will be, before the 75%-of-viewport cap.
pub const DEFAULT_WINDOW_MAX_HEIGHT: u16 = 700;

/// Smallest width a resize gesture can reach.
pub const MIN_WINDOW_WIDTH: u16 = 400;

/// Smallest height a resize gesture can reach.
pub const MIN_WINDOW_HEIGHT: u16 = 300;

/// How much of a dragged window's origin must stay inside the viewport.
///
/// Drags clamp each origin axis to `[0, viewport_dim - DRAG_KEEP_VISIBLE_PX]`
/// so a strip of chrome always remains grabbable; the far edge may hang off
/// screen.
pub const DRAG_KEEP_VISIBLE_PX: i32 = 100;

/// Base added to the monotonic z counter when assigning z-order tokens.
pub const Z_ORDER_BASE: u32 = 1000;

/// Height of the window header band, containing the title and controls.
///
/// Units: pixels. Two terminal rows at the default cell metrics.
pub const HEADER_PX_HEIGHT: i32 = 32;

/// Width of one header control (minimize, maximize, close).
pub const CONTROL_PX_WIDTH: i32 = 24;

/// Gap between the close control and the window's right edge, so the border
/// itself stays a drag target.
pub const CONTROL_INSET_PX: i32 = 8;

/// Side of the square resize grip anchored at the bottom-right corner.
pub const RESIZE_GRIP_PX: i32 = 16;

/// Horizontal pixel span of one terminal cell in the demo projection.
pub const CELL_PX_WIDTH: i32 = 8;

/// Vertical pixel span of one terminal cell in the demo projection.
pub const CELL_PX_HEIGHT: i32 = 16;

/// Two presses on the same window header within this span count as a
/// double-click and toggle maximize.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// How long the shell keeps drawing a closed window's ghost while the close
/// transition plays. The registry entry is already gone by then.
pub const CLOSE_TRANSITION: Duration = Duration::from_millis(200);

/// How long a taskbar notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);
