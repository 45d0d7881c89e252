pub mod floating;

use ratatui::prelude::Rect;

use crate::constants::{CELL_PX_HEIGHT, CELL_PX_WIDTH};
use crate::window::{PxRect, PxSize};

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// Fixed pixel span of one terminal cell, used to map the manager's pixel
/// viewport onto the terminal grid and back.
///
/// Pointer cells convert to pixels at the cell's centre so hit tests do not
/// alias on region edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub cell_width: i32,
    pub cell_height: i32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            cell_width: CELL_PX_WIDTH,
            cell_height: CELL_PX_HEIGHT,
        }
    }
}

impl CellMetrics {
    /// Pixel viewport covered by a cell area.
    pub fn viewport_for(&self, area: Rect) -> PxSize {
        let width = (area.width as i32).saturating_mul(self.cell_width);
        let height = (area.height as i32).saturating_mul(self.cell_height);
        PxSize::new(
            width.clamp(0, u16::MAX as i32) as u16,
            height.clamp(0, u16::MAX as i32) as u16,
        )
    }

    /// Pixel position of a pointer cell, measured from `origin` (the cell
    /// area the viewport is anchored to).
    pub fn pointer_px(&self, origin: Rect, column: u16, row: u16) -> (i32, i32) {
        let col = column as i32 - origin.x as i32;
        let line = row as i32 - origin.y as i32;
        (
            col * self.cell_width + self.cell_width / 2,
            line * self.cell_height + self.cell_height / 2,
        )
    }

    /// Cell rectangle covering a pixel rectangle, clipped into `bounds`.
    /// Returns `None` when nothing of it lands on screen.
    pub fn project(&self, rect: PxRect, bounds: Rect) -> Option<Rect> {
        let left = div_floor(rect.x, self.cell_width);
        let top = div_floor(rect.y, self.cell_height);
        let right = div_ceil(rect.right(), self.cell_width);
        let bottom = div_ceil(rect.bottom(), self.cell_height);

        let left = (left.max(0) as u16).saturating_add(bounds.x);
        let top = (top.max(0) as u16).saturating_add(bounds.y);
        let right = (right.max(0) as u16).saturating_add(bounds.x);
        let bottom = (bottom.max(0) as u16).saturating_add(bounds.y);

        let clipped = Rect {
            x: left,
            y: top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
        .intersection(bounds);
        (clipped.width > 0 && clipped.height > 0).then_some(clipped)
    }
}

fn div_floor(value: i32, divisor: i32) -> i32 {
    value.div_euclid(divisor)
}

fn div_ceil(value: i32, divisor: i32) -> i32 {
    -(-value).div_euclid(divisor)
}
