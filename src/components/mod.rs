use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::ui::UiFrame;

pub mod confirm_overlay;
pub mod launcher;

pub use confirm_overlay::{ConfirmAction, ConfirmOverlay};
pub use launcher::{LauncherAction, LauncherOverlay};

/// Overlays draw above the desk in the area the shell hands them. Input
/// stays on each overlay's own typed event API.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect);
}

/// Center a preferred overlay size inside `area`, shrinking to fit. A
/// readable floor of 24x5 cells applies whenever the screen affords it.
pub fn overlay_rect(area: Rect, width: u16, height: u16) -> Rect {
    let min_width = if area.width >= 24 { 24 } else { 1 };
    let min_height = if area.height >= 5 { 5 } else { 1 };
    let width = width.clamp(min_width, area.width.max(1));
    let height = height.clamp(min_height, area.height.max(1));
    Rect {
        x: area.x.saturating_add(area.width.saturating_sub(width) / 2),
        y: area.y.saturating_add(area.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

/// Dim the desk behind a modal overlay.
pub fn dim_backdrop(frame: &mut UiFrame<'_>, area: Rect) {
    let buffer = frame.buffer_mut();
    let bounds = area.intersection(buffer.area);
    let dim = Style::default().add_modifier(Modifier::DIM);
    for y in bounds.y..bounds.y.saturating_add(bounds.height) {
        for x in bounds.x..bounds.x.saturating_add(bounds.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_style(dim);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn overlay_rect_centers_the_preferred_size() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 100,
            height: 27,
        };
        let r = overlay_rect(area, 40, 7);
        assert_eq!((r.x, r.y), (30, 10));
        assert_eq!((r.width, r.height), (40, 7));
    }

    #[test]
    fn overlay_rect_shrinks_to_a_small_screen() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 2,
        };
        let r = overlay_rect(area, 70, 9);
        assert_eq!((r.width, r.height), (10, 2));
    }

    #[test]
    fn overlay_rect_enforces_the_readable_floor() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 10,
        };
        let r = overlay_rect(area, 10, 2);
        assert!(r.width >= 24);
        assert!(r.height >= 5);
    }

    #[test]
    fn dim_backdrop_applies_the_dim_modifier() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 3,
        };
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        dim_backdrop(&mut ui, area);
        let cell = buf.cell((5, 1)).expect("cell present");
        assert!(cell.style().add_modifier.contains(Modifier::DIM));
    }
}
