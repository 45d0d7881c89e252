use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::constants::{CONTROL_INSET_PX, CONTROL_PX_WIDTH, HEADER_PX_HEIGHT, RESIZE_GRIP_PX};
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};
use crate::window::PxRect;

/// Chrome region a pixel coordinate falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeHit {
    Minimize,
    Maximize,
    Close,
    /// Header band outside the controls; a press here starts a drag.
    Header,
    /// Resize grip at the bottom-right corner.
    Resize,
    Body,
    Miss,
}

/// What the decorator needs to know about a window to draw it.
#[derive(Debug, Clone, Copy)]
pub struct WindowChrome<'a> {
    pub title: &'a str,
    pub content_source: &'a str,
    pub focused: bool,
    pub maximized: bool,
    pub loading: bool,
}

/// Draws window chrome and maps pixel coordinates back onto it.
///
/// Hit regions are defined in pixels against the window's pixel rectangle so
/// they stay in lockstep with the gesture math; rendering happens in the
/// projected cell rectangle.
pub trait WindowDecorator: std::fmt::Debug {
    fn hit_test(&self, rect: PxRect, x: i32, y: i32) -> ChromeHit {
        if !rect.contains(x, y) {
            return ChromeHit::Miss;
        }
        if x >= rect.right() - RESIZE_GRIP_PX && y >= rect.bottom() - RESIZE_GRIP_PX {
            return ChromeHit::Resize;
        }
        if y < rect.y + HEADER_PX_HEIGHT {
            let controls_right = rect.right() - CONTROL_INSET_PX;
            let controls_left = controls_right - 3 * CONTROL_PX_WIDTH;
            if x >= controls_left && x < controls_right {
                return match (x - controls_left) / CONTROL_PX_WIDTH {
                    0 => ChromeHit::Minimize,
                    1 => ChromeHit::Maximize,
                    _ => ChromeHit::Close,
                };
            }
            return ChromeHit::Header;
        }
        ChromeHit::Body
    }

    fn render_window(&self, frame: &mut UiFrame<'_>, cells: Rect, bounds: Rect, view: WindowChrome<'_>);
}

#[derive(Debug, Default)]
pub struct DefaultDecorator;

impl WindowDecorator for DefaultDecorator {
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        cells: Rect,
        bounds: Rect,
        view: WindowChrome<'_>,
    ) {
        if cells.width < 2 || cells.height < 2 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = bounds.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }

        let header_style = if view.focused {
            Style::default()
                .bg(crate::theme::header_focused_bg())
                .fg(crate::theme::header_focused_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(crate::theme::header_bg())
                .fg(crate::theme::header_fg())
        };
        let border_style = if view.focused {
            Style::default().fg(crate::theme::window_border_focused())
        } else {
            Style::default().fg(crate::theme::window_border())
        };
        let body_style = Style::default().fg(crate::theme::window_body_fg());

        let left = cells.x;
        let top = cells.y;
        let right = cells.x.saturating_add(cells.width).saturating_sub(1);
        let bottom = cells.y.saturating_add(cells.height).saturating_sub(1);
        let in_bounds = |x: u16, y: u16| crate::layout::rect_contains(bounds, x, y);

        // Body fill, so lower windows do not bleed through.
        for y in top.saturating_add(1)..bottom {
            for x in left.saturating_add(1)..right {
                if in_bounds(x, y)
                    && let Some(cell) = buffer.cell_mut((x, y))
                {
                    cell.set_symbol(" ");
                    cell.set_style(body_style);
                }
            }
        }

        // Border
        for x in left..=right {
            if in_bounds(x, top)
                && let Some(cell) = buffer.cell_mut((x, top))
            {
                let symbol = if x == left {
                    "┌"
                } else if x == right {
                    "┐"
                } else {
                    "─"
                };
                cell.set_symbol(symbol);
                cell.set_style(border_style);
            }
            if in_bounds(x, bottom)
                && let Some(cell) = buffer.cell_mut((x, bottom))
            {
                let symbol = if x == left {
                    "└"
                } else if x == right {
                    "┘"
                } else {
                    "─"
                };
                cell.set_symbol(symbol);
                cell.set_style(border_style);
            }
        }
        for y in top.saturating_add(1)..bottom {
            if in_bounds(left, y)
                && let Some(cell) = buffer.cell_mut((left, y))
            {
                cell.set_symbol("│");
                cell.set_style(border_style);
            }
            if in_bounds(right, y)
                && let Some(cell) = buffer.cell_mut((right, y))
            {
                cell.set_symbol("│");
                cell.set_style(border_style);
            }
        }

        // Header row: title on the left, controls on the right.
        let header_y = top.saturating_add(1);
        if header_y < bottom {
            for x in left.saturating_add(1)..right {
                if in_bounds(x, header_y)
                    && let Some(cell) = buffer.cell_mut((x, header_y))
                {
                    cell.set_symbol(" ");
                    cell.set_style(header_style);
                }
            }

            let controls = controls_label(view.maximized);
            let controls_width = controls.chars().count() as u16;
            let inner_width = right.saturating_sub(left).saturating_sub(1);
            let controls_x = right.saturating_sub(1).saturating_sub(controls_width);
            if inner_width > controls_width.saturating_add(2) {
                let title_width = inner_width.saturating_sub(controls_width).saturating_sub(2);
                let title = truncate_to_width(view.title, title_width as usize);
                safe_set_string(buffer, bounds, left.saturating_add(2), header_y, &title, header_style);
            }
            safe_set_string(buffer, bounds, controls_x, header_y, controls, header_style);
            // Close gets its own tint even inside the shared label.
            let close_x = controls_x.saturating_add(controls_width).saturating_sub(2);
            if in_bounds(close_x, header_y)
                && let Some(cell) = buffer.cell_mut((close_x, header_y))
            {
                cell.set_style(header_style.fg(crate::theme::close_control_fg()));
            }
        }

        // Body: loading indicator, then the content surface placeholder.
        let body_top = header_y.saturating_add(1);
        if view.loading && body_top < bottom {
            safe_set_string(
                buffer,
                bounds,
                left.saturating_add(2),
                body_top,
                "Loading report...",
                Style::default().fg(crate::theme::loading_fg()),
            );
        }
        let source_y = body_top.saturating_add(1);
        if source_y < bottom {
            let label = format!("src: {}", view.content_source);
            let max = right.saturating_sub(left).saturating_sub(3);
            safe_set_string(
                buffer,
                bounds,
                left.saturating_add(2),
                source_y,
                &truncate_to_width(&label, max as usize),
                body_style.add_modifier(Modifier::DIM),
            );
        }

        // Resize grip, omitted while maximized.
        if !view.maximized
            && in_bounds(right, bottom)
            && let Some(cell) = buffer.cell_mut((right, bottom))
        {
            cell.set_symbol("◢");
            cell.set_style(Style::default().fg(crate::theme::resize_grip_fg()));
        }
    }
}

/// Control glyph strip: `─` minimize, `□` maximize (`❐` restore), `×` close.
fn controls_label(maximized: bool) -> &'static str {
    if maximized { " ─ ❐ × " } else { " ─ □ × " }
}
