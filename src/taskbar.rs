use std::time::Instant;

use crossterm::event::{Event, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
};

use crate::constants::NOTIFICATION_TTL;
use crate::layout::rect_contains;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

/// One taskbar button, projected from a managed window each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: crate::window::WindowId,
    pub title: String,
    pub minimized: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, Copy)]
struct TaskbarWindowHit {
    id: crate::window::WindowId,
    rect: Rect,
}

#[derive(Debug, Clone)]
struct Notification {
    message: String,
    expires_at: Instant,
}

impl Notification {
    fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Bottom bar listing open report windows, plus a one-row info strip
/// below it. Hidden entirely while no windows are open; the desk enters
/// windows-present mode on the first open and leaves it on the last close.
#[derive(Debug)]
pub struct Taskbar {
    visible: bool,
    height: u16,
    area: Rect,
    bottom_area: Rect,
    window_hits: Vec<TaskbarWindowHit>,
    notification: Option<Notification>,
    hostname: Option<String>,
}

impl Taskbar {
    pub fn new() -> Self {
        Self {
            visible: false,
            height: 1,
            area: Rect::default(),
            bottom_area: Rect::default(),
            window_hits: Vec::new(),
            notification: None,
            hostname: None,
        }
    }

    pub fn begin_frame(&mut self) {
        self.window_hits.clear();
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Post a transient message to the taskbar's status corner. It replaces
    /// the window counter until it expires.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification {
            message: message.into(),
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
    }

    /// Live notification text, hidden once the deadline passes even if no
    /// frame has been rendered since.
    pub fn notification(&self) -> Option<&str> {
        self.notification
            .as_ref()
            .filter(|n| !n.expired(Instant::now()))
            .map(|n| n.message.as_str())
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    /// Split the provided `area` into three regions:
    /// - managed area on top, returned for window content,
    /// - taskbar row (height `self.height`) below it, and
    /// - bottom info strip (fixed 1 row) along the last row.
    ///
    /// While the taskbar is hidden both bar areas are cleared and the entire
    /// `area` is returned as the managed region.
    pub fn split_area(&mut self, area: Rect) -> (Rect, Rect, Rect) {
        if !self.visible {
            self.area = Rect::default();
            self.bottom_area = Rect::default();
            return (Rect::default(), Rect::default(), area);
        }
        let bottom_h = 1u16.min(area.height);
        let bar_h = self.height.min(area.height.saturating_sub(bottom_h));
        let bottom = Rect {
            x: area.x,
            y: area.y.saturating_add(area.height).saturating_sub(bottom_h),
            width: area.width,
            height: bottom_h,
        };
        let bar = Rect {
            x: area.x,
            y: bottom.y.saturating_sub(bar_h),
            width: area.width,
            height: bar_h,
        };
        let managed = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height.saturating_sub(bar_h).saturating_sub(bottom_h),
        };
        self.area = bar;
        self.bottom_area = bottom;
        (bar, bottom, managed)
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        entries: &[TaskbarEntry],
        open_count: usize,
        max_windows: usize,
    ) {
        if !self.visible {
            return;
        }
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        // Fill the whole bar so entry chunks sit on a uniform background.
        for yy in bounds.y..bounds.y.saturating_add(bounds.height) {
            for xx in bounds.x..bounds.x.saturating_add(bounds.width) {
                if let Some(cell) = buffer.cell_mut((xx, yy)) {
                    let mut st = cell.style();
                    st.bg = Some(crate::theme::taskbar_bg());
                    st.fg = Some(crate::theme::taskbar_fg());
                    cell.set_style(st);
                }
            }
        }
        let mut x = area.x;
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);
        for entry in entries {
            let mut label = entry.title.clone();
            // leave room for padding
            let max_label = max_x.saturating_sub(x).saturating_sub(2) as usize;
            if label.chars().count() > max_label {
                label = truncate_to_width(&label, max_label);
            }
            let chunk = format!(" {label} ");
            let chunk_width = chunk.chars().count() as u16;
            if x.saturating_add(chunk_width) > max_x {
                break;
            }
            let item_style = if entry.focused {
                Style::default()
                    .bg(crate::theme::taskbar_entry_focused_bg())
                    .fg(crate::theme::taskbar_entry_focused_fg())
                    .add_modifier(Modifier::BOLD)
            } else if entry.minimized {
                Style::default()
                    .fg(crate::theme::taskbar_entry_minimized_fg())
                    .add_modifier(Modifier::DIM)
            } else {
                Style::default().fg(crate::theme::taskbar_fg())
            };
            safe_set_string(buffer, bounds, x, y, &chunk, item_style);
            self.window_hits.push(TaskbarWindowHit {
                id: entry.id,
                rect: Rect {
                    x,
                    y,
                    width: chunk_width,
                    height: 1,
                },
            });
            x = x.saturating_add(chunk_width);
        }

        // Status corner: a live notification wins over the window counter.
        if let Some(ref n) = self.notification
            && n.expired(Instant::now())
        {
            self.notification = None;
        }
        let (status, status_style) = match self.notification {
            Some(ref n) => (
                n.message.clone(),
                Style::default()
                    .fg(crate::theme::taskbar_warning_fg())
                    .add_modifier(Modifier::BOLD),
            ),
            None => (
                format!("{open_count} / {max_windows} windows"),
                Style::default().fg(crate::theme::taskbar_info_fg()),
            ),
        };
        let status_width = status.chars().count() as u16;
        let status_x = if status_width >= bounds.width {
            bounds.x
        } else {
            max_x.saturating_sub(status_width)
        };
        if status_width > 0 && status_x < max_x {
            let text = truncate_to_width(&status, bounds.width as usize);
            safe_set_string(buffer, bounds, status_x, y, &text, status_style);
        }

        if self.bottom_area.width > 0 && self.bottom_area.height > 0 {
            self.render_bottom(frame);
        }
    }

    fn render_bottom(&mut self, frame: &mut UiFrame<'_>) {
        let area = self.bottom_area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        // Platform string (e.g. "linux", "macos", "freebsd", "windows")
        let platform = std::env::consts::OS;
        const PKG_NAME: &str = env!("CARGO_PKG_NAME");
        const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
        let pkg_label = format!("{PKG_NAME} {PKG_VERSION}");
        // Use cached hostname if available to avoid a system call every frame.
        let hostname = if let Some(ref h) = self.hostname {
            h.clone()
        } else {
            let h = hostname::get()
                .ok()
                .and_then(|s| s.into_string().ok())
                .unwrap_or_else(|| "unknown-host".to_string());
            self.hostname = Some(h.clone());
            h
        };
        let info = format!("{pkg_label} · {platform} · {hostname}");
        let text = truncate_to_width(&info, bounds.width as usize);
        for yy in bounds.y..bounds.y.saturating_add(bounds.height) {
            for xx in bounds.x..bounds.x.saturating_add(bounds.width) {
                if let Some(cell) = buffer.cell_mut((xx, yy)) {
                    let mut st = cell.style();
                    st.bg = Some(crate::theme::taskbar_bg());
                    st.fg = Some(crate::theme::taskbar_info_fg());
                    cell.set_style(st);
                }
            }
        }
        let style = Style::default()
            .fg(crate::theme::taskbar_info_fg())
            .bg(crate::theme::taskbar_bg());
        // Right-align the text within the bottom bar bounds.
        let text_width = text.chars().count() as u16;
        let start_x = if text_width >= bounds.width {
            bounds.x
        } else {
            bounds
                .x
                .saturating_add(bounds.width)
                .saturating_sub(text_width)
        };
        let start_x = start_x.max(bounds.x);
        safe_set_string(buffer, bounds, start_x, area.y, &text, style);
    }

    pub fn hit_test_window(&self, event: &Event) -> Option<crate::window::WindowId> {
        let Event::Mouse(mouse) = event else {
            return None;
        };
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return None;
        }
        self.window_hits
            .iter()
            .find(|hit| rect_contains(hit.rect, mouse.column, mouse.row))
            .map(|hit| hit.id)
    }

    pub fn contains_point(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row) || rect_contains(self.bottom_area, column, row)
    }
}

impl Default for Taskbar {
    fn default() -> Self {
        Self::new()
    }
}
