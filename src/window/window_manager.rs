use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::widgets::Clear;

use super::decorator::{ChromeHit, DefaultDecorator, WindowChrome, WindowDecorator};
use super::{PxRect, PxSize, WindowId, WindowRecord};
use crate::constants::{
    CLOSE_TRANSITION, DEFAULT_MAX_WINDOWS, DEFAULT_WINDOW_MAX_HEIGHT, DEFAULT_WINDOW_MAX_WIDTH,
    DOUBLE_CLICK_WINDOW, MAX_WINDOWS_CEIL, MAX_WINDOWS_FLOOR, Z_ORDER_BASE,
};
use crate::layout::CellMetrics;
use crate::layout::floating::{
    CascadeCursor, DragState, PointerGesture, ResizeState, apply_drag, apply_resize,
};
use crate::taskbar::{Taskbar, TaskbarEntry};
use crate::ui::UiFrame;

/// Receives user-facing warnings raised by window operations, e.g. the
/// capacity message when an open request is refused.
pub trait NotificationSink {
    fn warn(&self, message: &str);
}

/// Sink that drops every message. Default until the shell installs its own.
#[derive(Debug, Default)]
pub struct NullNotificationSink;

impl NotificationSink for NullNotificationSink {
    fn warn(&self, _message: &str) {}
}

/// Snapshot of a window that was just removed from the registry. The shell
/// drains these and keeps painting a fading outline until `expired`.
#[derive(Debug, Clone)]
pub struct ClosingWindow {
    pub id: WindowId,
    pub title: String,
    pub geometry: PxRect,
    pub minimized: bool,
    pub closed_at: Instant,
}

impl ClosingWindow {
    pub fn expired(&self) -> bool {
        self.closed_at.elapsed() >= CLOSE_TRANSITION
    }
}

/// Owns every open report window: registry, focus, stacking, placement and
/// pointer gestures. Rendering projects this state onto the frame; nothing
/// is ever read back from what was drawn.
pub struct WindowManager<R> {
    windows: BTreeMap<WindowId, WindowRecord<R>>,
    id_counter: u32,
    z_counter: u32,
    max_windows: usize,
    active_window_id: Option<WindowId>,
    cascade: CascadeCursor,
    gesture: PointerGesture,
    last_header_press: Option<(WindowId, Instant)>,
    viewport: PxSize,
    managed_area: Rect,
    // windows removed this frame; shell drains via `take_closing_windows`
    closing: Vec<ClosingWindow>,
    taskbar: Taskbar,
    decorator: Arc<dyn WindowDecorator>,
    notifications: Arc<dyn NotificationSink>,
}

impl<R: PartialEq> WindowManager<R> {
    pub fn new(viewport: PxSize) -> Self {
        Self {
            windows: BTreeMap::new(),
            id_counter: 0,
            z_counter: 0,
            max_windows: DEFAULT_MAX_WINDOWS,
            active_window_id: None,
            cascade: CascadeCursor::default(),
            gesture: PointerGesture::Idle,
            last_header_press: None,
            viewport,
            managed_area: Rect::default(),
            closing: Vec::new(),
            taskbar: Taskbar::new(),
            decorator: Arc::new(DefaultDecorator),
            notifications: Arc::new(NullNotificationSink),
        }
    }

    pub fn set_decorator(&mut self, decorator: Arc<dyn WindowDecorator>) {
        self.decorator = decorator;
    }

    pub fn set_notification_sink(&mut self, sink: Arc<dyn NotificationSink>) {
        self.notifications = sink;
    }

    /// Open a window for `report`, or refocus the one already showing it.
    /// Returns `None` when the open limit is reached; the request leaves the
    /// registry untouched and a warning goes to the notification sink.
    pub fn open_window(&mut self, report: R, title: &str, content_source: &str) -> Option<WindowId> {
        let existing = self
            .windows
            .iter()
            .find(|(_, record)| record.report == report)
            .map(|(id, _)| *id);
        if let Some(id) = existing {
            if let Some(record) = self.windows.get_mut(&id) {
                record.minimized = false;
            }
            self.focus_window(id);
            tracing::debug!(window_id = %id, "report already open, refocusing");
            return Some(id);
        }

        if self.windows.len() >= self.max_windows {
            let message = format!(
                "Maximum {} windows allowed. Close one to open another.",
                self.max_windows
            );
            tracing::warn!(max_windows = self.max_windows, "window limit reached");
            self.taskbar.notify(message.clone());
            self.notifications.warn(&message);
            return None;
        }

        self.id_counter += 1;
        let id = WindowId(self.id_counter);
        let geometry = self.next_geometry();
        let record = WindowRecord::new(id, report, title, content_source, geometry);
        self.windows.insert(id, record);
        self.taskbar.set_visible(true);
        self.focus_window(id);
        tracing::debug!(window_id = %id, title, "opened window");
        Some(id)
    }

    /// Remove the window and queue its outline for the close transition.
    /// Focus falls back to the most recently opened remaining window.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        let Some(record) = self.windows.remove(&id) else {
            return false;
        };
        tracing::debug!(window_id = %id, "closing window");
        if self.gesture.target() == Some(id) {
            self.gesture = PointerGesture::Idle;
        }
        if self
            .last_header_press
            .is_some_and(|(pressed, _)| pressed == id)
        {
            self.last_header_press = None;
        }
        self.closing.push(ClosingWindow {
            id,
            title: record.title().to_string(),
            geometry: record.geometry(),
            minimized: record.is_minimized(),
            closed_at: Instant::now(),
        });
        if self.windows.is_empty() {
            self.active_window_id = None;
            self.taskbar.set_visible(false);
        } else if let Some(last) = self.windows.keys().next_back().copied() {
            self.focus_window(last);
        }
        true
    }

    pub fn close_all(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for id in ids {
            self.close_window(id);
        }
    }

    pub fn take_closing_windows(&mut self) -> Vec<ClosingWindow> {
        std::mem::take(&mut self.closing)
    }

    /// Raise the window above everything else and make it active. Minimized
    /// state is left alone; callers restore first where that is wanted.
    pub fn focus_window(&mut self, id: WindowId) {
        if !self.windows.contains_key(&id) {
            return;
        }
        self.z_counter += 1;
        let token = Z_ORDER_BASE + self.z_counter;
        if let Some(record) = self.windows.get_mut(&id) {
            record.z_token = token;
        }
        self.active_window_id = Some(id);
    }

    pub fn toggle_minimize(&mut self, id: WindowId) {
        let Some(record) = self.windows.get_mut(&id) else {
            return;
        };
        let minimized = !record.minimized;
        record.minimized = minimized;
        if minimized {
            tracing::debug!(window_id = %id, "minimized window");
            if self.gesture.target() == Some(id) {
                self.gesture = PointerGesture::Idle;
            }
            if self.active_window_id == Some(id) {
                self.focus_fallback_visible();
            }
        } else {
            tracing::debug!(window_id = %id, "restored window");
            self.focus_window(id);
        }
    }

    pub fn toggle_maximize(&mut self, id: WindowId) {
        let full = self.viewport.full_rect();
        let Some(record) = self.windows.get_mut(&id) else {
            return;
        };
        if record.maximized {
            record.maximized = false;
            if let Some(prior) = record.prior_geometry.take() {
                record.geometry = prior;
            }
            tracing::debug!(window_id = %id, "unmaximized window");
        } else {
            record.maximized = true;
            record.prior_geometry = Some(record.geometry);
            record.geometry = full;
            tracing::debug!(window_id = %id, "maximized window");
        }
        if self.gesture.target() == Some(id) {
            self.gesture = PointerGesture::Idle;
        }
        self.focus_window(id);
    }

    /// Clamp and apply a new open limit. Windows already past the limit stay
    /// open; only further opens are refused.
    pub fn set_max_windows(&mut self, requested: usize) {
        let clamped = requested.clamp(MAX_WINDOWS_FLOOR, MAX_WINDOWS_CEIL);
        if clamped != requested {
            tracing::warn!(requested, clamped, "window limit out of range, clamped");
        }
        self.max_windows = clamped;
    }

    /// Escape restores the active window when it is maximized. Returns
    /// whether the key was consumed.
    pub fn escape_pressed(&mut self) -> bool {
        if let Some(id) = self.active_window_id
            && self
                .windows
                .get(&id)
                .is_some_and(|record| record.maximized)
        {
            self.toggle_maximize(id);
            return true;
        }
        false
    }

    pub fn content_loaded(&mut self, id: WindowId) {
        if let Some(record) = self.windows.get_mut(&id) {
            record.loading = false;
        }
    }

    /// Taskbar button: restore when minimized, minimize when already active,
    /// otherwise bring to front.
    pub fn taskbar_clicked(&mut self, id: WindowId) {
        let Some(record) = self.windows.get(&id) else {
            return;
        };
        if record.minimized || self.active_window_id == Some(id) {
            self.toggle_minimize(id);
        } else {
            self.focus_window(id);
        }
    }

    pub fn set_viewport(&mut self, viewport: PxSize) {
        self.viewport = viewport;
        let full = viewport.full_rect();
        for record in self.windows.values_mut() {
            if record.maximized {
                record.geometry = full;
            }
        }
    }

    pub fn pointer_pressed(&mut self, x: i32, y: i32) -> bool {
        let Some(id) = self.window_at(x, y) else {
            return false;
        };
        let Some(record) = self.windows.get(&id) else {
            return false;
        };
        let rect = record.geometry;
        let maximized = record.maximized;
        let mut hit = self.decorator.hit_test(rect, x, y);
        if maximized && hit == ChromeHit::Resize {
            // the grip is not shown while maximized
            hit = ChromeHit::Body;
        }
        match hit {
            ChromeHit::Resize => {
                self.gesture = PointerGesture::Resizing(ResizeState {
                    id,
                    start_pointer: (x, y),
                    start_size: (rect.width, rect.height),
                });
            }
            ChromeHit::Minimize => {
                self.focus_window(id);
                self.last_header_press = None;
                self.toggle_minimize(id);
            }
            ChromeHit::Maximize => {
                self.focus_window(id);
                self.last_header_press = None;
                self.toggle_maximize(id);
            }
            ChromeHit::Close => {
                self.focus_window(id);
                self.last_header_press = None;
                self.close_window(id);
            }
            ChromeHit::Header => {
                self.focus_window(id);
                let now = Instant::now();
                if let Some((prev_id, prev)) = self.last_header_press
                    && prev_id == id
                    && now.duration_since(prev) <= DOUBLE_CLICK_WINDOW
                {
                    self.last_header_press = None;
                    self.toggle_maximize(id);
                    return true;
                }
                self.last_header_press = Some((id, now));
                if !maximized {
                    self.gesture = PointerGesture::Dragging(DragState {
                        id,
                        start_pointer: (x, y),
                        start_origin: (rect.x, rect.y),
                    });
                }
            }
            ChromeHit::Body => {
                self.focus_window(id);
            }
            ChromeHit::Miss => return false,
        }
        true
    }

    pub fn pointer_moved(&mut self, x: i32, y: i32) -> bool {
        match self.gesture {
            PointerGesture::Dragging(drag) => {
                let (left, top) = apply_drag(&drag, (x, y), self.viewport);
                if let Some(record) = self.windows.get_mut(&drag.id) {
                    record.geometry.x = left;
                    record.geometry.y = top;
                }
                true
            }
            PointerGesture::Resizing(resize) => {
                let (width, height) = apply_resize(&resize, (x, y));
                if let Some(record) = self.windows.get_mut(&resize.id) {
                    record.geometry.width = width;
                    record.geometry.height = height;
                }
                true
            }
            PointerGesture::Idle => false,
        }
    }

    /// Release always commits; the geometry was applied while moving.
    pub fn pointer_released(&mut self) -> bool {
        if self.gesture.is_idle() {
            return false;
        }
        self.gesture = PointerGesture::Idle;
        true
    }

    /// Route a terminal event. Taskbar clicks are resolved in cell space;
    /// everything over the desk is converted to pixels first.
    pub fn handle_event(&mut self, event: &Event, metrics: CellMetrics) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        match mouse.kind {
            MouseEventKind::Down(_) => {
                if let Some(id) = self.taskbar.hit_test_window(event) {
                    self.taskbar_clicked(id);
                    return true;
                }
                if self.taskbar.contains_point(mouse.column, mouse.row) {
                    return true;
                }
                let (x, y) = metrics.pointer_px(self.managed_area, mouse.column, mouse.row);
                self.pointer_pressed(x, y)
            }
            MouseEventKind::Drag(_) => {
                let (x, y) = metrics.pointer_px(self.managed_area, mouse.column, mouse.row);
                self.pointer_moved(x, y)
            }
            MouseEventKind::Up(_) => self.pointer_released(),
            _ => false,
        }
    }

    /// Draw every visible window back to front, then the taskbar. The frame
    /// area is split first so the desk always reflects the current terminal
    /// size.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, metrics: CellMetrics) {
        let area = frame.area();
        let (_bar, _bottom, managed) = self.taskbar.split_area(area);
        self.managed_area = managed;
        let viewport = metrics.viewport_for(managed);
        if viewport != self.viewport {
            self.set_viewport(viewport);
        }

        for id in self.stacking_order() {
            let Some(record) = self.windows.get(&id) else {
                continue;
            };
            if record.minimized {
                continue;
            }
            let Some(cells) = metrics.project(record.geometry, managed) else {
                continue;
            };
            frame.render_widget(Clear, cells);
            let view = WindowChrome {
                title: &record.title,
                content_source: &record.content_source,
                focused: self.active_window_id == Some(id),
                maximized: record.maximized,
                loading: record.loading,
            };
            self.decorator.render_window(frame, cells, managed, view);
        }

        let entries = self.taskbar_entries();
        let open = self.windows.len();
        let max = self.max_windows;
        self.taskbar.begin_frame();
        self.taskbar.render(frame, &entries, open, max);
    }

    /// Ids ordered bottom to top of the stack.
    pub fn stacking_order(&self) -> Vec<WindowId> {
        let mut order: Vec<(WindowId, u32)> = self
            .windows
            .iter()
            .map(|(id, record)| (*id, record.z_token))
            .collect();
        order.sort_by_key(|&(_, z)| z);
        order.into_iter().map(|(id, _)| id).collect()
    }

    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        self.windows
            .iter()
            .map(|(id, record)| TaskbarEntry {
                id: *id,
                title: record.title().to_string(),
                minimized: record.minimized,
                focused: self.active_window_id == Some(*id),
            })
            .collect()
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowRecord<R>> {
        self.windows.get(&id)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn max_windows(&self) -> usize {
        self.max_windows
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.active_window_id
    }

    pub fn viewport(&self) -> PxSize {
        self.viewport
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    /// Surface a transient message in the taskbar status corner.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.taskbar.notify(message);
    }

    /// Screen cells currently given to windows, excluding the taskbar rows.
    pub fn managed_area(&self) -> Rect {
        self.managed_area
    }

    fn next_geometry(&mut self) -> PxRect {
        let (x, y) = self.cascade.advance(self.viewport);
        let width = ((self.viewport.width as u32 * 7) / 10).min(DEFAULT_WINDOW_MAX_WIDTH as u32);
        let height = ((self.viewport.height as u32 * 3) / 4).min(DEFAULT_WINDOW_MAX_HEIGHT as u32);
        PxRect {
            x,
            y,
            width: width as u16,
            height: height as u16,
        }
    }

    /// Topmost visible window under the pointer.
    fn window_at(&self, x: i32, y: i32) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|(_, record)| !record.minimized && record.geometry.contains(x, y))
            .max_by_key(|(_, record)| record.z_token)
            .map(|(id, _)| *id)
    }

    fn focus_fallback_visible(&mut self) {
        let fallback = self
            .windows
            .iter()
            .filter(|(_, record)| !record.minimized)
            .map(|(id, _)| *id)
            .next_back();
        match fallback {
            Some(next) => self.focus_window(next),
            None => self.active_window_id = None,
        }
    }
}
