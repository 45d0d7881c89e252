use crossterm::event::{Event, KeyCode, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use crate::components::{Component, overlay_rect};
use crate::layout::rect_contains;
use crate::services::ReportDescriptor;
use crate::ui::{UiFrame, safe_set_string};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherAction {
    Open(String),
    Dismiss,
}

/// Centered overlay listing the report directory. Enter or a mouse click
/// opens the highlighted report; exportable reports carry a `⇣` marker.
pub struct LauncherOverlay {
    visible: bool,
    reports: Vec<ReportDescriptor>,
    selected: usize,
    offset: usize,
    dialog_rect: Option<Rect>,
    list_rect: Option<Rect>,
}

impl LauncherOverlay {
    pub fn new(reports: Vec<ReportDescriptor>) -> Self {
        Self {
            visible: false,
            reports,
            selected: 0,
            offset: 0,
            dialog_rect: None,
            list_rect: None,
        }
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn selected_report(&self) -> Option<&ReportDescriptor> {
        self.reports.get(self.selected)
    }

    fn bump_selection(&mut self, delta: isize) {
        if self.reports.is_empty() {
            self.selected = 0;
            return;
        }
        if delta.is_negative() {
            self.selected = self.selected.saturating_sub(delta.unsigned_abs());
        } else {
            self.selected = (self.selected + delta as usize).min(self.reports.len() - 1);
        }
    }

    fn keep_selected_in_view(&mut self, view: usize) {
        if view == 0 || self.reports.is_empty() {
            self.offset = 0;
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + view {
            self.offset = self.selected + 1 - view;
        }
    }

    fn row_label(report: &ReportDescriptor) -> String {
        if report.can_export {
            format!("{} ⇣", report.name)
        } else {
            report.name.clone()
        }
    }

    pub fn handle_launcher_event(&mut self, event: &Event) -> Option<LauncherAction> {
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.bump_selection(-1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.bump_selection(1);
                    None
                }
                KeyCode::PageUp => {
                    self.bump_selection(-5);
                    None
                }
                KeyCode::PageDown => {
                    self.bump_selection(5);
                    None
                }
                KeyCode::Home => {
                    self.selected = 0;
                    None
                }
                KeyCode::End => {
                    if !self.reports.is_empty() {
                        self.selected = self.reports.len() - 1;
                    }
                    None
                }
                KeyCode::Enter => self
                    .selected_report()
                    .map(|report| LauncherAction::Open(report.id.clone())),
                KeyCode::Esc => Some(LauncherAction::Dismiss),
                _ => None,
            },
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                if let Some(rows) = self.list_rect
                    && rect_contains(rows, mouse.column, mouse.row)
                {
                    let index = (mouse.row - rows.y) as usize + self.offset;
                    if index < self.reports.len() {
                        self.selected = index;
                        return self
                            .selected_report()
                            .map(|report| LauncherAction::Open(report.id.clone()));
                    }
                    return None;
                }
                if self
                    .dialog_rect
                    .is_some_and(|rect| !rect_contains(rect, mouse.column, mouse.row))
                {
                    return Some(LauncherAction::Dismiss);
                }
                None
            }
            _ => None,
        }
    }
}

impl Component for LauncherOverlay {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        self.dialog_rect = None;
        self.list_rect = None;
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let preferred_rows = self.reports.len().clamp(1, 10) as u16;
        let rect = overlay_rect(area, 46, preferred_rows.saturating_add(4));
        self.dialog_rect = Some(rect);
        let block = Block::default()
            .title("Reports")
            .borders(Borders::ALL)
            .style(
                Style::default()
                    .bg(crate::theme::dialog_bg())
                    .fg(crate::theme::dialog_fg()),
            );
        let border_inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
        // one spare column inside each border edge
        let inner = Rect {
            x: border_inner.x.saturating_add(1),
            y: border_inner.y,
            width: border_inner.width.saturating_sub(2),
            height: border_inner.height,
        };
        let rows = Rect {
            x: inner.x,
            y: inner.y,
            width: inner.width,
            height: inner.height.saturating_sub(1),
        };
        if rows.height == 0 || rows.width == 0 {
            return;
        }
        let view = rows.height as usize;
        self.keep_selected_in_view(view);

        let items = self
            .reports
            .iter()
            .skip(self.offset)
            .take(view)
            .map(|report| ListItem::new(Self::row_label(report)))
            .collect::<Vec<_>>();
        let mut state = ListState::default();
        if !self.reports.is_empty() && self.selected >= self.offset {
            state.select(Some(self.selected - self.offset));
        }
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(crate::theme::launcher_selected_bg())
                .fg(crate::theme::launcher_selected_fg())
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, rows, &mut state);
        self.list_rect = Some(rows);

        let hint = "Enter open · F2 close";
        let hint_y = inner.y.saturating_add(inner.height.saturating_sub(1));
        let buffer = frame.buffer_mut();
        let bounds = rect.intersection(buffer.area);
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            hint_y,
            hint,
            Style::default().fg(crate::theme::dialog_separator()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent};
    use ratatui::buffer::Buffer;

    fn report(id: &str, name: &str, can_export: bool) -> ReportDescriptor {
        ReportDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            embed_url: format!("https://bi.example/embed/{id}"),
            can_export,
        }
    }

    fn launcher() -> LauncherOverlay {
        LauncherOverlay::new(vec![
            report("a", "Alpha", false),
            report("b", "Beta", true),
            report("c", "Gamma", false),
        ])
    }

    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn selection_moves_with_keys() {
        let mut l = launcher();
        assert!(l.handle_launcher_event(&key_event(KeyCode::Down)).is_none());
        assert_eq!(l.selected_report().unwrap().id, "b");
        assert!(l.handle_launcher_event(&key_event(KeyCode::Up)).is_none());
        assert_eq!(l.selected_report().unwrap().id, "a");
    }

    #[test]
    fn home_and_end_keys() {
        let mut l = launcher();
        let _ = l.handle_launcher_event(&key_event(KeyCode::End));
        assert_eq!(l.selected_report().unwrap().id, "c");
        let _ = l.handle_launcher_event(&key_event(KeyCode::Home));
        assert_eq!(l.selected_report().unwrap().id, "a");
    }

    #[test]
    fn enter_opens_the_selected_report() {
        let mut l = launcher();
        let _ = l.handle_launcher_event(&key_event(KeyCode::Down));
        assert_eq!(
            l.handle_launcher_event(&key_event(KeyCode::Enter)),
            Some(LauncherAction::Open("b".to_string()))
        );
    }

    #[test]
    fn escape_dismisses() {
        let mut l = launcher();
        assert_eq!(
            l.handle_launcher_event(&key_event(KeyCode::Esc)),
            Some(LauncherAction::Dismiss)
        );
    }

    #[test]
    fn mouse_click_selects_and_opens_a_row() {
        let mut l = launcher();
        l.list_rect = Some(Rect {
            x: 4,
            y: 6,
            width: 30,
            height: 3,
        });
        l.dialog_rect = Some(Rect {
            x: 2,
            y: 5,
            width: 34,
            height: 6,
        });
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 8,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            l.handle_launcher_event(&click),
            Some(LauncherAction::Open("c".to_string()))
        );
        assert_eq!(l.selected_report().unwrap().id, "c");
    }

    #[test]
    fn click_outside_the_dialog_dismisses() {
        let mut l = launcher();
        l.dialog_rect = Some(Rect {
            x: 2,
            y: 5,
            width: 34,
            height: 6,
        });
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 70,
            row: 20,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(l.handle_launcher_event(&click), Some(LauncherAction::Dismiss));
    }

    #[test]
    fn render_draws_the_directory_box_and_records_hit_rects() {
        let mut l = launcher();
        l.open();
        let area = Rect {
            x: 0,
            y: 0,
            width: 60,
            height: 15,
        };
        let mut buf = Buffer::empty(area);
        let mut ui = crate::ui::UiFrame::from_parts(area, &mut buf);
        l.render(&mut ui, area);

        let rect = l.dialog_rect.expect("dialog rect recorded");
        assert_eq!((rect.width, rect.height), (46, 7));
        let rows = l.list_rect.expect("list rect recorded");
        assert_eq!(rows.height, 4);

        let line = |y: u16| -> String {
            (area.x..area.width)
                .map(|x| buf.cell((x, y)).expect("cell present").symbol().to_string())
                .collect()
        };
        assert!(line(rect.y).contains("Reports"));
        assert!(line(rows.y).contains("Alpha"));
        assert!(
            line(rect.y + rect.height - 2).contains("Enter open · F2 close"),
            "hint row sits above the bottom border"
        );
    }

    #[test]
    fn exportable_reports_carry_a_marker() {
        assert_eq!(
            LauncherOverlay::row_label(&report("b", "Beta", true)),
            "Beta ⇣"
        );
        assert_eq!(
            LauncherOverlay::row_label(&report("a", "Alpha", false)),
            "Alpha"
        );
    }

    #[test]
    fn selection_scrolls_into_view() {
        let reports = (0..20)
            .map(|i| report(&format!("r{i}"), &format!("Report {i}"), false))
            .collect();
        let mut l = LauncherOverlay::new(reports);
        l.selected = 15;
        l.keep_selected_in_view(10);
        assert_eq!(l.offset, 6);
        l.selected = 2;
        l.keep_selected_in_view(10);
        assert_eq!(l.offset, 2);
    }
}
