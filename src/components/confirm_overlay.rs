use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::components::{Component, dim_backdrop, overlay_rect};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::ui::{UiFrame, safe_set_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Confirm,
    Cancel,
}

#[derive(Debug)]
struct ConfirmButton {
    label: &'static str,
    action: ConfirmAction,
    rect: Option<Rect>,
}

/// Modal exit prompt over a dimmed desk. Exit is pre-selected; Tab and the
/// arrow keys move the highlight, Enter commits, Escape cancels. Button
/// rects are refreshed on every render so mouse clicks resolve against the
/// frame actually on screen.
#[derive(Debug)]
pub struct ConfirmOverlay {
    title: String,
    body: String,
    visible: bool,
    selected: ConfirmAction,
    buttons: [ConfirmButton; 2],
}

impl ConfirmOverlay {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            visible: false,
            selected: ConfirmAction::Confirm,
            buttons: [
                ConfirmButton {
                    label: "[ Cancel ]",
                    action: ConfirmAction::Cancel,
                    rect: None,
                },
                ConfirmButton {
                    label: "[ Exit ]",
                    action: ConfirmAction::Confirm,
                    rect: None,
                },
            ],
        }
    }

    pub fn open(&mut self, title: &str, body: &str) {
        self.title = title.to_string();
        self.body = body.to_string();
        self.selected = ConfirmAction::Confirm;
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    fn button_under(&self, column: u16, row: u16) -> Option<ConfirmAction> {
        self.buttons
            .iter()
            .find(|button| {
                button
                    .rect
                    .is_some_and(|rect| rect_contains(rect, column, row))
            })
            .map(|button| button.action)
    }

    fn flip_selection(&mut self) {
        self.selected = match self.selected {
            ConfirmAction::Confirm => ConfirmAction::Cancel,
            ConfirmAction::Cancel => ConfirmAction::Confirm,
        };
    }

    pub fn handle_confirm_event(&mut self, event: &Event) -> Option<ConfirmAction> {
        match event {
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                self.button_under(mouse.column, mouse.row)
            }
            Event::Key(key) => {
                let kb = KeyBindings::default();
                if kb.matches(Action::ConfirmToggle, key) {
                    self.flip_selection();
                    None
                } else if kb.matches(Action::ConfirmLeft, key) {
                    self.selected = ConfirmAction::Cancel;
                    None
                } else if kb.matches(Action::ConfirmRight, key) {
                    self.selected = ConfirmAction::Confirm;
                    None
                } else if kb.matches(Action::ConfirmAccept, key) {
                    Some(self.selected)
                } else if kb.matches(Action::ConfirmCancel, key) {
                    Some(ConfirmAction::Cancel)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl Default for ConfirmOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ConfirmOverlay {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        for button in &mut self.buttons {
            button.rect = None;
        }
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        dim_backdrop(frame, area);

        let rect = overlay_rect(area, 70, 9);
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .style(
                Style::default()
                    .bg(crate::theme::dialog_bg())
                    .fg(crate::theme::dialog_fg()),
            );
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
        // one spare column inside each border edge
        let content = Rect {
            x: inner.x.saturating_add(1),
            y: inner.y,
            width: inner.width.saturating_sub(2),
            height: inner.height,
        };
        if content.width == 0 || content.height < 4 {
            return;
        }

        let body_rect = Rect {
            x: content.x,
            y: content.y,
            width: content.width,
            height: content.height.saturating_sub(3),
        };
        let body = Paragraph::new(self.body.as_str())
            .style(Style::default().fg(crate::theme::dialog_fg()))
            .wrap(Wrap { trim: true });
        frame.render_widget(body, body_rect);

        let buffer = frame.buffer_mut();
        let bounds = rect.intersection(buffer.area);
        let rule_y = content.y.saturating_add(content.height).saturating_sub(2);
        let rule = "─".repeat(content.width as usize);
        safe_set_string(
            buffer,
            bounds,
            content.x,
            rule_y,
            &rule,
            Style::default().fg(crate::theme::dialog_separator()),
        );

        let selected_style = Style::default()
            .fg(crate::theme::header_focused_fg())
            .bg(crate::theme::header_focused_bg())
            .add_modifier(Modifier::BOLD);
        let idle_style = Style::default()
            .fg(crate::theme::dialog_fg())
            .bg(crate::theme::taskbar_bg());
        let button_y = rule_y.saturating_add(1);
        let row_width: u16 = self
            .buttons
            .iter()
            .map(|button| button.label.len() as u16 + 1)
            .sum::<u16>()
            .saturating_sub(1);
        let mut x = content
            .x
            .saturating_add(content.width.saturating_sub(row_width));
        for button in &mut self.buttons {
            let style = if button.action == self.selected {
                selected_style
            } else {
                idle_style
            };
            safe_set_string(buffer, bounds, x, button_y, button.label, style);
            let width = button.label.len() as u16;
            button.rect = Some(Rect {
                x,
                y: button_y,
                width,
                height: 1,
            });
            x = x.saturating_add(width).saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent};
    use ratatui::buffer::Buffer;

    fn key(action: Action) -> Event {
        let combo = KeyBindings::default()
            .first_combo(action)
            .expect("action is bound");
        Event::Key(KeyEvent::new(combo.code, combo.mods))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn render_into(overlay: &mut ConfirmOverlay, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        let mut ui = crate::ui::UiFrame::from_parts(area, &mut buf);
        overlay.render(&mut ui, area);
        buf
    }

    #[test]
    fn open_preselects_exit_and_close_hides() {
        let mut overlay = ConfirmOverlay::new();
        assert!(!overlay.visible());
        overlay.open("Exit", "2 report windows are still open. Exit anyway?");
        assert!(overlay.visible());
        assert_eq!(overlay.selected, ConfirmAction::Confirm);
        overlay.close();
        assert!(!overlay.visible());
    }

    #[test]
    fn keyboard_walks_the_selection_and_enter_commits() {
        let mut overlay = ConfirmOverlay::new();
        overlay.open("Exit", "Exit anyway?");

        assert_eq!(
            overlay.handle_confirm_event(&key(Action::ConfirmToggle)),
            None
        );
        assert_eq!(overlay.selected, ConfirmAction::Cancel);
        assert_eq!(
            overlay.handle_confirm_event(&key(Action::ConfirmAccept)),
            Some(ConfirmAction::Cancel)
        );

        assert_eq!(
            overlay.handle_confirm_event(&key(Action::ConfirmRight)),
            None
        );
        assert_eq!(
            overlay.handle_confirm_event(&key(Action::ConfirmAccept)),
            Some(ConfirmAction::Confirm)
        );
        assert_eq!(
            overlay.handle_confirm_event(&key(Action::ConfirmCancel)),
            Some(ConfirmAction::Cancel)
        );
    }

    #[test]
    fn rendered_buttons_resolve_mouse_clicks() {
        let mut overlay = ConfirmOverlay::new();
        overlay.open(
            "Exit report desk",
            "1 report window is still open. Exit anyway?",
        );
        let area = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let buf = render_into(&mut overlay, area);

        // the 70x9 prompt centers at (5, 7); buttons sit on its last content row
        let row = (0..80)
            .map(|x| buf.cell((x, 14)).expect("cell present").symbol().to_string())
            .collect::<String>();
        assert!(row.contains("[ Cancel ]"));
        assert!(row.contains("[ Exit ]"));

        let exit = overlay.buttons[1].rect.expect("exit button placed");
        assert_eq!(
            overlay.handle_confirm_event(&click(exit.x, exit.y)),
            Some(ConfirmAction::Confirm)
        );
        let cancel = overlay.buttons[0].rect.expect("cancel button placed");
        assert_eq!(
            overlay.handle_confirm_event(&click(cancel.x.saturating_add(2), cancel.y)),
            Some(ConfirmAction::Cancel)
        );
        assert_eq!(overlay.handle_confirm_event(&click(0, 0)), None);
    }

    #[test]
    fn hidden_overlay_draws_nothing() {
        let mut overlay = ConfirmOverlay::new();
        let area = Rect {
            x: 0,
            y: 0,
            width: 40,
            height: 10,
        };
        let buf = render_into(&mut overlay, area);
        assert_eq!(buf, Buffer::empty(area));
        assert!(overlay.buttons.iter().all(|button| button.rect.is_none()));
    }
}
