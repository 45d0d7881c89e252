use ratatui::style::Color;

// Centralized theme colors, kept as small helpers so the palette can be
// swapped in one place.

// Window chrome
pub fn header_focused_bg() -> Color {
    Color::Blue
}
pub fn header_focused_fg() -> Color {
    Color::White
}
pub fn header_bg() -> Color {
    Color::DarkGray
}
pub fn header_fg() -> Color {
    Color::Gray
}
pub fn window_border() -> Color {
    Color::DarkGray
}
pub fn window_border_focused() -> Color {
    Color::Blue
}
pub fn window_body_fg() -> Color {
    Color::Gray
}
pub fn loading_fg() -> Color {
    Color::Yellow
}
pub fn close_control_fg() -> Color {
    Color::Red
}
pub fn resize_grip_fg() -> Color {
    Color::DarkGray
}

// Taskbar
pub fn taskbar_bg() -> Color {
    Color::DarkGray
}
pub fn taskbar_fg() -> Color {
    Color::White
}
pub fn taskbar_entry_focused_bg() -> Color {
    Color::Gray
}
pub fn taskbar_entry_focused_fg() -> Color {
    Color::Black
}
pub fn taskbar_entry_minimized_fg() -> Color {
    Color::Black
}
pub fn taskbar_info_fg() -> Color {
    Color::Gray
}
pub fn taskbar_warning_fg() -> Color {
    Color::Yellow
}

// Launcher
pub fn launcher_selected_bg() -> Color {
    Color::Cyan
}
pub fn launcher_selected_fg() -> Color {
    Color::Black
}

// Dialog / confirm
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}
pub fn dialog_separator() -> Color {
    Color::DarkGray
}
