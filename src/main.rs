use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, KeyEventKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use report_desk::components::{
    Component, ConfirmAction, ConfirmOverlay, LauncherAction, LauncherOverlay,
};
use report_desk::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use report_desk::drivers::{InputDriver, OutputDriver};
use report_desk::event_loop::{ControlFlow, EventLoop};
use report_desk::keybindings::{Action, KeyBindings};
use report_desk::layout::CellMetrics;
use report_desk::services::{
    ConfigFetch, ConfigService, ReportDescriptor, ReportService, ServiceError, StaticDirectory,
};
use report_desk::ui::UiFrame;
use report_desk::window::{ClosingWindow, PxSize, WindowId, WindowManager};
use report_desk::{theme, tracing_sub};

/// How long an opened window pretends to be fetching its content.
const CONTENT_LOAD_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Parser)]
#[command(
    name = "report-desk",
    about = "Floating report windows for the terminal",
    version
)]
struct DeskCli {
    /// Override the window limit instead of loading it from the directory
    #[arg(long)]
    max_windows: Option<usize>,

    /// Write debug logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Redraw rate in frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() -> io::Result<()> {
    let cli = DeskCli::parse();
    match cli.debug_log.as_deref() {
        Some(path) => tracing_sub::init_with_log_file(path)?,
        None => tracing_sub::init_default(),
    }

    let directory = Arc::new(StaticDirectory::new());
    let mut app = DeskApp::new(Arc::clone(&directory), cli.max_windows);

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(true)?;

    let poll_interval = Duration::from_millis(1000 / u64::from(cli.fps.max(1)));
    let mut event_loop = EventLoop::new(input, poll_interval);
    let result = event_loop.run(|_, event| app.step(&mut output, event));
    output.exit()?;
    result
}

struct DeskApp {
    manager: WindowManager<ReportDescriptor>,
    launcher: LauncherOverlay,
    confirm: ConfirmOverlay,
    directory: Arc<StaticDirectory>,
    bindings: KeyBindings,
    metrics: CellMetrics,
    config_fetch: Option<ConfigFetch>,
    pending_loads: Vec<(WindowId, Instant)>,
    ghosts: Vec<ClosingWindow>,
}

impl DeskApp {
    fn new(directory: Arc<StaticDirectory>, limit_override: Option<usize>) -> Self {
        let mut manager = WindowManager::new(PxSize::new(1280, 800));
        let config_fetch = match limit_override {
            Some(limit) => {
                manager.set_max_windows(limit);
                None
            }
            None => Some(ConfigFetch::spawn(Arc::clone(&directory))),
        };
        let launcher = LauncherOverlay::new(directory.list_reports());
        Self {
            manager,
            launcher,
            confirm: ConfirmOverlay::new(),
            directory,
            bindings: KeyBindings::default(),
            metrics: CellMetrics::default(),
            config_fetch,
            pending_loads: Vec::new(),
            ghosts: Vec::new(),
        }
    }

    fn step(
        &mut self,
        output: &mut ConsoleOutputDriver,
        event: Option<Event>,
    ) -> io::Result<ControlFlow> {
        match event {
            Some(evt) => Ok(self.handle_input(&evt)),
            None => {
                self.tick(Instant::now());
                output.draw(|mut frame| self.draw(&mut frame))?;
                Ok(ControlFlow::Continue)
            }
        }
    }

    fn handle_input(&mut self, evt: &Event) -> ControlFlow {
        if self.confirm.visible() {
            if let Some(action) = self.confirm.handle_confirm_event(evt) {
                match action {
                    ConfirmAction::Confirm => return ControlFlow::Quit,
                    ConfirmAction::Cancel => self.confirm.close(),
                }
            }
            return ControlFlow::Continue;
        }

        if let Event::Key(key) = evt
            && key.kind == KeyEventKind::Press
            && self.bindings.matches(Action::Quit, key)
        {
            return self.request_quit();
        }

        if self.launcher.visible() {
            if let Event::Key(key) = evt
                && key.kind == KeyEventKind::Press
                && self.bindings.matches(Action::ToggleLauncher, key)
            {
                self.launcher.close();
                return ControlFlow::Continue;
            }
            if let Some(action) = self.launcher.handle_launcher_event(evt) {
                match action {
                    LauncherAction::Open(report_id) => {
                        self.open_report(&report_id);
                        self.launcher.close();
                    }
                    LauncherAction::Dismiss => self.launcher.close(),
                }
            }
            return ControlFlow::Continue;
        }

        if let Event::Key(key) = evt {
            if key.kind != KeyEventKind::Press {
                return ControlFlow::Continue;
            }
            if self.bindings.matches(Action::ToggleLauncher, key) {
                self.launcher.open();
            } else if self.bindings.matches(Action::EscapeBack, key) {
                let _ = self.manager.escape_pressed();
            } else if self.bindings.matches(Action::CloseAllWindows, key) {
                self.manager.close_all();
            } else if self.bindings.matches(Action::RaiseLimit, key) {
                self.adjust_limit(1);
            } else if self.bindings.matches(Action::LowerLimit, key) {
                self.adjust_limit(-1);
            }
            return ControlFlow::Continue;
        }

        let _ = self.manager.handle_event(evt, self.metrics);
        ControlFlow::Continue
    }

    fn request_quit(&mut self) -> ControlFlow {
        let open = self.manager.window_count();
        if open == 0 {
            return ControlFlow::Quit;
        }
        let body = if open == 1 {
            "1 report window is still open. Exit anyway?".to_string()
        } else {
            format!("{open} report windows are still open. Exit anyway?")
        };
        self.confirm.open("Exit report desk", &body);
        ControlFlow::Continue
    }

    fn open_report(&mut self, report_id: &str) {
        match self.directory.resolve(report_id) {
            Ok(report) => {
                let title = report.name.clone();
                let source = report.embed_url.clone();
                let before = self.manager.window_count();
                if let Some(id) = self.manager.open_window(report, &title, &source)
                    && self.manager.window_count() > before
                {
                    self.pending_loads.push((id, Instant::now() + CONTENT_LOAD_DELAY));
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, report_id, "failed to resolve report");
                self.manager.notify(err.to_string());
            }
        }
    }

    fn adjust_limit(&mut self, delta: isize) {
        let target = self.manager.max_windows() as isize + delta;
        let Ok(target) = usize::try_from(target) else {
            return;
        };
        match self.directory.update_max_windows(target) {
            Ok(limit) => {
                self.manager.set_max_windows(limit);
                self.manager.notify(format!("Window limit set to {limit}"));
            }
            Err(err @ ServiceError::LimitOutOfRange(_)) => {
                self.manager.notify(err.to_string());
            }
            Err(err) => {
                tracing::warn!(error = %err, "window limit update failed");
                self.manager.notify(err.to_string());
            }
        }
    }

    fn tick(&mut self, now: Instant) {
        if let Some(fetch) = &self.config_fetch
            && let Some(limit) = fetch.try_recv()
        {
            self.manager.set_max_windows(limit);
            self.config_fetch = None;
        }
        let mut loaded = Vec::new();
        self.pending_loads.retain(|(id, due)| {
            if now >= *due {
                loaded.push(*id);
                false
            } else {
                true
            }
        });
        for id in loaded {
            self.manager.content_loaded(id);
        }
        self.ghosts.extend(self.manager.take_closing_windows());
        self.ghosts.retain(|ghost| !ghost.expired());
    }

    fn draw(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        self.manager.render(frame, self.metrics);
        self.draw_ghosts(frame);
        if self.manager.is_empty() && !self.launcher.visible() && !self.confirm.visible() {
            draw_idle_hint(frame, area);
        }
        self.launcher.render(frame, area);
        self.confirm.render(frame, area);
    }

    fn draw_ghosts(&mut self, frame: &mut UiFrame<'_>) {
        let bounds = self.manager.managed_area();
        for ghost in &self.ghosts {
            if ghost.minimized {
                continue;
            }
            let Some(cells) = self.metrics.project(ghost.geometry, bounds) else {
                continue;
            };
            let block = Block::default().borders(Borders::ALL).border_style(
                Style::default()
                    .fg(theme::window_border())
                    .add_modifier(Modifier::DIM),
            );
            frame.render_widget(block, cells);
        }
    }
}

fn draw_idle_hint(frame: &mut UiFrame<'_>, area: Rect) {
    if area.height < 2 {
        return;
    }
    let hint_row = Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1,
    };
    let hint = Paragraph::new("Press F2 to open a report")
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme::loading_fg()));
    frame.render_widget(hint, hint_row);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn app() -> DeskApp {
        DeskApp::new(Arc::new(StaticDirectory::new()), None)
    }

    #[test]
    fn quit_with_no_windows_exits_immediately() {
        let mut a = app();
        assert!(matches!(a.handle_input(&ctrl('q')), ControlFlow::Quit));
    }

    #[test]
    fn quit_with_open_windows_asks_first() {
        let mut a = app();
        a.open_report("sales-overview");
        assert!(matches!(a.handle_input(&ctrl('q')), ControlFlow::Continue));
        assert!(a.confirm.visible());
        // confirm is pre-selected, Enter exits
        assert!(matches!(
            a.handle_input(&key(KeyCode::Enter)),
            ControlFlow::Quit
        ));
    }

    #[test]
    fn cancelling_the_exit_confirm_keeps_running() {
        let mut a = app();
        a.open_report("sales-overview");
        let _ = a.handle_input(&ctrl('q'));
        assert!(matches!(
            a.handle_input(&key(KeyCode::Esc)),
            ControlFlow::Continue
        ));
        assert!(!a.confirm.visible());
        assert_eq!(a.manager.window_count(), 1);
    }

    #[test]
    fn launcher_enter_opens_the_selected_report() {
        let mut a = app();
        let _ = a.handle_input(&key(KeyCode::F(2)));
        assert!(a.launcher.visible());
        let _ = a.handle_input(&key(KeyCode::Enter));
        assert!(!a.launcher.visible());
        assert_eq!(a.manager.window_count(), 1);
        assert_eq!(a.pending_loads.len(), 1);
    }

    #[test]
    fn bracket_keys_adjust_the_limit_through_the_service() {
        let mut a = app();
        assert_eq!(a.manager.max_windows(), 5);
        let _ = a.handle_input(&key(KeyCode::Char(']')));
        assert_eq!(a.manager.max_windows(), 6);
        let _ = a.handle_input(&key(KeyCode::Char('[')));
        assert_eq!(a.manager.max_windows(), 5);
    }

    #[test]
    fn limit_updates_outside_the_range_are_rejected() {
        let mut a = app();
        for _ in 0..6 {
            let _ = a.handle_input(&key(KeyCode::Char('[')));
        }
        assert_eq!(a.manager.max_windows(), 1);
        let _ = a.handle_input(&key(KeyCode::Char('[')));
        assert_eq!(a.manager.max_windows(), 1);
        let notice = a.manager.taskbar().notification().unwrap();
        assert!(notice.contains("between 1 and 10"));
    }

    #[test]
    fn close_all_key_empties_the_desk() {
        let mut a = app();
        a.open_report("sales-overview");
        a.open_report("churn-cohorts");
        assert_eq!(a.manager.window_count(), 2);
        let _ = a.handle_input(&ctrl('l'));
        assert!(a.manager.is_empty());
    }

    #[test]
    fn content_marks_loaded_after_the_delay() {
        let mut a = app();
        a.open_report("sales-overview");
        let (id, due) = a.pending_loads[0];
        assert!(a.manager.window(id).unwrap().is_loading());
        a.tick(due);
        assert!(a.pending_loads.is_empty());
        assert!(!a.manager.window(id).unwrap().is_loading());
    }

    #[test]
    fn closing_a_window_leaves_a_ghost_until_it_expires() {
        let mut a = app();
        a.open_report("sales-overview");
        let id = a.manager.window_ids()[0];
        a.manager.close_window(id);
        a.tick(Instant::now());
        assert_eq!(a.ghosts.len(), 1);
    }

    #[test]
    fn duplicate_open_does_not_schedule_a_second_load() {
        let mut a = app();
        a.open_report("sales-overview");
        a.open_report("sales-overview");
        assert_eq!(a.manager.window_count(), 1);
        assert_eq!(a.pending_loads.len(), 1);
    }

    #[test]
    fn config_fetch_applies_once_delivered() {
        let directory = Arc::new(StaticDirectory::new());
        directory.update_max_windows(8).unwrap();
        let mut a = DeskApp::new(directory, None);
        let deadline = Instant::now() + Duration::from_secs(2);
        while a.config_fetch.is_some() && Instant::now() < deadline {
            a.tick(Instant::now());
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(a.manager.max_windows(), 8);
    }

    #[test]
    fn cli_override_skips_the_config_fetch() {
        let a = DeskApp::new(Arc::new(StaticDirectory::new()), Some(3));
        assert!(a.config_fetch.is_none());
        assert_eq!(a.manager.max_windows(), 3);
    }
}
