use std::io::{self, Stdout};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::{Clear, Paragraph},
};
use report_desk::constants::{HEADER_PX_HEIGHT, MAX_WINDOWS_CEIL, RESIZE_GRIP_PX};
use report_desk::layout::CellMetrics;
use report_desk::services::{ReportDescriptor, ReportService, StaticDirectory};
use report_desk::ui::UiFrame;
use report_desk::window::{PxSize, WindowId, WindowManager};

/// Frames in one full gesture cycle: drag, resize, park, restore, maximize.
const GESTURE_CYCLE: u64 = 240;

#[derive(Parser, Debug)]
#[command(
    name = "desk-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Gesture-heavy benchmark for the floating report desk"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 10.0
    )]
    duration_seconds: f64,

    /// Target frames per second. Used to pace rendering so comparisons are repeatable.
    #[arg(short = 'f', long = "fps", value_name = "FPS", default_value_t = 60.0)]
    target_fps: f64,

    /// How many report windows to keep in motion.
    #[arg(short = 'w', long = "windows", value_name = "COUNT", default_value_t = 4)]
    windows: usize,
}

impl BenchCli {
    fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_seconds)
    }

    fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps)
    }
}

struct BenchConfig {
    duration: Duration,
    target_fps: f64,
    frame_budget: Duration,
    windows: usize,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.5..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.5 and 600 seconds".to_string());
        }
        if !(1.0..=240.0).contains(&cli.target_fps) {
            return Err("fps must be between 1 and 240".to_string());
        }
        if !(1..=MAX_WINDOWS_CEIL).contains(&cli.windows) {
            return Err(format!("windows must be between 1 and {MAX_WINDOWS_CEIL}"));
        }
        Ok(Self {
            duration: cli.duration(),
            target_fps: cli.target_fps,
            frame_budget: cli.frame_budget(),
            windows: cli.windows,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let bench_result = run_benchmark(&mut terminal, &config);

    terminal.show_cursor()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;

    let stats = bench_result?;
    println!("{}", stats.final_report(&config));

    Ok(())
}

type BenchTerminal = Terminal<CrosstermBackend<Stdout>>;

fn run_benchmark(terminal: &mut BenchTerminal, config: &BenchConfig) -> io::Result<BenchStats> {
    let mut stats = BenchStats::new();
    let mut script = GestureScript::seeded_from_clock();
    let metrics = CellMetrics::default();
    let mut manager = open_desk(config);
    let mut tick: u64 = 0;
    let mut exit_reason = ExitReason::Completed;

    loop {
        let frame_start = Instant::now();
        let mut cells_drawn: u64 = 0;
        terminal.draw(|frame| {
            cells_drawn = draw_frame(frame, &mut manager, metrics, &stats, config);
        })?;
        let draw_time = frame_start.elapsed();
        // The first draw sizes the manager from the real terminal, so the
        // script only ever sees an up-to-date viewport.
        let gestures = script.advance(&mut manager, tick);
        stats.record_frame(cells_drawn, gestures, draw_time);

        if stats.elapsed() >= config.duration {
            break;
        }

        if poll_for_exit(config.frame_budget.saturating_sub(draw_time))? {
            exit_reason = ExitReason::UserAbort;
            break;
        }

        tick = tick.wrapping_add(1);
    }

    stats.exit_reason = exit_reason;
    stats.mark_completed();
    Ok(stats)
}

/// Opens the bundled demo reports the benchmark animates. The window cap is
/// lifted to the ceiling up front so capacity never blocks the requested
/// count.
fn open_desk(config: &BenchConfig) -> WindowManager<ReportDescriptor> {
    let directory = StaticDirectory::new();
    let mut manager = WindowManager::new(PxSize::new(1280, 800));
    manager.set_max_windows(MAX_WINDOWS_CEIL);
    for report in directory.list_reports().into_iter().take(config.windows) {
        let title = report.name.clone();
        let source = report.embed_url.clone();
        if let Some(id) = manager.open_window(report, &title, &source) {
            manager.content_loaded(id);
        }
    }
    manager
}

fn draw_frame(
    frame: &mut Frame,
    manager: &mut WindowManager<ReportDescriptor>,
    metrics: CellMetrics,
    stats: &BenchStats,
    config: &BenchConfig,
) -> u64 {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return 0;
    }

    let mut ui = UiFrame::new(frame);
    manager.render(&mut ui, metrics);

    let overlay_lines = build_overlay_lines(stats, manager, config);
    let overlay_info = OverlayState::new(area, &overlay_lines);
    if let Some(overlay_area) = overlay_info.area {
        ui.render_widget(Clear, overlay_area);
        ui.render_widget(
            Paragraph::new(overlay_lines.join("\n"))
                .style(Style::default().fg(Color::White).bg(Color::Black)),
            overlay_area,
        );
    }

    area.width as u64 * area.height as u64
}

fn build_overlay_lines(
    stats: &BenchStats,
    manager: &WindowManager<ReportDescriptor>,
    config: &BenchConfig,
) -> Vec<String> {
    let elapsed = stats.elapsed().as_secs_f64();
    let duration_target = config.duration.as_secs_f64();
    let progress = if duration_target > 0.0 {
        (elapsed / duration_target).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let fps_avg = if elapsed > 0.0 {
        stats.frame_count as f64 / elapsed
    } else {
        0.0
    };
    let gestures_per_sec = if elapsed > 0.0 {
        stats.gesture_ops as f64 / elapsed
    } else {
        0.0
    };

    vec![
        "== Desk Bench ==".to_string(),
        format!(
            "elapsed {:>5.1}/{:>5.1}s ({:>3.0}%)",
            elapsed,
            duration_target,
            progress * 100.0
        ),
        format!(
            "frames {:>8} | avg fps {:>5.1} / target {:>5.1}",
            stats.frame_count, fps_avg, config.target_fps
        ),
        format!(
            "gestures {:>8} | {:>6.0}/s",
            stats.gesture_ops, gestures_per_sec
        ),
        format!(
            "frame ms avg {:>6.2} | best {:>5.2} | worst {:>5.2}",
            stats.average_frame_ms(),
            stats.fastest_frame_ms(),
            stats.slowest_frame_ms()
        ),
        format!("windows {} open", manager.window_count()),
        format!("exit: {}", stats.exit_reason.describe()),
        "press q / esc / ctrl+c to stop".to_string(),
    ]
}

struct OverlayState {
    area: Option<Rect>,
}

impl OverlayState {
    /// Pins the stats box to the top-right corner, clear of the cascade
    /// origin where windows spawn.
    fn new(window_area: Rect, lines: &[String]) -> Self {
        let available_width = window_area.width.saturating_sub(2);
        let available_height = window_area.height.saturating_sub(2);
        if available_width < 8 || available_height < 4 {
            return Self { area: None };
        }
        let text_width = lines
            .iter()
            .map(|line| line.len() as u16)
            .max()
            .unwrap_or(0);
        let text_height = lines.len() as u16;
        let width = text_width.saturating_add(2).clamp(8, available_width);
        let height = text_height.saturating_add(2).clamp(4, available_height);
        let rect = Rect {
            x: window_area.x + window_area.width.saturating_sub(width).saturating_sub(1),
            y: window_area.y + 1,
            width,
            height,
        };
        Self { area: Some(rect) }
    }
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    frame_count: u64,
    cell_updates: u64,
    gesture_ops: u64,
    total_draw_time: Duration,
    fastest_frame: Duration,
    slowest_frame: Duration,
    exit_reason: ExitReason,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            frame_count: 0,
            cell_updates: 0,
            gesture_ops: 0,
            total_draw_time: Duration::ZERO,
            fastest_frame: Duration::MAX,
            slowest_frame: Duration::ZERO,
            exit_reason: ExitReason::Completed,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_frame(&mut self, cells: u64, gestures: u64, draw_time: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.cell_updates = self.cell_updates.saturating_add(cells);
        self.gesture_ops = self.gesture_ops.saturating_add(gestures);
        self.total_draw_time += draw_time;
        if draw_time < self.fastest_frame {
            self.fastest_frame = draw_time;
        }
        if draw_time > self.slowest_frame {
            self.slowest_frame = draw_time;
        }
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (self.total_draw_time.as_secs_f64() / self.frame_count as f64) * 1_000.0
    }

    fn fastest_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.fastest_frame.as_secs_f64() * 1_000.0
    }

    fn slowest_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.slowest_frame.as_secs_f64() * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let fps_avg = if elapsed > 0.0 {
            self.frame_count as f64 / elapsed
        } else {
            0.0
        };
        let gestures_per_second = if elapsed > 0.0 {
            self.gesture_ops as f64 / elapsed
        } else {
            0.0
        };
        let cells_per_second = if elapsed > 0.0 {
            self.cell_updates as f64 / elapsed
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            Desk bench {status}.
            Duration: {elapsed:.2}s (target {target:.2}s)
            Frames: {frames} | Avg FPS: {fps:.1} (target {target_fps:.1})
            Avg frame: {avg:.2} ms | Best: {best:.2} ms | Worst: {worst:.2} ms
            Gestures: {gestures} window ops (~{gestures_per_sec:.0}/s)
            Cell updates: {cells} total (~{cells_per_sec:.0}/s)
            "#,
            status = self.exit_reason.describe(),
            elapsed = elapsed,
            target = config.duration.as_secs_f64(),
            frames = self.frame_count,
            fps = fps_avg,
            target_fps = config.target_fps,
            avg = self.average_frame_ms(),
            best = self.fastest_frame_ms(),
            worst = self.slowest_frame_ms(),
            gestures = self.gesture_ops,
            gestures_per_sec = gestures_per_second,
            cells = self.cell_updates,
            cells_per_sec = cells_per_second,
        )
    }
}

#[derive(Copy, Clone)]
enum ExitReason {
    Completed,
    UserAbort,
}

impl ExitReason {
    fn describe(self) -> &'static str {
        match self {
            ExitReason::Completed => "completed full duration",
            ExitReason::UserAbort => "stopped by user",
        }
    }
}

/// Drives the manager through a scripted pointer routine so every frame
/// exercises hit-testing, drag clamping, and z-order bookkeeping.
///
/// Each [`GESTURE_CYCLE`] frames: grab the top window's header and drag it
/// around, resize it from the corner grip, park one window in the taskbar
/// and bring it back, then maximize and restore. The pointer bounces off
/// the viewport edges with a fresh random step every cycle so runs do not
/// settle into a fixed orbit.
struct GestureScript {
    state: u64,
    pointer: (i32, i32),
    step: (i32, i32),
    parked: Option<WindowId>,
}

impl GestureScript {
    fn seeded_from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
            ^ 0xC3C3_C3C3_9876_5432;
        let mut script = Self {
            state: seed,
            pointer: (0, 0),
            step: (0, 0),
            parked: None,
        };
        script.step = script.random_step();
        script
    }

    fn next_rand(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn random_step(&mut self) -> (i32, i32) {
        let dx = 4 + (self.next_rand() % 9) as i32;
        let dy = 3 + (self.next_rand() % 7) as i32;
        let dx = if self.next_rand() & 1 == 0 { dx } else { -dx };
        let dy = if self.next_rand() & 1 == 0 { dy } else { -dy };
        (dx, dy)
    }

    fn top_visible(manager: &WindowManager<ReportDescriptor>) -> Option<WindowId> {
        manager
            .stacking_order()
            .into_iter()
            .rev()
            .find(|id| manager.window(*id).is_some_and(|record| !record.is_minimized()))
    }

    fn drift(&mut self, viewport: PxSize) -> (i32, i32) {
        let (mut x, mut y) = self.pointer;
        let (mut dx, mut dy) = self.step;
        x += dx;
        y += dy;
        let max_x = i32::from(viewport.width);
        let max_y = i32::from(viewport.height);
        if x < 0 || x > max_x {
            dx = -dx;
            x = x.clamp(0, max_x);
        }
        if y < 0 || y > max_y {
            dy = -dy;
            y = y.clamp(0, max_y);
        }
        self.pointer = (x, y);
        self.step = (dx, dy);
        self.pointer
    }

    /// Applies this frame's slice of the routine. Returns how many manager
    /// operations actually took effect.
    fn advance(&mut self, manager: &mut WindowManager<ReportDescriptor>, tick: u64) -> u64 {
        let viewport = manager.viewport();
        let mut ops = 0;
        match tick % GESTURE_CYCLE {
            0 => {
                self.step = self.random_step();
                if let Some(id) = Self::top_visible(manager)
                    && let Some(record) = manager.window(id)
                {
                    let rect = record.geometry();
                    let x = rect.x + i32::from(rect.width) / 2;
                    let y = rect.y + HEADER_PX_HEIGHT / 2;
                    self.pointer = (x, y);
                    if manager.pointer_pressed(x, y) {
                        ops += 1;
                    }
                }
            }
            1..=119 => {
                let (x, y) = self.drift(viewport);
                if manager.pointer_moved(x, y) {
                    ops += 1;
                }
            }
            120 => {
                if manager.pointer_released() {
                    ops += 1;
                }
            }
            121 => {
                if let Some(id) = Self::top_visible(manager)
                    && let Some(record) = manager.window(id)
                {
                    let rect = record.geometry();
                    let x = rect.right() - RESIZE_GRIP_PX / 2;
                    let y = rect.bottom() - RESIZE_GRIP_PX / 2;
                    self.pointer = (x, y);
                    if manager.pointer_pressed(x, y) {
                        ops += 1;
                    }
                }
            }
            122..=209 => {
                let (x, y) = self.drift(viewport);
                if manager.pointer_moved(x, y) {
                    ops += 1;
                }
            }
            210 => {
                if manager.pointer_released() {
                    ops += 1;
                }
            }
            212 => {
                let ids = manager.window_ids();
                if !ids.is_empty() {
                    let id = ids[self.next_rand() as usize % ids.len()];
                    manager.toggle_minimize(id);
                    self.parked = Some(id);
                    ops += 1;
                }
            }
            226 => {
                if let Some(id) = self.parked.take() {
                    manager.taskbar_clicked(id);
                    ops += 1;
                }
            }
            230 => {
                if let Some(id) = manager.active_window() {
                    manager.toggle_maximize(id);
                    ops += 1;
                }
            }
            238 => {
                if manager.escape_pressed() {
                    ops += 1;
                }
            }
            _ => {}
        }
        ops
    }
}

fn poll_for_exit(wait: Duration) -> io::Result<bool> {
    if !event::poll(wait)? {
        return Ok(false);
    }
    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if matches!(
                    key.code,
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
                ) {
                    return Ok(true);
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(true);
                }
            }
            _ => {}
        }
        if !event::poll(Duration::ZERO)? {
            break;
        }
    }
    Ok(false)
}
