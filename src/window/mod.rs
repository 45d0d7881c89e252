pub mod decorator;

mod window_manager;

pub use window_manager::{ClosingWindow, NotificationSink, NullNotificationSink, WindowManager};

/// Identifier of one open report window.
///
/// Assigned monotonically by the manager and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u32);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed pixel rectangle origin with unsigned size.
///
/// Drags may push the origin negative before clamping; sizes never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PxRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl PxRect {
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && px < self.x + self.width as i32
            && py >= self.y
            && py < self.y + self.height as i32
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

/// Pixel dimensions of the virtual viewport the manager places windows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PxSize {
    pub width: u16,
    pub height: u16,
}

impl PxSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn full_rect(&self) -> PxRect {
        PxRect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }
}

/// One open report window. Fields are mutated only through
/// [`WindowManager`] methods.
#[derive(Debug, Clone)]
pub struct WindowRecord<R> {
    id: WindowId,
    report: R,
    title: String,
    content_source: String,
    geometry: PxRect,
    prior_geometry: Option<PxRect>,
    minimized: bool,
    maximized: bool,
    loading: bool,
    z_token: u32,
}

impl<R> WindowRecord<R> {
    fn new(id: WindowId, report: R, title: &str, content_source: &str, geometry: PxRect) -> Self {
        Self {
            id,
            report,
            title: sanitize_title(title),
            content_source: content_source.to_string(),
            geometry,
            prior_geometry: None,
            minimized: false,
            maximized: false,
            loading: true,
            z_token: 0,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn report(&self) -> &R {
        &self.report
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content_source(&self) -> &str {
        &self.content_source
    }

    /// Current pixel geometry. While maximized this is the full viewport;
    /// the pre-maximize rectangle lives in [`Self::prior_geometry`].
    pub fn geometry(&self) -> PxRect {
        self.geometry
    }

    pub fn prior_geometry(&self) -> Option<PxRect> {
        self.prior_geometry
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Z-order token last assigned on focus; higher draws on top.
    pub fn z_token(&self) -> u32 {
        self.z_token
    }
}

/// Strips control characters so untrusted report names cannot smuggle
/// escape sequences into the terminal.
fn sanitize_title(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_control()).collect()
}
