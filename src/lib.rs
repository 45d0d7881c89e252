//! Floating report windows for terminal dashboards.
//!
//! The crate centers on [`window::WindowManager`], which owns every report
//! window's geometry, stacking order, and minimize/maximize state in a pixel
//! coordinate space, and projects that state onto terminal cells each frame.
//! Around it sit the taskbar, the window decorator, the report directory
//! services, and the overlay components used by the `report-desk` binary.

pub mod components;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod services;
pub mod taskbar;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use window::{WindowId, WindowManager};
