pub mod config;
pub mod event;
pub mod focus;
pub mod lifecycle;
pub mod log;
pub mod overlay;
pub mod rect;
pub mod shutdown;
pub mod titles;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use event::WindowEvent;
pub use focus::{FocusMachine, OverlayState, StatusHandle};
pub use lifecycle::{Lifecycle, Subscriptions};
pub use overlay::{OverlaySurface, Taskbar};
pub use rect::Rect;
pub use shutdown::ShutdownFlag;
pub use titles::MonitoredTitles;
pub use window::{WindowHandle, WindowQuery, WindowResult};
