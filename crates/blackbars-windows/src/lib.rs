//! Win32 implementation of the Black Bars backdrop.
//!
//! Everything here is Windows-only; on other targets the crate is empty.
#![cfg(windows)]

/// Opaque full-monitor backdrop window.
pub mod backdrop;

/// Console control handler (Ctrl+C, close, logoff, shutdown).
pub mod ctrl_c;

/// Top-level window enumeration.
pub mod enumerate;

/// WinEvent code classification.
pub mod event;

/// Main-thread message pump and event dispatch.
pub mod event_loop;

/// WinEvent hook installation.
pub mod hooks;

/// Monitor bounds and DPI awareness.
pub mod monitor;

/// Shell taskbar visibility.
pub mod taskbar;

/// Notification-area icon.
pub mod tray;

/// Startup, main loop and shutdown.
pub mod watcher;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

pub use enumerate::enumerate_windows;
pub use watcher::{run, watch_events};
pub use window::{DesktopQuery, Window};
