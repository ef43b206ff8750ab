use std::fmt;

use crate::Rect;

/// A boxed error type for window operations.
///
/// Platform crates convert their native errors into this with `?`.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;

/// An opaque, pointer-sized handle to a top-level window.
///
/// The value `0` is the null handle: "no window". Handles are plain
/// values; holding one does not keep the window alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub usize);

impl WindowHandle {
    pub const NULL: Self = Self(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Read-only queries against live window-manager state.
///
/// Implementations never fail: an invalid or vanished handle yields the
/// safe default documented on each method.
pub trait WindowQuery {
    /// The window currently receiving keyboard input, or the null handle.
    fn foreground_window(&self) -> WindowHandle;

    /// The window's title text, or an empty string.
    fn title(&self, window: WindowHandle) -> String;

    /// Whether the window is minimized. `false` when the query fails,
    /// so a flaky lookup never tears the backdrop down by itself.
    fn is_minimized(&self, window: WindowHandle) -> bool;

    /// Full bounds of the monitor hosting the window (including the
    /// taskbar area), or `None` if it cannot be resolved.
    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect>;

    /// The window immediately below `window` in front-to-back order,
    /// or the null handle.
    fn neighbor_below(&self, window: WindowHandle) -> WindowHandle;
}
