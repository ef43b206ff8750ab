use crate::{Rect, WindowHandle, WindowResult};

/// The single backdrop window that masks everything behind a target.
///
/// The surface is created at most once per process. Every method is
/// idempotent so the state machine can re-assert state freely.
pub trait OverlaySurface {
    /// Creates the backdrop sized to `rect` if it does not exist yet and
    /// returns its handle. An existing backdrop is returned unchanged,
    /// even if `rect` differs. Fails after [`destroy`](Self::destroy).
    fn ensure_created(&mut self, rect: Rect) -> WindowResult<WindowHandle>;

    /// Shows the backdrop directly behind `target` in z-order without
    /// moving, resizing or activating it.
    fn show_behind(&mut self, target: WindowHandle) -> WindowResult<()>;

    /// Hides the backdrop. No-op when hidden or not yet created.
    fn hide(&mut self);

    /// Releases the backdrop. Only the first call has any effect.
    fn destroy(&mut self) -> WindowResult<()>;

    /// The backdrop's handle while it exists.
    fn handle(&self) -> Option<WindowHandle>;
}

/// Visibility control for the system taskbar.
///
/// A taskbar that cannot be located is not an error; both calls simply
/// do nothing. `show` must be safe without a prior `hide`.
pub trait Taskbar {
    fn hide(&mut self);
    fn show(&mut self);
}
