use blackbars_core::{Rect, WindowHandle, WindowQuery};

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GW_HWNDNEXT, GetForegroundWindow, GetWindow, GetWindowTextLengthW, GetWindowTextW, IsIconic,
    IsWindowVisible, RealGetWindowClassW,
};

use crate::monitor;

/// A window on the Windows platform, wrapping a Win32 `HWND`.
///
/// Holds only the handle and asks the OS for everything else on demand,
/// so a stale `Window` answers with empty strings and `false`s rather
/// than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    /// Creates a `Window` from a platform-agnostic handle.
    pub fn from_handle(handle: WindowHandle) -> Self {
        Self {
            hwnd: HWND(handle.0 as *mut _),
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn handle(&self) -> WindowHandle {
        to_handle(self.hwnd)
    }

    /// The title bar text, or an empty string.
    pub fn title(&self) -> String {
        if self.hwnd.is_invalid() {
            return String::new();
        }

        // SAFETY: GetWindowTextLengthW and GetWindowTextW only read window
        // text. A destroyed handle makes them return 0.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length <= 0 {
                return String::new();
            }

            // +1 for the terminator GetWindowTextW always writes.
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
        }
    }

    /// The window class name, or an empty string.
    pub fn class(&self) -> String {
        // 256 is the maximum class name length in Win32.
        let mut buffer = [0u16; 256];
        // SAFETY: RealGetWindowClassW writes at most buffer.len() chars.
        let len = unsafe { RealGetWindowClassW(self.hwnd, &mut buffer) };
        String::from_utf16_lossy(&buffer[..len as usize])
    }

    pub fn is_minimized(&self) -> bool {
        // SAFETY: IsIconic is a read-only query; invalid handles yield FALSE.
        unsafe { IsIconic(self.hwnd).as_bool() }
    }

    pub fn is_visible(&self) -> bool {
        // SAFETY: IsWindowVisible is a read-only query.
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    /// The next window down in z-order, if any.
    pub fn below(&self) -> Option<Window> {
        // SAFETY: GetWindow walks the z-order list without side effects.
        match unsafe { GetWindow(self.hwnd, GW_HWNDNEXT) } {
            Ok(hwnd) if !hwnd.is_invalid() => Some(Self::new(hwnd)),
            _ => None,
        }
    }
}

pub(crate) fn to_handle(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as usize)
}

/// [`WindowQuery`] backed by live Win32 calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopQuery;

impl WindowQuery for DesktopQuery {
    fn foreground_window(&self) -> WindowHandle {
        // SAFETY: GetForegroundWindow has no preconditions; it returns a
        // null HWND when no window is foreground (e.g. during a switch).
        to_handle(unsafe { GetForegroundWindow() })
    }

    fn title(&self, window: WindowHandle) -> String {
        Window::from_handle(window).title()
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        !window.is_null() && Window::from_handle(window).is_minimized()
    }

    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect> {
        if window.is_null() {
            return None;
        }
        monitor::monitor_rect_for_window(Window::from_handle(window).hwnd()).ok()
    }

    fn neighbor_below(&self, window: WindowHandle) -> WindowHandle {
        if window.is_null() {
            return WindowHandle::NULL;
        }
        Window::from_handle(window)
            .below()
            .map_or(WindowHandle::NULL, |w| w.handle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handle_queries_yield_safe_defaults() {
        // Arrange
        let query = DesktopQuery;

        // Assert
        assert_eq!(query.title(WindowHandle::NULL), "");
        assert!(!query.is_minimized(WindowHandle::NULL));
        assert_eq!(query.monitor_rect(WindowHandle::NULL), None);
        assert!(query.neighbor_below(WindowHandle::NULL).is_null());
    }

    #[test]
    fn handle_roundtrips_through_hwnd() {
        let window = Window::from_handle(WindowHandle(0x1234));

        assert_eq!(window.handle(), WindowHandle(0x1234));
    }
}
