use blackbars_core::WindowResult;

use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::EnumWindows;
use windows::core::BOOL;

use crate::window::Window;

/// Enumerates visible top-level windows that have a title, front to
/// back.
///
/// Minimized windows are included: a game sitting minimized still has
/// the title that belongs in the config.
pub fn enumerate_windows() -> WindowResult<Vec<Window>> {
    let mut windows: Vec<Window> = Vec::new();

    // SAFETY: EnumWindows runs synchronously, so the Vec behind the
    // LPARAM outlives every callback.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut windows as *mut _ as isize),
        )?;
    }

    Ok(windows)
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Vec pointer passed by enumerate_windows().
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<Window>) };

    let window = Window::new(hwnd);
    if window.is_visible() && !window.title().is_empty() {
        windows.push(window);
    }

    BOOL(1)
}
