use blackbars_core::Taskbar;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowExW, FindWindowW, SW_HIDE, SW_SHOW, SHOW_WINDOW_CMD, ShowWindow,
};
use windows::core::{PCWSTR, w};

/// The shell's taskbar plus the separate Start button window that some
/// Windows versions keep outside it.
///
/// Both are looked up on every call: Explorer recreates them when it
/// restarts, so a cached handle would go stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellTaskbar;

impl ShellTaskbar {
    fn set_visible(cmd: SHOW_WINDOW_CMD) {
        for hwnd in [find_tray(), find_start_button()].into_iter().flatten() {
            // SAFETY: ShowWindow on a foreign window only changes its
            // visibility; the handles come from fresh lookups.
            unsafe {
                let _ = ShowWindow(hwnd, cmd);
            }
        }
    }
}

impl Taskbar for ShellTaskbar {
    fn hide(&mut self) {
        Self::set_visible(SW_HIDE);
    }

    fn show(&mut self) {
        Self::set_visible(SW_SHOW);
    }
}

/// Shows the taskbar without a [`ShellTaskbar`] value. Used from the
/// panic hook, where the owning state may be mid-borrow.
pub fn restore() {
    ShellTaskbar::set_visible(SW_SHOW);
}

fn find_tray() -> Option<HWND> {
    // SAFETY: FindWindowW only reads the window list.
    unsafe { FindWindowW(w!("Shell_TrayWnd"), PCWSTR::null()) }
        .ok()
        .filter(|h| !h.is_invalid())
}

fn find_start_button() -> Option<HWND> {
    // SAFETY: FindWindowExW only reads the window list.
    unsafe { FindWindowExW(None, None, w!("Button"), w!("Start")) }
        .ok()
        .filter(|h| !h.is_invalid())
}
