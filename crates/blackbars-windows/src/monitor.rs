use std::mem;

use blackbars_core::{Rect, WindowResult};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, HMONITOR, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow,
};
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};

/// Declares this process as per-monitor DPI aware (V2).
///
/// Without this, monitor rectangles are virtualised to the primary
/// monitor's scale and the backdrop leaves uncovered strips on scaled
/// displays. Call once before creating any window.
pub fn enable_dpi_awareness() {
    // SAFETY: Called once at startup. Failure (e.g. already set via a
    // manifest) leaves the previous awareness in place.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// Returns the full bounds of the monitor nearest to the window.
///
/// This is `rcMonitor`, not the work area: the backdrop has to cover the
/// strip the taskbar normally occupies.
pub fn monitor_rect_for_window(hwnd: HWND) -> WindowResult<Rect> {
    // SAFETY: MonitorFromWindow accepts any handle and, with
    // MONITOR_DEFAULTTONEAREST, falls back to the closest monitor.
    let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    if monitor.is_invalid() {
        return Err(format!("no monitor for window 0x{:X}", hwnd.0 as usize).into());
    }
    monitor_rect(monitor)
}

fn monitor_rect(monitor: HMONITOR) -> WindowResult<Rect> {
    let mut info = MONITORINFO {
        cbSize: mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    // SAFETY: cbSize is set as the API requires; the struct is ours.
    let success = unsafe { GetMonitorInfoW(monitor, &mut info) };
    if !success.as_bool() {
        return Err("Failed to get monitor info".into());
    }

    let rc = info.rcMonitor;
    Ok(Rect::new(rc.left, rc.top, rc.right, rc.bottom))
}
