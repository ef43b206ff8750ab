use blackbars_core::WindowEvent;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    EVENT_OBJECT_REORDER, EVENT_SYSTEM_FOREGROUND, EVENT_SYSTEM_MINIMIZEEND,
    EVENT_SYSTEM_MINIMIZESTART,
};

use crate::window::to_handle;

/// Inclusive event code ranges the hooks subscribe to.
///
/// The first covers foreground changes through minimize end (menus,
/// capture, move/size and drag events come along with it). The second is
/// z-order changes, which is how another window slipping between the
/// target and the backdrop is noticed.
pub const HOOK_RANGES: [(u32, u32); 2] = [
    (EVENT_SYSTEM_FOREGROUND, EVENT_SYSTEM_MINIMIZEEND),
    (EVENT_OBJECT_REORDER, EVENT_OBJECT_REORDER),
];

/// Translates a raw WinEvent into a [`WindowEvent`].
///
/// Every code is classified; nothing is filtered out, because each
/// notification only serves as a cue to re-read the desktop.
pub fn translate(event: u32, hwnd: HWND) -> WindowEvent {
    let hwnd = to_handle(hwnd);

    match event {
        EVENT_SYSTEM_FOREGROUND => WindowEvent::Foreground { hwnd },
        EVENT_SYSTEM_MINIMIZESTART => WindowEvent::MinimizeStart { hwnd },
        EVENT_SYSTEM_MINIMIZEEND => WindowEvent::MinimizeEnd { hwnd },
        EVENT_OBJECT_REORDER => WindowEvent::Reorder { hwnd },
        code => WindowEvent::Other { code, hwnd },
    }
}
