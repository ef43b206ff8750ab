use std::sync::Once;

use blackbars_core::{OverlaySurface, Rect, WindowHandle, WindowResult};
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{BLACK_BRUSH, GetStockObject, HBRUSH};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, LWA_ALPHA, RegisterClassW, SW_HIDE,
    SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_SHOWWINDOW, SetLayeredWindowAttributes,
    SetWindowPos, ShowWindow, WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
    WS_EX_TRANSPARENT, WS_POPUP,
};
use windows::core::w;

use crate::window::to_handle;

static REGISTER_CLASS: Once = Once::new();
const CLASS_NAME: windows::core::PCWSTR = w!("BlackBarsWindow");
const WINDOW_TITLE: windows::core::PCWSTR = w!("Black Background");

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| {
        // SAFETY: BLACK_BRUSH is a stock object; it is never freed.
        let brush = unsafe { GetStockObject(BLACK_BRUSH) };
        let wc = WNDCLASSW {
            lpfnWndProc: Some(backdrop_wnd_proc),
            lpszClassName: CLASS_NAME,
            hbrBackground: HBRUSH(brush.0),
            ..Default::default()
        };
        unsafe {
            RegisterClassW(&wc);
        }
    });
}

unsafe extern "system" fn backdrop_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Created(HWND),
    Destroyed,
}

/// An opaque black window covering one whole monitor.
///
/// Layered, click-through, never activated and absent from the taskbar
/// and Alt+Tab. It is created lazily on first use, sized to the monitor
/// of the window that caused the creation, and must stay on the thread
/// that pumps messages for it.
pub struct Backdrop {
    slot: Slot,
}

impl Backdrop {
    pub fn new() -> Self {
        Self { slot: Slot::Empty }
    }

    fn create(rect: Rect) -> WindowResult<HWND> {
        ensure_class_registered();

        let ex = WS_EX_LAYERED | WS_EX_TOOLWINDOW | WS_EX_TRANSPARENT | WS_EX_NOACTIVATE;
        // SAFETY: The class is registered above and every pointer argument
        // is a static wide string.
        let hwnd = unsafe {
            CreateWindowExW(
                ex,
                CLASS_NAME,
                WINDOW_TITLE,
                WS_POPUP,
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                None,
                None,
                None,
                None,
            )?
        };

        // A layered window stays invisible until its attributes are set.
        // SAFETY: hwnd was just created on this thread.
        if let Err(e) = unsafe { SetLayeredWindowAttributes(hwnd, COLORREF(0), 255, LWA_ALPHA) } {
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
            return Err(e.into());
        }

        blackbars_core::log_debug!("Created backdrop {} at {rect}", to_handle(hwnd));
        Ok(hwnd)
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySurface for Backdrop {
    fn ensure_created(&mut self, rect: Rect) -> WindowResult<WindowHandle> {
        match self.slot {
            Slot::Created(hwnd) => Ok(to_handle(hwnd)),
            Slot::Destroyed => Err("backdrop has already been destroyed".into()),
            Slot::Empty => {
                let hwnd = Self::create(rect)?;
                self.slot = Slot::Created(hwnd);
                Ok(to_handle(hwnd))
            }
        }
    }

    fn show_behind(&mut self, target: WindowHandle) -> WindowResult<()> {
        let Slot::Created(hwnd) = self.slot else {
            return Err("backdrop does not exist".into());
        };

        // Inserting after `target` places the backdrop immediately below
        // it, which is all the masking needs.
        // SAFETY: Both handles are plain values; SetWindowPos validates them.
        unsafe {
            SetWindowPos(
                hwnd,
                Some(HWND(target.0 as *mut _)),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_SHOWWINDOW,
            )?;
        }
        Ok(())
    }

    fn hide(&mut self) {
        if let Slot::Created(hwnd) = self.slot {
            unsafe {
                let _ = ShowWindow(hwnd, SW_HIDE);
            }
        }
    }

    fn destroy(&mut self) -> WindowResult<()> {
        let previous = std::mem::replace(&mut self.slot, Slot::Destroyed);
        if let Slot::Created(hwnd) = previous {
            // SAFETY: Called on the creating thread; the handle is not used
            // again because the slot is now Destroyed.
            unsafe { DestroyWindow(hwnd)? };
            blackbars_core::log_debug!("Destroyed backdrop {}", to_handle(hwnd));
        }
        Ok(())
    }

    fn handle(&self) -> Option<WindowHandle> {
        match self.slot {
            Slot::Created(hwnd) => Some(to_handle(hwnd)),
            Slot::Empty | Slot::Destroyed => None,
        }
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}
