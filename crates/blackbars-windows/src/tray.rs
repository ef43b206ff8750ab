//! Notification-area icon with a status line and an Exit item.
//!
//! The icon lives on its own thread with its own hidden window and
//! message pump. It never touches the backdrop state: the status is read
//! from a [`StatusHandle`] when the menu opens, and Exit only raises the
//! shutdown flag and asks the main thread to quit.

use std::cell::{Cell, RefCell};
use std::sync::mpsc;
use std::thread;

use blackbars_core::{ShutdownFlag, StatusHandle, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW, Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyMenu, DestroyWindow,
    GetCursorPos, IDI_APPLICATION, LoadIconW, MF_GRAYED, MF_SEPARATOR, MF_STRING, PostMessageW,
    RegisterClassW, RegisterWindowMessageW, SetForegroundWindow, TPM_BOTTOMALIGN, TPM_NONOTIFY,
    TPM_RETURNCMD, TPM_RIGHTBUTTON, TrackPopupMenu, WM_APP, WM_LBUTTONUP, WM_NULL, WM_RBUTTONUP,
    WNDCLASSW, WS_EX_TOOLWINDOW,
};
use windows::core::{HSTRING, PCWSTR, w};

use crate::event_loop::{self, QuitHandle};

const WM_TRAY_ICON: u32 = WM_APP + 1;
const TRAY_ICON_ID: u32 = 1;
const IDM_STATUS: usize = 1001;
const IDM_EXIT: usize = 1002;
const TOOLTIP: &str = "Black Bars";

struct TrayContext {
    status: StatusHandle,
    shutdown: ShutdownFlag,
    quit: QuitHandle,
}

thread_local! {
    static CONTEXT: RefCell<Option<TrayContext>> = const { RefCell::new(None) };
    static TASKBAR_CREATED: Cell<u32> = const { Cell::new(0) };
}

/// Handle to the running tray thread.
pub struct Tray {
    quit: QuitHandle,
    handle: thread::JoinHandle<()>,
}

impl Tray {
    /// Starts the tray thread and waits until its icon is visible.
    ///
    /// `quit` targets the main thread; Exit uses it after raising the
    /// shutdown flag.
    pub fn spawn(
        status: StatusHandle,
        shutdown: ShutdownFlag,
        quit: QuitHandle,
    ) -> WindowResult<Self> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<QuitHandle, String>>();

        let handle = thread::spawn(move || {
            CONTEXT.with(|c| {
                *c.borrow_mut() = Some(TrayContext {
                    status,
                    shutdown,
                    quit,
                })
            });

            let hwnd = match create_tray_window() {
                Ok(hwnd) => hwnd,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            if !add_icon(hwnd) {
                unsafe {
                    let _ = DestroyWindow(hwnd);
                }
                let _ = ready_tx.send(Err("Shell_NotifyIconW refused the icon".into()));
                return;
            }

            let _ = ready_tx.send(Ok(QuitHandle::current()));
            event_loop::run_message_pump();

            remove_icon(hwnd);
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
        });

        let tray_quit = ready_rx
            .recv()
            .map_err(|_| -> Box<dyn std::error::Error> {
                "tray thread exited unexpectedly".into()
            })?
            .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;

        Ok(Self {
            quit: tray_quit,
            handle,
        })
    }

    /// Removes the icon and waits for the tray thread to finish.
    pub fn stop(self) {
        self.quit.request();
        let _ = self.handle.join();
    }
}

fn create_tray_window() -> Result<HWND, String> {
    let class_name = w!("BlackBarsTray");
    let wc = WNDCLASSW {
        lpfnWndProc: Some(tray_wnd_proc),
        lpszClassName: class_name,
        ..Default::default()
    };

    // SAFETY: Registration and creation happen on the tray thread, which
    // also pumps the window's messages. A second tray in the same process
    // finds the class already registered; CreateWindowExW still succeeds.
    unsafe {
        RegisterClassW(&wc);
        TASKBAR_CREATED.with(|c| c.set(RegisterWindowMessageW(w!("TaskbarCreated"))));

        // WS_EX_TOOLWINDOW and no WS_VISIBLE: hidden, no taskbar entry.
        CreateWindowExW(
            WS_EX_TOOLWINDOW,
            class_name,
            w!("Black Bars Tray"),
            Default::default(),
            0,
            0,
            0,
            0,
            None,
            None,
            None,
            None,
        )
        .map_err(|e| format!("failed to create tray window: {e}"))
    }
}

fn icon_data(hwnd: HWND) -> NOTIFYICONDATAW {
    NOTIFYICONDATAW {
        cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: hwnd,
        uID: TRAY_ICON_ID,
        ..Default::default()
    }
}

fn add_icon(hwnd: HWND) -> bool {
    let mut nid = icon_data(hwnd);
    nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
    nid.uCallbackMessage = WM_TRAY_ICON;

    // SAFETY: IDI_APPLICATION is a system icon; no module handle needed.
    if let Ok(icon) = unsafe { LoadIconW(None, IDI_APPLICATION) } {
        nid.hIcon = icon;
    }

    let tip: Vec<u16> = TOOLTIP.encode_utf16().collect();
    let len = tip.len().min(nid.szTip.len() - 1);
    nid.szTip[..len].copy_from_slice(&tip[..len]);

    unsafe { Shell_NotifyIconW(NIM_ADD, &nid).as_bool() }
}

fn remove_icon(hwnd: HWND) {
    let nid = icon_data(hwnd);
    unsafe {
        let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
    }
}

fn status_label(status: &StatusHandle) -> String {
    format!("Status: {}", status.status())
}

fn show_context_menu(hwnd: HWND) {
    let Some(label) = CONTEXT.with(|c| c.borrow().as_ref().map(|ctx| status_label(&ctx.status)))
    else {
        return;
    };

    // SAFETY: The menu is created, shown and destroyed within this call
    // on the thread that owns `hwnd`. The label strings outlive
    // TrackPopupMenu.
    unsafe {
        let Ok(menu) = CreatePopupMenu() else {
            return;
        };
        let status = HSTRING::from(label);
        let _ = AppendMenuW(menu, MF_STRING | MF_GRAYED, IDM_STATUS, PCWSTR(status.as_ptr()));
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
        let _ = AppendMenuW(menu, MF_STRING, IDM_EXIT, w!("Exit"));

        let mut pt = POINT::default();
        let _ = GetCursorPos(&mut pt);

        // Without this the menu does not close when clicking elsewhere.
        let _ = SetForegroundWindow(hwnd);

        let chosen = TrackPopupMenu(
            menu,
            TPM_RETURNCMD | TPM_NONOTIFY | TPM_RIGHTBUTTON | TPM_BOTTOMALIGN,
            pt.x,
            pt.y,
            Some(0),
            hwnd,
            None,
        );
        let _ = PostMessageW(Some(hwnd), WM_NULL, WPARAM(0), LPARAM(0));
        let _ = DestroyMenu(menu);

        if chosen.0 as usize == IDM_EXIT {
            request_exit();
        }
    }
}

fn request_exit() {
    CONTEXT.with(|c| {
        if let Some(ctx) = c.borrow().as_ref() {
            blackbars_core::log_info!("Exit requested from tray");
            ctx.shutdown.trigger();
            ctx.quit.request();
        }
    });
}

unsafe extern "system" fn tray_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_TRAY_ICON {
        let mouse = (lparam.0 & 0xFFFF) as u32;
        if mouse == WM_RBUTTONUP || mouse == WM_LBUTTONUP {
            show_context_menu(hwnd);
        }
        return LRESULT(0);
    }

    // Explorer restarted: the old icon is gone.
    let taskbar_created = TASKBAR_CREATED.with(Cell::get);
    if taskbar_created != 0 && msg == taskbar_created {
        add_icon(hwnd);
        return LRESULT(0);
    }

    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}
