//! Console control handler using `SetConsoleCtrlHandler`.
//!
//! Covers Ctrl+C, Ctrl+Break, closing the console window, logoff and
//! system shutdown. The handler runs on a thread Windows creates for
//! it, so it never touches the desktop itself: it raises the shutdown
//! flag and asks the main thread's pump to quit. For the close, logoff
//! and shutdown signals the process is killed once the handler returns,
//! so it then waits (bounded) for the main thread to finish restoring.

use std::sync::{Condvar, Mutex, OnceLock};
use std::time::Duration;

use blackbars_core::{ShutdownFlag, WindowResult};
use windows::Win32::System::Console::{
    CTRL_BREAK_EVENT, CTRL_C_EVENT, CTRL_CLOSE_EVENT, CTRL_LOGOFF_EVENT, CTRL_SHUTDOWN_EVENT,
    SetConsoleCtrlHandler,
};
use windows::core::BOOL;

use crate::event_loop::QuitHandle;

/// How long a terminating signal waits for cleanup before letting
/// Windows end the process.
const CLEANUP_GRACE: Duration = Duration::from_secs(5);

struct Registration {
    shutdown: ShutdownFlag,
    quit: QuitHandle,
}

static REGISTRATION: OnceLock<Registration> = OnceLock::new();
static CLEANUP_DONE: (Mutex<bool>, Condvar) = (Mutex::new(false), Condvar::new());

/// Registers the console handler. Only the first registration counts.
pub fn set_handler(shutdown: ShutdownFlag, quit: QuitHandle) -> WindowResult<()> {
    if REGISTRATION.set(Registration { shutdown, quit }).is_err() {
        return Err("console handler already registered".into());
    }
    // SAFETY: `handler` is a plain function that stays valid for the life
    // of the process.
    unsafe { SetConsoleCtrlHandler(Some(handler), true)? };
    Ok(())
}

/// Tells a waiting handler that the desktop has been restored.
pub fn cleanup_finished() {
    let (lock, cvar) = &CLEANUP_DONE;
    if let Ok(mut done) = lock.lock() {
        *done = true;
        cvar.notify_all();
    }
}

fn wait_for_cleanup() {
    let (lock, cvar) = &CLEANUP_DONE;
    let Ok(done) = lock.lock() else {
        return;
    };
    let _ = cvar.wait_timeout_while(done, CLEANUP_GRACE, |done| !*done);
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    let Some(reg) = REGISTRATION.get() else {
        return BOOL(0);
    };

    match ctrl_type {
        CTRL_C_EVENT | CTRL_BREAK_EVENT => {
            reg.shutdown.trigger();
            reg.quit.request();
        }
        CTRL_CLOSE_EVENT | CTRL_LOGOFF_EVENT | CTRL_SHUTDOWN_EVENT => {
            reg.shutdown.trigger();
            reg.quit.request();
            wait_for_cleanup();
        }
        _ => return BOOL(0),
    }
    BOOL(1)
}
