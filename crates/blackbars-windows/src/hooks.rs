use blackbars_core::{Subscriptions, WindowResult};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent};
use windows::Win32::UI::WindowsAndMessaging::WINEVENT_OUTOFCONTEXT;

use crate::{event, event_loop};

/// The installed WinEvent hooks.
///
/// Hooks are thread-affine: they must be installed and removed on the
/// thread that pumps messages, and their callbacks run on that thread.
/// Anything still installed when this value is dropped is removed.
pub struct EventHooks {
    hooks: Vec<HWINEVENTHOOK>,
}

impl EventHooks {
    /// Installs one hook per range in [`event::HOOK_RANGES`].
    ///
    /// A range that fails is logged and skipped; the rest stay usable.
    /// Fails only when no hook at all could be installed.
    pub fn install() -> WindowResult<Self> {
        let mut hooks = Vec::with_capacity(event::HOOK_RANGES.len());

        for (min, max) in event::HOOK_RANGES {
            // SAFETY: Out-of-context hooks call back into this process via
            // the installing thread's message queue. Our own windows are
            // included on purpose: the tray menu taking focus must count
            // as a focus change.
            let hook = unsafe {
                SetWinEventHook(
                    min,
                    max,
                    None,
                    Some(win_event_proc),
                    0,
                    0,
                    WINEVENT_OUTOFCONTEXT,
                )
            };

            if hook.is_invalid() {
                blackbars_core::log_warn!("Failed to install hook for events 0x{min:04X}-0x{max:04X}");
            } else {
                hooks.push(hook);
            }
        }

        if hooks.is_empty() {
            return Err("Failed to install Windows event hooks".into());
        }
        Ok(Self { hooks })
    }
}

impl Subscriptions for EventHooks {
    fn count(&self) -> usize {
        self.hooks.len()
    }

    fn uninstall(&mut self) -> WindowResult<usize> {
        let total = self.hooks.len();
        let failed = self
            .hooks
            .drain(..)
            // SAFETY: Each hook was returned by SetWinEventHook on this
            // thread and is removed exactly once.
            .filter(|hook| !unsafe { UnhookWinEvent(*hook) }.as_bool())
            .count();

        if failed > 0 {
            return Err(format!("{failed} of {total} event hook(s) could not be removed").into());
        }
        Ok(total)
    }
}

impl Drop for EventHooks {
    fn drop(&mut self) {
        let _ = self.uninstall();
    }
}

/// The WinEvent callback. Runs on the installing thread.
unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    _id_object: i32,
    _id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    event_loop::dispatch(event::translate(event, hwnd));
}
