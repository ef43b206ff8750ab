//! Main-thread message pump and the WinEvent dispatcher slot.
//!
//! Out-of-context WinEvent callbacks are delivered by the message pump
//! of the thread that installed the hooks, so every notification runs on
//! that thread, one at a time. The one exception is re-entrancy: a Win32
//! call made while handling a notification may pump messages and deliver
//! the next notification before the first one returns. Such nested
//! notifications are parked and replayed once the outer handler is done.

use std::cell::{Cell, RefCell};

use blackbars_core::WindowEvent;
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PostThreadMessageW, TranslateMessage, WM_QUIT,
};

type Handler = Box<dyn FnMut(WindowEvent)>;

thread_local! {
    static HANDLER: RefCell<Option<Handler>> = const { RefCell::new(None) };
    static PARKED: Cell<Option<WindowEvent>> = const { Cell::new(None) };
}

/// Installs the handler that receives this thread's window events.
///
/// The handler is removed when the returned guard is dropped. Drop the
/// guard before tearing down whatever the handler reaches into.
pub fn set_handler(handler: impl FnMut(WindowEvent) + 'static) -> HandlerGuard {
    HANDLER.with(|slot| *slot.borrow_mut() = Some(Box::new(handler)));
    HandlerGuard { _private: () }
}

/// Removes the thread's event handler on drop.
pub struct HandlerGuard {
    _private: (),
}

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        HANDLER.with(|slot| {
            // Dropping mid-dispatch is impossible: the guard lives on the
            // stack frame that runs the pump.
            if let Ok(mut slot) = slot.try_borrow_mut() {
                *slot = None;
            }
        });
        PARKED.with(|p| p.set(None));
    }
}

/// Delivers an event to this thread's handler.
///
/// Nested calls park the event instead of re-entering the handler. Only
/// the latest parked event is kept: any one of them triggers the same
/// full re-evaluation.
pub fn dispatch(event: WindowEvent) {
    HANDLER.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            PARKED.with(|p| p.set(Some(event)));
            return;
        };
        let Some(handler) = slot.as_mut() else {
            return;
        };

        handler(event);
        while let Some(parked) = PARKED.with(Cell::take) {
            handler(parked);
        }
    });
}

/// Runs the message pump until `WM_QUIT` arrives for this thread.
pub fn run_message_pump() {
    let mut msg = MSG::default();

    // GetMessageW returns 0 on WM_QUIT and -1 on error.
    while unsafe { GetMessageW(&mut msg, None, 0, 0) }.0 > 0 {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Asks a thread's message pump to stop. Safe to use from any thread.
#[derive(Debug, Clone, Copy)]
pub struct QuitHandle {
    thread_id: u32,
}

impl QuitHandle {
    /// A handle targeting the calling thread.
    pub fn current() -> Self {
        // SAFETY: GetCurrentThreadId has no preconditions.
        Self {
            thread_id: unsafe { GetCurrentThreadId() },
        }
    }

    /// Posts `WM_QUIT` to the target thread. Repeated calls are harmless.
    pub fn request(&self) {
        unsafe {
            let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use blackbars_core::WindowHandle;

    use super::*;

    fn foreground(value: usize) -> WindowEvent {
        WindowEvent::Foreground {
            hwnd: WindowHandle(value),
        }
    }

    #[test]
    fn events_reach_the_installed_handler() {
        // Arrange
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _guard = set_handler(move |e| sink.borrow_mut().push(e));

        // Act
        dispatch(foreground(1));
        dispatch(WindowEvent::Startup);

        // Assert
        assert_eq!(*seen.borrow(), vec![foreground(1), WindowEvent::Startup]);
    }

    #[test]
    fn nested_events_are_replayed_after_the_outer_one() {
        // Arrange
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _guard = set_handler(move |e| {
            sink.borrow_mut().push(e);
            if e == foreground(1) {
                // Simulates a notification delivered while the handler
                // is still inside a Win32 call.
                dispatch(foreground(2));
            }
        });

        // Act
        dispatch(foreground(1));

        // Assert
        assert_eq!(*seen.borrow(), vec![foreground(1), foreground(2)]);
    }

    #[test]
    fn events_without_handler_are_dropped() {
        // Arrange
        let seen = Rc::new(Cell::new(0));
        let sink = seen.clone();
        let guard = set_handler(move |_| sink.set(sink.get() + 1));
        drop(guard);

        // Act
        dispatch(WindowEvent::Startup);

        // Assert
        assert_eq!(seen.get(), 0);
    }
}
