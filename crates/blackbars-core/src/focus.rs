//! The focus/backdrop state machine.
//!
//! Every window-manager notification funnels into
//! [`FocusMachine::reevaluate`], which ignores what the notification
//! claimed and recomputes the desired state from live window queries.
//! Duplicate, dropped or reordered notifications therefore cannot leave
//! the desktop in a wrong state for longer than one notification.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{MonitoredTitles, OverlaySurface, ShutdownFlag, Taskbar, WindowHandle, WindowQuery};

/// Whether the backdrop is currently shown, and for which window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Inactive,
    Active {
        target: WindowHandle,
    },
}

impl OverlayState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn label(&self) -> &'static str {
        if self.is_active() { "Active" } else { "Inactive" }
    }
}

/// Read-only view of the machine's activity for other threads.
///
/// The tray icon lives on its own thread and must never borrow the
/// machine, so the machine publishes into this cell after every
/// transition and the tray pulls from it when its menu opens.
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    active: Arc<AtomicBool>,
}

impl StatusHandle {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// `"Active"` or `"Inactive"`.
    pub fn status(&self) -> &'static str {
        if self.is_active() { "Active" } else { "Inactive" }
    }

    fn publish(&self, state: OverlayState) {
        self.active.store(state.is_active(), Ordering::Relaxed);
    }
}

/// Drives the backdrop and taskbar from the foreground window.
///
/// The machine is the only writer of [`OverlayState`]; the query,
/// overlay and taskbar collaborators are owned by it so nothing else
/// can mutate the desktop behind its back.
pub struct FocusMachine<Q, O, T> {
    titles: MonitoredTitles,
    query: Q,
    overlay: O,
    taskbar: T,
    state: OverlayState,
    shutdown: ShutdownFlag,
    status: StatusHandle,
}

impl<Q, O, T> FocusMachine<Q, O, T>
where
    Q: WindowQuery,
    O: OverlaySurface,
    T: Taskbar,
{
    pub fn new(
        titles: MonitoredTitles,
        query: Q,
        overlay: O,
        taskbar: T,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            titles,
            query,
            overlay,
            taskbar,
            state: OverlayState::Inactive,
            shutdown,
            status: StatusHandle::default(),
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// `"Active"` or `"Inactive"`.
    pub fn status(&self) -> &'static str {
        self.state.label()
    }

    /// A handle other threads can poll for [`status`](Self::status).
    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn shutdown_flag(&self) -> ShutdownFlag {
        self.shutdown.clone()
    }

    #[cfg(test)]
    pub(crate) fn titles(&self) -> &MonitoredTitles {
        &self.titles
    }

    #[cfg(test)]
    pub(crate) fn overlay(&self) -> &O {
        &self.overlay
    }

    #[cfg(test)]
    pub(crate) fn taskbar(&self) -> &T {
        &self.taskbar
    }

    /// Brings the backdrop and taskbar in line with the current
    /// foreground window.
    ///
    /// Must not be re-entered; the platform dispatcher serializes calls.
    /// Does nothing once shutdown has begun.
    pub fn reevaluate(&mut self) {
        if self.shutdown.is_set() {
            return;
        }

        let foreground = self.query.foreground_window();
        let title = if foreground.is_null() {
            String::new()
        } else {
            self.query.title(foreground)
        };
        let wanted = self.titles.contains(&title) && !self.query.is_minimized(foreground);

        match (wanted, self.state) {
            (true, OverlayState::Inactive) => {
                self.activate(foreground, &title);
            }
            (true, OverlayState::Active { target }) if target == foreground => {
                self.keep_behind(foreground);
            }
            (true, OverlayState::Active { target }) => {
                crate::log_debug!("Focus moved between monitored windows {target} -> {foreground}");
                if !self.activate(foreground, &title) {
                    self.deactivate();
                }
            }
            (false, OverlayState::Active { .. }) => self.deactivate(),
            (false, OverlayState::Inactive) => {}
        }
    }

    /// Shows the backdrop behind `target` and hides the taskbar.
    ///
    /// Returns `false`, leaving the state untouched, when the backdrop
    /// cannot be sized or placed.
    fn activate(&mut self, target: WindowHandle, title: &str) -> bool {
        let Some(rect) = self.query.monitor_rect(target).filter(|r| !r.is_empty()) else {
            crate::log_warn!("Could not determine monitor for window \"{title}\" ({target})");
            return false;
        };

        if let Err(e) = self.overlay.ensure_created(rect) {
            crate::log_error!("Failed to create backdrop on monitor {rect}: {e}");
            return false;
        }

        if let Err(e) = self.overlay.show_behind(target) {
            crate::log_error!("Failed to place backdrop behind \"{title}\" ({target}): {e}");
            self.overlay.hide();
            return false;
        }

        self.taskbar.hide();
        self.set_state(OverlayState::Active { target });
        crate::log_info!("Black bars activated for window \"{title}\" on monitor {rect}");
        true
    }

    /// Re-inserts the backdrop directly behind `target` when some other
    /// window has slipped in between.
    fn keep_behind(&mut self, target: WindowHandle) {
        let Some(backdrop) = self.overlay.handle() else {
            return;
        };
        let below = self.query.neighbor_below(target);
        if below == backdrop {
            return;
        }

        crate::log_debug!("Z-order drift: {below} sits below {target}, restacking backdrop");
        if let Err(e) = self.overlay.show_behind(target) {
            crate::log_warn!("Failed to restack backdrop behind {target}: {e}");
        }
    }

    fn deactivate(&mut self) {
        self.overlay.hide();
        self.taskbar.show();
        self.set_state(OverlayState::Inactive);
        crate::log_info!("Black bars deactivated");
    }

    fn set_state(&mut self, state: OverlayState) {
        self.state = state;
        self.status.publish(state);
    }

    /// Unconditionally shows the taskbar. Part of the cleanup sequence.
    pub(crate) fn restore_taskbar(&mut self) {
        self.taskbar.show();
        self.set_state(OverlayState::Inactive);
    }

    /// Destroys the backdrop. Safe when none was ever created.
    pub(crate) fn destroy_overlay(&mut self) -> crate::WindowResult<()> {
        self.overlay.destroy()
    }
}

#[cfg(test)]
#[path = "focus_tests.rs"]
mod tests;
