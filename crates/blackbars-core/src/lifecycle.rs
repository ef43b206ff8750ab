//! Startup/shutdown coordination.
//!
//! [`Lifecycle`] owns the state machine and the installed event
//! subscriptions, and is the only place the restore sequence lives:
//! raise the shutdown flag, uninstall subscriptions, show the taskbar,
//! destroy the backdrop. It runs once, either explicitly or on drop.

use crate::{FocusMachine, OverlaySurface, ShutdownFlag, Taskbar, WindowQuery, WindowResult};

/// A set of installed window-manager subscriptions.
pub trait Subscriptions {
    /// Number of subscriptions currently installed.
    fn count(&self) -> usize;

    /// Removes every subscription this value installed. Returns how many
    /// were removed. A second call removes nothing.
    fn uninstall(&mut self) -> WindowResult<usize>;
}

pub struct Lifecycle<Q, O, T, S>
where
    Q: WindowQuery,
    O: OverlaySurface,
    T: Taskbar,
    S: Subscriptions,
{
    machine: FocusMachine<Q, O, T>,
    subscriptions: Option<S>,
    shutdown: ShutdownFlag,
    finished: bool,
}

impl<Q, O, T, S> Lifecycle<Q, O, T, S>
where
    Q: WindowQuery,
    O: OverlaySurface,
    T: Taskbar,
    S: Subscriptions,
{
    pub fn new(machine: FocusMachine<Q, O, T>) -> Self {
        let shutdown = machine.shutdown_flag();
        Self {
            machine,
            subscriptions: None,
            shutdown,
            finished: false,
        }
    }

    /// Takes ownership of the installed subscriptions so they are
    /// released by [`shutdown`](Self::shutdown).
    pub fn attach(&mut self, subscriptions: S) {
        self.subscriptions = Some(subscriptions);
    }

    /// Installs the subscriptions with `install` and takes ownership of
    /// them. Returns how many are active.
    ///
    /// Partial installs are accepted. When nothing could be installed the
    /// desktop is restored immediately and the error is returned, so the
    /// caller can exit without further cleanup.
    pub fn start<F>(&mut self, install: F) -> WindowResult<usize>
    where
        F: FnOnce() -> WindowResult<S>,
    {
        let result = install().and_then(|subscriptions| match subscriptions.count() {
            0 => Err("no event hook could be installed".into()),
            n => Ok((subscriptions, n)),
        });

        match result {
            Ok((subscriptions, n)) => {
                self.attach(subscriptions);
                Ok(n)
            }
            Err(e) => {
                crate::log_error!("Failed to install event hooks: {e}");
                self.shutdown();
                Err(e)
            }
        }
    }

    pub fn machine(&self) -> &FocusMachine<Q, O, T> {
        &self.machine
    }

    pub fn shutdown_flag(&self) -> ShutdownFlag {
        self.shutdown.clone()
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    /// Handles one window-manager notification.
    ///
    /// Late notifications that arrive after shutdown has begun are
    /// dropped without touching the desktop.
    pub fn dispatch(&mut self) {
        if self.shutdown.is_set() {
            return;
        }
        self.machine.reevaluate();
    }

    /// Restores the desktop. Every step runs even if an earlier one
    /// failed; failures are logged, never returned. Only the first call
    /// does anything.
    pub fn shutdown(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.shutdown.trigger();
        crate::log_info!("Cleaning up...");

        if let Some(mut subscriptions) = self.subscriptions.take() {
            match subscriptions.uninstall() {
                Ok(n) => crate::log_info!("Uninstalled {n} event hook(s)"),
                Err(e) => crate::log_error!("Failed to uninstall event hooks: {e}"),
            }
        }

        self.machine.restore_taskbar();

        if let Err(e) = self.machine.destroy_overlay() {
            crate::log_error!("Failed to destroy backdrop: {e}");
        }

        crate::log_info!("Cleanup complete");
    }
}

impl<Q, O, T, S> Drop for Lifecycle<Q, O, T, S>
where
    Q: WindowQuery,
    O: OverlaySurface,
    T: Taskbar,
    S: Subscriptions,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::testing::{BACKDROP, Desktop, FakeOverlay, FakeQuery, FakeTaskbar};
    use crate::{MonitoredTitles, OverlayState};

    const GAME: usize = 0x100;

    struct FakeHooks {
        installed: usize,
        uninstalls: Rc<Cell<u32>>,
        fail: bool,
    }

    impl Subscriptions for FakeHooks {
        fn count(&self) -> usize {
            self.installed
        }

        fn uninstall(&mut self) -> WindowResult<usize> {
            self.uninstalls.set(self.uninstalls.get() + 1);
            if self.fail {
                return Err("UnhookWinEvent failed".into());
            }
            Ok(std::mem::take(&mut self.installed))
        }
    }

    type TestLifecycle = Lifecycle<FakeQuery, FakeOverlay, FakeTaskbar, FakeHooks>;

    type Fixture = (Rc<RefCell<Desktop>>, Rc<Cell<u32>>, TestLifecycle);

    fn unstarted() -> (Rc<RefCell<Desktop>>, TestLifecycle) {
        let desktop = Desktop::shared();
        desktop.borrow_mut().open(GAME, "Game");
        let machine = FocusMachine::new(
            MonitoredTitles::new(["Game"]),
            FakeQuery(desktop.clone()),
            FakeOverlay::new(desktop.clone()),
            FakeTaskbar::default(),
            ShutdownFlag::new(),
        );
        (desktop, Lifecycle::new(machine))
    }

    fn lifecycle(fail_uninstall: bool) -> Fixture {
        let (desktop, mut lifecycle) = unstarted();
        let uninstalls = Rc::new(Cell::new(0));
        lifecycle.attach(FakeHooks {
            installed: 2,
            uninstalls: uninstalls.clone(),
            fail: fail_uninstall,
        });
        (desktop, uninstalls, lifecycle)
    }

    #[test]
    fn shutdown_while_active_restores_everything() {
        // Arrange
        let (desktop, uninstalls, mut lc) = lifecycle(false);
        desktop.borrow_mut().focus(GAME);
        lc.dispatch();
        assert!(lc.machine().state().is_active());

        // Act
        lc.shutdown();

        // Assert
        assert_eq!(uninstalls.get(), 1);
        assert!(!lc.machine().taskbar().hidden);
        assert_eq!(lc.machine().overlay().destroys, 1);
        assert!(lc.machine().overlay().handle.is_none());
        assert_eq!(lc.machine().state(), OverlayState::Inactive);
        assert_eq!(lc.machine().status_handle().status(), "Inactive");
        assert!(lc.shutdown_flag().is_set());
    }

    #[test]
    fn shutdown_while_inactive_still_shows_taskbar() {
        // Arrange
        let (_desktop, _uninstalls, mut lc) = lifecycle(false);

        // Act
        lc.shutdown();

        // Assert
        assert_eq!(lc.machine().taskbar().shows, 1);
        assert_eq!(lc.machine().overlay().creates, 0);
        assert_eq!(lc.machine().overlay().destroys, 0);
    }

    #[test]
    fn shutdown_runs_only_once() {
        // Arrange
        let (desktop, uninstalls, mut lc) = lifecycle(false);
        desktop.borrow_mut().focus(GAME);
        lc.dispatch();

        // Act
        lc.shutdown();
        lc.shutdown();

        // Assert
        assert_eq!(uninstalls.get(), 1);
        assert_eq!(lc.machine().taskbar().shows, 1);
        assert_eq!(lc.machine().overlay().destroys, 1);
        assert!(lc.is_finished());
    }

    #[test]
    fn failed_uninstall_does_not_skip_later_steps() {
        // Arrange
        let (desktop, uninstalls, mut lc) = lifecycle(true);
        desktop.borrow_mut().focus(GAME);
        lc.dispatch();

        // Act
        lc.shutdown();

        // Assert
        assert_eq!(uninstalls.get(), 1);
        assert!(!lc.machine().taskbar().hidden);
        assert_eq!(lc.machine().overlay().destroys, 1);
    }

    #[test]
    fn notifications_after_shutdown_are_discarded() {
        // Arrange
        let (desktop, _uninstalls, mut lc) = lifecycle(false);
        let flag = lc.shutdown_flag();
        desktop.borrow_mut().focus(GAME);

        // Act: another thread requested termination before the loop exited.
        flag.trigger();
        lc.dispatch();

        // Assert
        assert_eq!(lc.machine().overlay().creates, 0);
        assert_eq!(lc.machine().taskbar().hides, 0);

        // Act: cleanup still runs in full even though the flag was set.
        lc.shutdown();

        // Assert
        assert_eq!(lc.machine().taskbar().shows, 1);
    }

    #[test]
    fn backdrop_is_never_recreated_after_shutdown() {
        // Arrange
        let (desktop, _uninstalls, mut lc) = lifecycle(false);
        desktop.borrow_mut().focus(GAME);
        lc.dispatch();
        lc.shutdown();

        // Act
        lc.dispatch();

        // Assert
        assert_eq!(lc.machine().overlay().creates, 1);
        assert!(lc.machine().overlay().handle.is_none());
    }

    #[test]
    fn failed_install_restores_desktop_and_reports_error() {
        // Arrange
        let (_desktop, mut lc) = unstarted();

        // Act
        let result = lc.start(|| Err("SetWinEventHook failed".into()));

        // Assert
        assert!(result.is_err());
        assert!(lc.shutdown_flag().is_set());
        assert!(lc.is_finished());
        assert_eq!(lc.machine().taskbar().shows, 1);
        assert!(!lc.machine().taskbar().hidden);
    }

    #[test]
    fn install_with_no_hooks_is_fatal() {
        // Arrange
        let (_desktop, mut lc) = unstarted();
        let uninstalls = Rc::new(Cell::new(0));

        // Act
        let result = lc.start(|| {
            Ok(FakeHooks {
                installed: 0,
                uninstalls: uninstalls.clone(),
                fail: false,
            })
        });

        // Assert
        assert!(result.is_err());
        assert!(lc.shutdown_flag().is_set());
        assert_eq!(lc.machine().taskbar().shows, 1);
    }

    #[test]
    fn partial_install_is_accepted() {
        // Arrange
        let (desktop, mut lc) = unstarted();
        let uninstalls = Rc::new(Cell::new(0));

        // Act
        let result = lc.start(|| {
            Ok(FakeHooks {
                installed: 1,
                uninstalls: uninstalls.clone(),
                fail: false,
            })
        });
        desktop.borrow_mut().focus(GAME);
        lc.dispatch();

        // Assert
        assert_eq!(result.unwrap(), 1);
        assert!(!lc.shutdown_flag().is_set());
        assert!(lc.machine().state().is_active());

        // Act: the single hook is still released on shutdown.
        lc.shutdown();

        // Assert
        assert_eq!(uninstalls.get(), 1);
    }

    #[test]
    fn dropping_runs_cleanup() {
        // Arrange
        let (desktop, uninstalls, mut lc) = lifecycle(false);
        desktop.borrow_mut().focus(GAME);
        lc.dispatch();
        assert_eq!(desktop.borrow().below(GAME), BACKDROP);

        // Act
        drop(lc);

        // Assert
        assert_eq!(uninstalls.get(), 1);
        assert_ne!(desktop.borrow().below(GAME), BACKDROP);
    }
}
