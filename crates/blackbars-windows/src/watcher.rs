use std::cell::RefCell;
use std::rc::{Rc, Weak};

use blackbars_core::{
    Config, FocusMachine, Lifecycle, MonitoredTitles, ShutdownFlag, Subscriptions, WindowEvent,
    WindowResult, log_debug, log_info, log_warn,
};

use crate::backdrop::Backdrop;
use crate::event_loop::{self, QuitHandle};
use crate::hooks::EventHooks;
use crate::taskbar::{self, ShellTaskbar};
use crate::tray::Tray;
use crate::window::DesktopQuery;
use crate::{ctrl_c, monitor};

type DesktopLifecycle = Lifecycle<DesktopQuery, Backdrop, ShellTaskbar, EventHooks>;

/// Runs Black Bars until Ctrl+C, console close, logoff or tray Exit.
///
/// Everything that touches the desktop happens on the calling thread,
/// which must stay the same for the whole run: hooks, the backdrop and
/// the message pump are all bound to it. The desktop is restored before
/// this returns, on success and on error alike.
pub fn run(config: &Config) -> WindowResult<()> {
    monitor::enable_dpi_awareness();
    install_panic_hook();

    let result = watch(config);

    // Release a console handler waiting for us to finish.
    ctrl_c::cleanup_finished();

    result
}

fn watch(config: &Config) -> WindowResult<()> {
    let titles = config.monitored_titles();
    print_banner(&titles);

    let shutdown = ShutdownFlag::new();
    let quit = QuitHandle::current();
    if let Err(e) = ctrl_c::set_handler(shutdown.clone(), quit) {
        log_warn!("Console control handler not installed: {e}");
    }

    let machine = FocusMachine::new(
        titles,
        DesktopQuery,
        Backdrop::new(),
        ShellTaskbar,
        shutdown.clone(),
    );
    let status = machine.status_handle();
    let lifecycle = Rc::new(RefCell::new(Lifecycle::new(machine)));

    // Declared after `lifecycle` so an early return drops the handler
    // first and the lifecycle's cleanup runs without it.
    let handler = event_loop::set_handler(event_handler(
        Rc::downgrade(&lifecycle),
        shutdown.clone(),
    ));

    // On failure the desktop is already restored when this returns.
    let installed = lifecycle.borrow_mut().start(EventHooks::install)?;
    log_info!("Event hooks installed ({installed} hooks)");

    let tray = if config.tray {
        match Tray::spawn(status, shutdown.clone(), quit) {
            Ok(tray) => Some(tray),
            Err(e) => {
                log_warn!("Tray icon unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    // A monitored window may already be focused.
    event_loop::dispatch(WindowEvent::Startup);

    log_info!("Black Bars is running. Press Ctrl+C to exit.");
    event_loop::run_message_pump();

    shutdown.trigger();
    drop(handler);
    if let Some(tray) = tray {
        tray.stop();
    }
    lifecycle.borrow_mut().shutdown();

    Ok(())
}

fn event_handler(
    lifecycle: Weak<RefCell<DesktopLifecycle>>,
    shutdown: ShutdownFlag,
) -> impl FnMut(WindowEvent) {
    move |event| {
        log_debug!("{event}");
        if shutdown.is_set() {
            return;
        }
        if let Some(shared) = lifecycle.upgrade()
            && let Ok(mut lc) = shared.try_borrow_mut()
        {
            lc.dispatch();
        }
    }
}

fn print_banner(titles: &MonitoredTitles) {
    log_info!("Black Bars started");
    if titles.is_empty() {
        log_warn!("No window titles configured; the backdrop will never be shown");
        return;
    }
    log_info!("Monitoring windows:");
    for title in titles.iter() {
        log_info!("  - {title}");
    }
}

/// Shows the taskbar before the default panic output.
///
/// Release builds abort on panic, so no destructor would run to do it.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        taskbar::restore();
        previous(info);
    }));
}

/// Feeds every hooked window event to `on_event` until Ctrl+C.
///
/// Read-only: no backdrop is created and the taskbar is left alone.
pub fn watch_events(on_event: impl FnMut(WindowEvent) + 'static) -> WindowResult<()> {
    let shutdown = ShutdownFlag::new();
    ctrl_c::set_handler(shutdown.clone(), QuitHandle::current())?;

    let _handler = event_loop::set_handler(on_event);
    let mut hooks = EventHooks::install()?;

    event_loop::run_message_pump();

    hooks.uninstall()?;
    ctrl_c::cleanup_finished();
    Ok(())
}
