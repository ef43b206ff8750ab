//! In-memory desktop used by the state machine and lifecycle tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{OverlaySurface, Rect, Taskbar, WindowHandle, WindowQuery, WindowResult};

pub(crate) const BACKDROP: usize = 0xB1AC;
pub(crate) const PRIMARY: Rect = Rect {
    left: 0,
    top: 0,
    right: 1920,
    bottom: 1080,
};

struct FakeWindow {
    title: String,
    minimized: bool,
    monitor: Option<Rect>,
}

/// Windows, their z-order (front first) and the foreground window.
#[derive(Default)]
pub(crate) struct Desktop {
    windows: HashMap<usize, FakeWindow>,
    z_order: Vec<usize>,
    foreground: usize,
}

impl Desktop {
    pub(crate) fn shared() -> Rc<RefCell<Desktop>> {
        Rc::new(RefCell::new(Desktop::default()))
    }

    /// Opens a window on the primary monitor at the top of the z-order.
    pub(crate) fn open(&mut self, hwnd: usize, title: &str) {
        self.windows.insert(
            hwnd,
            FakeWindow {
                title: title.into(),
                minimized: false,
                monitor: Some(PRIMARY),
            },
        );
        self.raise(hwnd);
    }

    pub(crate) fn focus(&mut self, hwnd: usize) {
        if let Some(w) = self.windows.get_mut(&hwnd) {
            w.minimized = false;
        }
        self.foreground = hwnd;
        self.raise(hwnd);
    }

    /// Minimizes the window. Like Windows, the window keeps foreground
    /// status until something else is activated.
    pub(crate) fn minimize(&mut self, hwnd: usize) {
        if let Some(w) = self.windows.get_mut(&hwnd) {
            w.minimized = true;
        }
    }

    pub(crate) fn close(&mut self, hwnd: usize) {
        self.windows.remove(&hwnd);
        self.z_order.retain(|h| *h != hwnd);
        if self.foreground == hwnd {
            self.foreground = 0;
        }
    }

    pub(crate) fn set_monitor(&mut self, hwnd: usize, monitor: Option<Rect>) {
        if let Some(w) = self.windows.get_mut(&hwnd) {
            w.monitor = monitor;
        }
    }

    /// Places `window` directly below `above` in the z-order.
    pub(crate) fn slip_below(&mut self, above: usize, window: usize) {
        self.z_order.retain(|h| *h != window);
        let at = self
            .z_order
            .iter()
            .position(|h| *h == above)
            .map_or(self.z_order.len(), |i| i + 1);
        self.z_order.insert(at, window);
    }

    pub(crate) fn below(&self, hwnd: usize) -> usize {
        self.z_order
            .iter()
            .position(|h| *h == hwnd)
            .and_then(|i| self.z_order.get(i + 1))
            .copied()
            .unwrap_or(0)
    }

    fn raise(&mut self, hwnd: usize) {
        self.z_order.retain(|h| *h != hwnd);
        self.z_order.insert(0, hwnd);
    }
}

pub(crate) struct FakeQuery(pub(crate) Rc<RefCell<Desktop>>);

impl WindowQuery for FakeQuery {
    fn foreground_window(&self) -> WindowHandle {
        WindowHandle(self.0.borrow().foreground)
    }

    fn title(&self, window: WindowHandle) -> String {
        self.0
            .borrow()
            .windows
            .get(&window.0)
            .map(|w| w.title.clone())
            .unwrap_or_default()
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        self.0
            .borrow()
            .windows
            .get(&window.0)
            .is_some_and(|w| w.minimized)
    }

    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect> {
        self.0.borrow().windows.get(&window.0)?.monitor
    }

    fn neighbor_below(&self, window: WindowHandle) -> WindowHandle {
        WindowHandle(self.0.borrow().below(window.0))
    }
}

/// Records every call so tests can check for redundant work.
pub(crate) struct FakeOverlay {
    desktop: Rc<RefCell<Desktop>>,
    pub(crate) handle: Option<WindowHandle>,
    pub(crate) rect: Option<Rect>,
    pub(crate) visible: bool,
    pub(crate) destroyed: bool,
    pub(crate) creates: u32,
    pub(crate) shows: u32,
    pub(crate) destroys: u32,
    pub(crate) fail_show: bool,
}

impl FakeOverlay {
    pub(crate) fn new(desktop: Rc<RefCell<Desktop>>) -> Self {
        Self {
            desktop,
            handle: None,
            rect: None,
            visible: false,
            destroyed: false,
            creates: 0,
            shows: 0,
            destroys: 0,
            fail_show: false,
        }
    }
}

impl OverlaySurface for FakeOverlay {
    fn ensure_created(&mut self, rect: Rect) -> WindowResult<WindowHandle> {
        if self.destroyed {
            return Err("backdrop already destroyed".into());
        }
        if let Some(handle) = self.handle {
            return Ok(handle);
        }
        self.creates += 1;
        self.rect = Some(rect);
        let handle = WindowHandle(BACKDROP);
        self.handle = Some(handle);
        Ok(handle)
    }

    fn show_behind(&mut self, target: WindowHandle) -> WindowResult<()> {
        let Some(handle) = self.handle else {
            return Err("backdrop not created".into());
        };
        if self.fail_show {
            return Err("SetWindowPos failed".into());
        }
        self.shows += 1;
        self.visible = true;
        self.desktop.borrow_mut().slip_below(target.0, handle.0);
        Ok(())
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn destroy(&mut self) -> WindowResult<()> {
        if let Some(handle) = self.handle.take() {
            self.destroys += 1;
            self.visible = false;
            self.desktop.borrow_mut().close(handle.0);
        }
        self.destroyed = true;
        Ok(())
    }

    fn handle(&self) -> Option<WindowHandle> {
        self.handle
    }
}

#[derive(Default)]
pub(crate) struct FakeTaskbar {
    pub(crate) hidden: bool,
    pub(crate) hides: u32,
    pub(crate) shows: u32,
}

impl Taskbar for FakeTaskbar {
    fn hide(&mut self) {
        self.hides += 1;
        self.hidden = true;
    }

    fn show(&mut self) {
        self.shows += 1;
        self.hidden = false;
    }
}
