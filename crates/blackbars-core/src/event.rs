use std::fmt;

use crate::WindowHandle;

/// A window-manager notification that may change the backdrop state.
///
/// Platform crates translate raw OS events into these variants. The
/// state machine never trusts the variant: it only uses it as a cue to
/// re-read live state. Classification exists for logging and the
/// `events` diagnostic command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// A window became the foreground window.
    Foreground { hwnd: WindowHandle },

    /// A window started minimizing.
    MinimizeStart { hwnd: WindowHandle },

    /// A window finished restoring from minimized.
    MinimizeEnd { hwnd: WindowHandle },

    /// Children of a window were reordered in z-order.
    Reorder { hwnd: WindowHandle },

    /// Any other event inside the subscribed ranges (menus, capture,
    /// drag and drop, ...). Still triggers a re-evaluation.
    Other { code: u32, hwnd: WindowHandle },

    /// Synthetic cue issued once after hooks are installed, so a
    /// monitored window that is already focused gets its backdrop.
    Startup,
}

impl WindowEvent {
    /// Returns the window handle associated with this event.
    pub fn hwnd(&self) -> WindowHandle {
        match self {
            Self::Foreground { hwnd }
            | Self::MinimizeStart { hwnd }
            | Self::MinimizeEnd { hwnd }
            | Self::Reorder { hwnd }
            | Self::Other { hwnd, .. } => *hwnd,
            Self::Startup => WindowHandle::NULL,
        }
    }
}

impl fmt::Display for WindowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foreground { hwnd } => write!(f, "foreground     {hwnd}"),
            Self::MinimizeStart { hwnd } => write!(f, "minimize-start {hwnd}"),
            Self::MinimizeEnd { hwnd } => write!(f, "minimize-end   {hwnd}"),
            Self::Reorder { hwnd } => write!(f, "reorder        {hwnd}"),
            Self::Other { code, hwnd } => write!(f, "event 0x{code:04X}  {hwnd}"),
            Self::Startup => f.write_str("startup"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hwnd_is_extracted_from_every_variant() {
        // Arrange
        let h = WindowHandle(0x42);
        let events = [
            WindowEvent::Foreground { hwnd: h },
            WindowEvent::MinimizeStart { hwnd: h },
            WindowEvent::MinimizeEnd { hwnd: h },
            WindowEvent::Reorder { hwnd: h },
            WindowEvent::Other { code: 0x8, hwnd: h },
        ];

        // Assert
        assert!(events.iter().all(|e| e.hwnd() == h));
        assert!(WindowEvent::Startup.hwnd().is_null());
    }

    #[test]
    fn display_names_the_event() {
        assert_eq!(
            WindowEvent::Foreground {
                hwnd: WindowHandle(0xAB)
            }
            .to_string(),
            "foreground     0xAB"
        );
        assert_eq!(
            WindowEvent::Other {
                code: 0x8,
                hwnd: WindowHandle(1)
            }
            .to_string(),
            "event 0x0008  0x1"
        );
    }
}
