use std::fmt;

/// An axis-aligned rectangle in virtual-screen coordinates.
///
/// Stored as edges rather than origin + size because that is how Win32
/// reports monitor bounds (`MONITORINFO::rcMonitor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` when the rectangle covers no pixels.
    ///
    /// A backdrop sized to an empty rect would be invisible, so callers
    /// treat it the same as a failed monitor lookup.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.left,
            self.top,
            self.width(),
            self.height()
        )
    }
}
