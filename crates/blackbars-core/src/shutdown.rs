use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide "termination has begun" flag.
///
/// Cloning shares the same flag. It starts cleared and, once set, stays
/// set: after that point nothing may touch the desktop except the
/// cleanup sequence itself.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    inner: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Returns `true` only for the call that set it.
    pub fn trigger(&self) -> bool {
        !self.inner.swap(true, Ordering::SeqCst)
    }

    pub fn is_set(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}
