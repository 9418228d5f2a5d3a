use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pause and cancel signals shared between the caller and the run loop.
///
/// The caller writes them; the run loop only reads them, except that it
/// consumes a cancel request when it acts on it. Clones share the signals.
#[derive(Debug, Clone)]
pub struct RunControl {
    inner: Arc<Signals>,
}

#[derive(Debug)]
struct Signals {
    cancel_requested: AtomicBool,
    run_allowed: AtomicBool,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Signals {
                cancel_requested: AtomicBool::new(false),
                run_allowed: AtomicBool::new(true),
            }),
        }
    }

    /// Latch a cancel request. Stays set until the run loop consumes it.
    pub fn request_cancel(&self) {
        self.inner.cancel_requested.store(true, Ordering::SeqCst);
    }

    pub fn set_paused(&self, paused: bool) {
        self.inner.run_allowed.store(!paused, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        !self.inner.run_allowed.load(Ordering::SeqCst)
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.inner.cancel_requested.load(Ordering::SeqCst)
    }

    /// Consume a pending cancel request, returning whether there was one.
    pub fn take_cancel(&self) -> bool {
        self.inner.cancel_requested.swap(false, Ordering::SeqCst)
    }

    /// Clear both signals for a fresh run: not cancelled, not paused.
    pub fn reset(&self) {
        self.inner.cancel_requested.store(false, Ordering::SeqCst);
        self.inner.run_allowed.store(true, Ordering::SeqCst);
    }
}
