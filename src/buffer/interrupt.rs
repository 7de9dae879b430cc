//! # Interrupt Handle
//!
//! A way to poke a thread that is stuck waiting for a picture.
//!
//! ## Plain English
//!
//! A viewer waiting on an empty buffer may want to give up (window closing,
//! user pressed escape). It hands an [`Interrupt`] to the wait; another
//! thread raises it, the waiter wakes up, notices, and decides whether to
//! try again or give up.
//!
//! Each raise is consumed by exactly one wake-up, like a thread's interrupt
//! flag. Use one handle per waiting thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Something that can wake the threads blocked on it.
pub(crate) trait Wake: Send + Sync {
    fn wake(&self);
}

struct InterruptInner {
    /// Raised and not yet consumed
    raised: AtomicBool,

    /// Whatever the owning waiter is currently blocked on
    waker: Mutex<Option<Arc<dyn Wake>>>,
}

/// A cloneable interrupt flag for blocking buffer waits.
#[derive(Clone)]
pub struct Interrupt {
    inner: Arc<InterruptInner>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InterruptInner {
                raised: AtomicBool::new(false),
                waker: Mutex::new(None),
            }),
        }
    }

    /// Raises the interrupt and wakes the waiter, if one is blocked.
    pub fn interrupt(&self) {
        self.inner.raised.store(true, Ordering::SeqCst);

        // Clone out first: waking takes the buffer lock, never hold both.
        let waker = self.inner.waker.lock().clone();
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// True if raised and not yet consumed.
    pub fn is_interrupted(&self) -> bool {
        self.inner.raised.load(Ordering::SeqCst)
    }

    /// Clears the flag, returning whether it was raised.
    pub fn clear(&self) -> bool {
        self.inner.raised.swap(false, Ordering::SeqCst)
    }

    /// Remembers what to wake while a wait is in progress.
    pub(crate) fn register(&self, waker: Arc<dyn Wake>) {
        *self.inner.waker.lock() = Some(waker);
    }

    pub(crate) fn unregister(&self) {
        *self.inner.waker.lock() = None;
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interrupt")
            .field("raised", &self.is_interrupted())
            .finish()
    }
}

// ============================================
// TESTS
// ============================================
