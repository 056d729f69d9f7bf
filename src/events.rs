//! Interrupt-to-task wake signaling.
//!
//! The shared report timer expires in interrupt context; the drain task
//! runs cooperatively in the main loop.  [`TaskWake`] is the one-bit
//! channel between them:
//!
//! ```text
//! ┌─────────────┐   raise()    ┌────────────┐   take()    ┌────────────┐
//! │ Timer ISR   │─────────────▶│  TaskWake  │────────────▶│ Drain task │
//! └─────────────┘              └────────────┘             └────────────┘
//! ```
//!
//! Lock-free: a single atomic flag with release/acquire pairing, safe to
//! raise from any interrupt context.  Repeated raises before the task runs
//! coalesce into one wake, which is exactly right for a fixed-rate drain —
//! the counters accumulate regardless.

use portable_atomic::{AtomicBool, Ordering};

/// One-bit wake signal from interrupt context to a cooperative task.
pub struct TaskWake {
    raised: AtomicBool,
}

impl TaskWake {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Signal the task.  Safe to call from interrupt context.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consume the signal.  Returns `true` at most once per raise; the
    /// task returns immediately when this is `false`.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::Acquire)
    }
}
