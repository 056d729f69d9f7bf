//! Port traits — the hexagonal boundary between the sensing core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ core (irq controller / tach driver)
//! ```
//!
//! Driven adapters (register blocks, pin configuration, the scheduler's
//! timer queue, event sinks) implement these traits.  The core consumes
//! them via generics at call sites, so it never touches hardware or the
//! scheduler directly and every sequencing rule is observable in host
//! tests with recording mocks.

use crate::irq::TriggerMode;
use crate::variant::LineSpec;

// ───────────────────────────────────────────────────────────────
// External-interrupt register block (driven adapter: core → hardware)
// ───────────────────────────────────────────────────────────────

/// Register-level operations on one external interrupt line.
///
/// Callers sequence these inside a critical section; implementations
/// perform single volatile register accesses and nothing else.  The
/// `LineSpec` carries the line number and the trigger-mode bit positions
/// fixed by the hardware variant.
pub trait IrqRegs {
    /// Mask the line's interrupt at the controller.
    fn mask_line(&self, line: &LineSpec);

    /// Clear both trigger-mode bits in the line's control register.
    fn clear_trigger(&self, line: &LineSpec);

    /// Program the trigger-mode bits for `trigger`.
    fn program_trigger(&self, line: &LineSpec, trigger: TriggerMode);

    /// Acknowledge (clear) a stale pending interrupt flag for the line.
    fn ack_pending(&self, line: &LineSpec);

    /// Unmask the line's interrupt.
    fn unmask_line(&self, line: &LineSpec);
}

// ───────────────────────────────────────────────────────────────
// Pin configuration (driven adapter: core → GPIO block)
// ───────────────────────────────────────────────────────────────

/// Digital-pin direction/pull configuration, owned by the generic GPIO
/// layer of the enclosing firmware.
pub trait PinSetup {
    /// Configure `pin` as an input, optionally with the internal pull-up.
    fn setup_input(&mut self, pin: u8, pull_up: bool);
}

// ───────────────────────────────────────────────────────────────
// Scheduler timer queue (driven adapter: core → scheduler)
// ───────────────────────────────────────────────────────────────

/// Registration surface for the shared report timer in the cooperative
/// scheduler's timer queue.  One timer per implementation: scheduling
/// replaces any previous registration.
pub trait TimerQueue {
    /// Arm the timer to expire at the absolute `waketime`.
    fn schedule(&mut self, waketime: u32);

    /// Remove the timer from the queue if it is armed.
    fn cancel(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: core → host link / logging)
// ───────────────────────────────────────────────────────────────

/// The drain task emits [`TachResponse`](super::events::TachResponse)s
/// through this port.  Adapters decide where they go (host link, serial
/// log, test vector).
pub trait EventSink {
    fn emit(&mut self, response: &super::events::TachResponse);
}
