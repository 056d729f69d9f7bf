//! Tachometer service — the hexagonal core.
//!
//! [`TachService`] owns the interrupt-line controller and a reference to
//! the process-lifetime tachometer bank, and maps each decoded host
//! command onto them.  Ports are injected at call sites, never owned, so
//! the whole service runs against mocks on the host.
//!
//! ```text
//!   Command ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!               │       TachService        │
//!   IrqRegs ◀───│  irq lines · tach bank   │──▶ TimerQueue / PinSetup
//!               └──────────────────────────┘
//! ```
//!
//! Every method takes `&self`: the controller and bank are interior-
//! mutable by construction, because the ISR entry points below may run at
//! any instant between two statements of task context.

use crate::error::Result;
use crate::irq::IrqController;
use crate::tach::TachBank;

use super::commands::Command;
use super::ports::{EventSink, IrqRegs, PinSetup, TimerQueue};

/// The sensing subsystem's orchestrator.
pub struct TachService<B> {
    irq: IrqController<B>,
    bank: &'static TachBank,
}

impl<B: IrqRegs> TachService<B> {
    /// Build the service on a register-block adapter and the bank
    /// singleton (a static in firmware).
    pub fn new(regs: B, bank: &'static TachBank) -> Self {
        Self {
            irq: IrqController::new(regs),
            bank,
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one decoded host command.
    ///
    /// An `Err` here is a firmware/host protocol mismatch — the dispatch
    /// loop reports it to the host and halts; it must not retry.
    pub fn handle_command(
        &self,
        command: Command,
        pin_setup: &mut impl PinSetup,
        timers: &mut impl TimerQueue,
    ) -> Result<()> {
        match command {
            Command::ConfigTachometer { oid, pin } => {
                self.bank.configure(oid, pin, &self.irq, pin_setup)
            }
            Command::UpdateTachTimer { clock, rest_ticks } => {
                self.bank.timer().update(clock, rest_ticks, timers);
                Ok(())
            }
            Command::SetTachIrqState { oid, mode } => {
                self.bank.set_mode(oid, mode, &self.irq)
            }
        }
    }

    // ── Cooperative task ──────────────────────────────────────

    /// Main-loop entry: run the drain task if the report timer has fired
    /// since the last poll.  Bounded, non-blocking.
    pub fn poll(&self, sink: &mut impl EventSink) {
        self.bank.drain(sink);
    }

    // ── Interrupt entry points ────────────────────────────────

    /// ISR trampoline target for external interrupt line `line_index`.
    pub fn pulse_isr(&self, line_index: usize) {
        self.irq.dispatch(line_index);
    }

    /// ISR trampoline target for the report-timer expiry.  Returns the
    /// next absolute wake time for the scheduler to re-arm at.
    pub fn timer_isr(&self) -> u32 {
        self.bank.timer_expired()
    }
}
