//! External-pin-interrupt management.
//!
//! A fixed registry of the hardware's external interrupt lines.  Each line
//! record pairs the hardware constants (line number, trigger-mode bit
//! positions) with the currently registered owner and pulse handler.  The
//! handler defaults to a no-op, so a line's ISR is always safe to fire even
//! before anything is registered on it.
//!
//! ```text
//!  hardware edge ──▶ ISR trampoline ──▶ dispatch(line) ──▶ handler.on_pulse(owner)
//! ```
//!
//! Register writes are not performed here directly: they cross the
//! [`IrqRegs`] port so the mask/clear/program/ack/unmask sequencing is
//! observable in host tests and implemented as raw register access on
//! target.

use core::cell::Cell;

use critical_section::Mutex;
use log::info;

use crate::app::ports::IrqRegs;
use crate::error::{Fatal, Result};
use crate::pins;
use crate::variant::{self, LINE_COUNT, LineSpec};

/// Opaque identifier correlating an interrupt line with the driver
/// instance configured to use it.  0 means unowned.
pub type Oid = u8;

/// Wire value that disables a line instead of selecting a trigger.
pub const MODE_DISABLE: u8 = 4;

/// Electrical condition that makes a line fire.
///
/// Discriminants match the host wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TriggerMode {
    LevelLow = 0,
    AnyChange = 1,
    FallingEdge = 2,
    RisingEdge = 3,
}

impl TriggerMode {
    /// Decode a host mode byte.  `Ok(None)` is the disable request;
    /// anything above [`MODE_DISABLE`] is fatal.
    pub fn from_wire(mode: u8) -> Result<Option<Self>> {
        match mode {
            0 => Ok(Some(Self::LevelLow)),
            1 => Ok(Some(Self::AnyChange)),
            2 => Ok(Some(Self::FallingEdge)),
            3 => Ok(Some(Self::RisingEdge)),
            MODE_DISABLE => Ok(None),
            _ => Err(Fatal::InvalidMode),
        }
    }
}

/// Capability invoked from interrupt context on every pulse.
///
/// Implementations must not block, allocate, or perform unbounded work,
/// and must tolerate running with interrupts otherwise disabled.
pub trait PulseHandler: Sync {
    fn on_pulse(&self, owner: Oid);
}

/// Placeholder handler installed on unowned lines.
struct NoopPulse;

impl PulseHandler for NoopPulse {
    fn on_pulse(&self, _owner: Oid) {}
}

static NOOP_PULSE: NoopPulse = NoopPulse;

/// Stable reference to a registered interrupt line, handed back by
/// [`IrqController::register`] for later trigger-mode changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHandle(u8);

impl LineHandle {
    fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw index form, for storage in atomic driver state.
    pub(crate) fn raw(self) -> u8 {
        self.0
    }

    pub(crate) fn from_raw(raw: u8) -> Self {
        Self(raw)
    }
}

/// One external interrupt line.
struct IrqLine {
    spec: LineSpec,
    /// Owner id and handler are always replaced together inside a critical
    /// section, so the ISR never observes the pair half-updated.
    target: Mutex<Cell<(Oid, &'static dyn PulseHandler)>>,
}

impl IrqLine {
    fn new(spec: LineSpec) -> Self {
        Self {
            spec,
            target: Mutex::new(Cell::new((0, &NOOP_PULSE))),
        }
    }
}

/// Registry and trigger-mode controller for the variant's external
/// interrupt lines.
pub struct IrqController<B> {
    regs: B,
    lines: [IrqLine; LINE_COUNT],
}

impl<B: IrqRegs> IrqController<B> {
    pub fn new(regs: B) -> Self {
        info!(
            "irq: {} external interrupt lines ({})",
            LINE_COUNT,
            variant::VARIANT
        );
        Self {
            regs,
            lines: variant::LINES.map(IrqLine::new),
        }
    }

    /// Claim the interrupt line wired to `pin` and install `handler` for
    /// `owner`.  Registering over an owned line transfers ownership: the
    /// previous handler will never fire again.
    ///
    /// A pin with no interrupt line on this hardware variant is a fatal
    /// configuration error.
    pub fn register(
        &self,
        pin: u8,
        owner: Oid,
        handler: &'static dyn PulseHandler,
    ) -> Result<LineHandle> {
        let index = variant::line_for_pin(pin).ok_or(Fatal::UnsupportedPin)?;
        let line = &self.lines[index];
        critical_section::with(|cs| line.target.borrow(cs).set((owner, handler)));
        info!(
            "irq: {} -> INT{} owner={}",
            pins::label(pin).as_str(),
            line.spec.line_id,
            owner
        );
        Ok(LineHandle(index as u8))
    }

    /// Reprogram the line's trigger mode from the host wire encoding
    /// (0 = level-low, 1 = any change, 2 = falling, 3 = rising,
    /// 4 = disable).  Values above 4 are fatal.
    pub fn set_trigger_mode(&self, handle: LineHandle, mode: u8) -> Result<()> {
        let trigger = TriggerMode::from_wire(mode)?;
        self.apply(&self.lines[handle.index()].spec, trigger);
        Ok(())
    }

    /// Disable the line and return it to the unowned/no-op state.
    pub fn unregister(&self, handle: LineHandle) {
        let line = &self.lines[handle.index()];
        self.apply(&line.spec, None);
        critical_section::with(|cs| line.target.borrow(cs).set((0, &NOOP_PULSE)));
    }

    /// ISR entry point: invoke the line's current handler with its owner.
    pub fn dispatch(&self, line_index: usize) {
        let (owner, handler) =
            critical_section::with(|cs| self.lines[line_index].target.borrow(cs).get());
        handler.on_pulse(owner);
    }

    #[cfg(test)]
    pub(crate) fn regs(&self) -> &B {
        &self.regs
    }

    /// The full mask → clear → program → ack → unmask sequence, inside one
    /// interrupt-masked section so the controller can neither observe a
    /// half-programmed trigger configuration nor service a pre-change
    /// pending flag right after re-enable.  A disable request stops after
    /// the clear and leaves the line masked.
    fn apply(&self, spec: &LineSpec, trigger: Option<TriggerMode>) {
        critical_section::with(|_cs| {
            self.regs.mask_line(spec);
            self.regs.clear_trigger(spec);
            let Some(trigger) = trigger else {
                return;
            };
            self.regs.program_trigger(spec, trigger);
            self.regs.ack_pending(spec);
            self.regs.unmask_line(spec);
        });
    }
}
