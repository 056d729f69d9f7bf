//! Fan tachometer driver.
//!
//! One slot per configured sensor.  The interrupt-line controller delivers
//! pulses into a slot's counter from ISR context; a single shared timer
//! wakes the cooperative drain task at a fixed rate, and the task
//! read-and-resets every enabled counter and emits one report per sensor.
//!
//! All slot fields are atomics, so the bank is shared between ISR and task
//! context without locks — the same pattern as a hall-effect pulse counter
//! sampled with `swap(0)`.  The bank is a process-lifetime singleton:
//! slots are allocated once per oid at configuration time and never
//! destroyed.

use log::info;
use portable_atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::app::events::TachResponse;
use crate::app::ports::{EventSink, IrqRegs, PinSetup, TimerQueue};
use crate::error::{Fatal, Result};
use crate::events::TaskWake;
use crate::irq::{IrqController, LineHandle, MODE_DISABLE, Oid, PulseHandler, TriggerMode};
use crate::pins;

/// Capacity of the slot table.  Sized for the largest supported variant,
/// which has eight interrupt-capable pins.
pub const MAX_TACHOMETERS: usize = 8;

// Flags byte: bit 4 = enabled, bits 0..=3 = one-hot active trigger mode.
// Enabled and active mode are always written together, so "enabled with no
// mode" is unrepresentable.
const FLAG_EN: u8 = 1 << 4;

/// One tachometer instance.
struct TachSlot {
    /// Set (release) last during configuration; the ISR lookup loads it
    /// (acquire) first, so a slot is never observed half-built.
    configured: AtomicBool,
    oid: AtomicU8,
    line: AtomicU8,
    flags: AtomicU8,
    /// Incremented only from ISR context; read-and-reset only by the
    /// drain task.
    pulse_count: AtomicU32,
}

impl TachSlot {
    const fn new() -> Self {
        Self {
            configured: AtomicBool::new(false),
            oid: AtomicU8::new(0),
            line: AtomicU8::new(0),
            flags: AtomicU8::new(0),
            pulse_count: AtomicU32::new(0),
        }
    }

    fn enabled(&self) -> bool {
        self.flags.load(Ordering::Relaxed) & FLAG_EN != 0
    }
}

/// The tachometer subsystem singleton: slot table, shared report timer,
/// and the drain task's wake signal.
pub struct TachBank {
    slots: [TachSlot; MAX_TACHOMETERS],
    timer: TachTimer,
    wake: TaskWake,
}

impl TachBank {
    pub const fn new() -> Self {
        Self {
            slots: [const { TachSlot::new() }; MAX_TACHOMETERS],
            timer: TachTimer::new(),
            wake: TaskWake::new(),
        }
    }

    fn find(&self, oid: Oid) -> Option<&TachSlot> {
        self.slots
            .iter()
            .find(|s| s.configured.load(Ordering::Acquire) && s.oid.load(Ordering::Relaxed) == oid)
    }

    /// Allocate a slot for `oid` on `pin`: input with no pull-up, pulse
    /// handler registered with the interrupt-line controller, reporting
    /// disabled until the host sends a mode.
    ///
    /// The bank must outlive the controller's registration, hence the
    /// `'static` receiver — in firmware the bank lives in a static, and
    /// the ISR may fire at any time after this returns.
    pub fn configure<B: IrqRegs>(
        &'static self,
        oid: Oid,
        pin: u8,
        irq: &IrqController<B>,
        pin_setup: &mut impl PinSetup,
    ) -> Result<()> {
        if self.find(oid).is_some() {
            return Err(Fatal::OidInUse);
        }
        let slot = self
            .slots
            .iter()
            .find(|s| !s.configured.load(Ordering::Relaxed))
            .ok_or(Fatal::TableFull)?;

        // To be safe, the sensor pin is a plain input with no internal
        // pull-up before the interrupt line is armed.
        pin_setup.setup_input(pin, false);
        let handle = irq.register(pin, oid, self)?;

        slot.oid.store(oid, Ordering::Relaxed);
        slot.line.store(handle.raw(), Ordering::Relaxed);
        slot.flags.store(0, Ordering::Relaxed);
        slot.pulse_count.store(0, Ordering::Relaxed);
        slot.configured.store(true, Ordering::Release);
        info!("tach: oid={} on {}", oid, pins::label(pin).as_str());
        Ok(())
    }

    /// Apply a host trigger-mode request (0–3 = arm with that trigger,
    /// 4 = disable).  Requests that match the current state perform no
    /// hardware write at all; there is no re-apply path.
    pub fn set_mode<B: IrqRegs>(
        &self,
        oid: Oid,
        mode: u8,
        irq: &IrqController<B>,
    ) -> Result<()> {
        let slot = self.find(oid).ok_or(Fatal::UnknownOid)?;
        let trigger = TriggerMode::from_wire(mode)?;
        let handle = LineHandle::from_raw(slot.line.load(Ordering::Relaxed));
        let flags = slot.flags.load(Ordering::Relaxed);

        match trigger {
            None => {
                if flags & FLAG_EN != 0 {
                    slot.flags.store(0, Ordering::Relaxed);
                    irq.set_trigger_mode(handle, MODE_DISABLE)?;
                    info!("tach: oid={} disabled", oid);
                }
            }
            Some(trigger) => {
                let mode_bit = 1 << (trigger as u8);
                if flags & mode_bit == 0 {
                    slot.flags.store(FLAG_EN | mode_bit, Ordering::Relaxed);
                    irq.set_trigger_mode(handle, mode)?;
                    info!("tach: oid={} armed, trigger={:?}", oid, trigger);
                }
            }
        }
        Ok(())
    }

    /// Drain task body.  Runs only when the report timer raised the wake
    /// signal; emits one response per enabled slot with the pulses
    /// accumulated since the previous drain.
    pub fn drain(&self, sink: &mut impl EventSink) {
        if !self.wake.take() {
            return;
        }
        for slot in &self.slots {
            if !slot.configured.load(Ordering::Acquire) || !slot.enabled() {
                // Disabled slots are not reported; their lines are masked,
                // so their counters cannot advance either.
                continue;
            }
            // Single atomic read-and-reset: edges landing mid-drain count
            // toward the next report instead of being lost.
            let pulse_count = slot.pulse_count.swap(0, Ordering::Relaxed);
            sink.emit(&TachResponse {
                oid: slot.oid.load(Ordering::Relaxed),
                pulse_count,
            });
        }
    }

    /// Timer-expiry entry point (interrupt context): wake the drain task
    /// and hand the collaborator the next absolute wake time.
    pub fn timer_expired(&self) -> u32 {
        self.timer.expire(&self.wake)
    }

    pub fn timer(&self) -> &TachTimer {
        &self.timer
    }

    pub fn wake(&self) -> &TaskWake {
        &self.wake
    }
}

impl PulseHandler for TachBank {
    fn on_pulse(&self, owner: Oid) {
        // A dispatch for an owner this bank no longer knows (stale line
        // after re-registration) simply misses; the ISR path never fails.
        if let Some(slot) = self.find(owner) {
            slot.pulse_count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// The shared report timer: one per process, owned by the bank.
///
/// The wake time advances by exactly `rest_ticks` from the previous
/// scheduled time, never from "now", so the reporting rate accumulates no
/// drift regardless of how late the drain task actually runs.
pub struct TachTimer {
    waketime: AtomicU32,
    rest_ticks: AtomicU32,
}

impl TachTimer {
    const fn new() -> Self {
        Self {
            waketime: AtomicU32::new(0),
            rest_ticks: AtomicU32::new(0),
        }
    }

    /// Replace any scheduled wake.  `rest_ticks == 0` leaves the timer
    /// inactive: no drains until reconfigured with a nonzero interval.
    pub fn update(&self, clock: u32, rest_ticks: u32, queue: &mut impl TimerQueue) {
        queue.cancel();
        self.waketime.store(clock, Ordering::Relaxed);
        self.rest_ticks.store(rest_ticks, Ordering::Relaxed);
        if rest_ticks != 0 {
            queue.schedule(clock);
        }
        info!("tach: timer clock={} rest_ticks={}", clock, rest_ticks);
    }

    /// Expiry callback (interrupt context).  Raises the wake signal and
    /// returns the next absolute wake time for the collaborator to
    /// reschedule at.
    pub fn expire(&self, wake: &TaskWake) -> u32 {
        wake.raise();
        let next = self
            .waketime
            .load(Ordering::Relaxed)
            .wrapping_add(self.rest_ticks.load(Ordering::Relaxed));
        self.waketime.store(next, Ordering::Relaxed);
        next
    }
}
