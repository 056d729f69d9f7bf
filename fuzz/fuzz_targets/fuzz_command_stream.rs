//! Fuzz the host command surface: arbitrary command streams interleaved
//! with simulated edges and timer expiries must never panic — every
//! rejection is a typed fatal, never a crash.

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;

use tachsense::app::commands::Command;
use tachsense::app::ports::{EventSink, IrqRegs, PinSetup, TimerQueue};
use tachsense::app::service::TachService;
use tachsense::irq::TriggerMode;
use tachsense::tach::TachBank;
use tachsense::variant::{LINE_COUNT, LineSpec};

struct NullRegs;

impl IrqRegs for NullRegs {
    fn mask_line(&self, _: &LineSpec) {}
    fn clear_trigger(&self, _: &LineSpec) {}
    fn program_trigger(&self, _: &LineSpec, _: TriggerMode) {}
    fn ack_pending(&self, _: &LineSpec) {}
    fn unmask_line(&self, _: &LineSpec) {}
}

struct NullPins;

impl PinSetup for NullPins {
    fn setup_input(&mut self, _pin: u8, _pull_up: bool) {}
}

struct NullQueue;

impl TimerQueue for NullQueue {
    fn schedule(&mut self, _waketime: u32) {}
    fn cancel(&mut self) {}
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _response: &tachsense::app::events::TachResponse) {}
}

fn service() -> &'static TachService<NullRegs> {
    static BANK: TachBank = TachBank::new();
    static SERVICE: OnceLock<TachService<NullRegs>> = OnceLock::new();
    SERVICE.get_or_init(|| TachService::new(NullRegs, &BANK))
}

fuzz_target!(|data: &[u8]| {
    let service = service();
    for chunk in data.chunks_exact(4) {
        let &[op, a, b, c] = chunk else { continue };
        let result = match op % 6 {
            0 => service.handle_command(
                Command::ConfigTachometer { oid: a, pin: b },
                &mut NullPins,
                &mut NullQueue,
            ),
            1 => service.handle_command(
                Command::SetTachIrqState { oid: a, mode: b },
                &mut NullPins,
                &mut NullQueue,
            ),
            2 => service.handle_command(
                Command::UpdateTachTimer {
                    clock: u32::from_le_bytes([a, b, c, 0]),
                    rest_ticks: u32::from(c),
                },
                &mut NullPins,
                &mut NullQueue,
            ),
            3 => {
                service.pulse_isr(usize::from(a) % LINE_COUNT);
                Ok(())
            }
            4 => {
                let _ = service.timer_isr();
                Ok(())
            }
            _ => {
                service.poll(&mut NullSink);
                Ok(())
            }
        };
        // Fatals are expected outcomes for hostile input; panics are not.
        let _ = result;
    }
});
