//! AVR register adapter — bridges the port traits to real hardware.
//!
//! This is the only module in the crate that touches actual registers.
//! It is compiled for the AVR target only; host builds and tests run
//! against the recording mocks instead.
//!
//! The `critical-section` implementation is expected from the enclosing
//! firmware (the PAC's single-core SREG save/`cli`/restore impl), as
//! usual for library crates.

use portable_atomic::{AtomicPtr, Ordering};

use crate::app::ports::{IrqRegs, PinSetup};
use crate::app::service::TachService;
use crate::irq::TriggerMode;
use crate::pins;
use crate::variant::LineSpec;

// External interrupt controller registers.  Identical data-space
// addresses across the supported atmega/at90usb variants.
const EICRA: *mut u8 = 0x69 as *mut u8;
#[cfg(any(feature = "atmega2560", feature = "atmega32u4"))]
const EICRB: *mut u8 = 0x6A as *mut u8;
const EIMSK: *mut u8 = 0x3D as *mut u8;
const EIFR: *mut u8 = 0x3C as *mut u8;

/// Control register holding the line's trigger-mode bit pair.
fn ctrl_reg(line: &LineSpec) -> *mut u8 {
    #[cfg(any(feature = "atmega2560", feature = "atmega32u4"))]
    if line.line_id >= 4 {
        return EICRB;
    }
    let _ = line;
    EICRA
}

unsafe fn reg_set(reg: *mut u8, bits: u8) {
    // SAFETY: caller passes a valid IO register; single volatile RMW,
    // sequenced inside the controller's critical section.
    unsafe { reg.write_volatile(reg.read_volatile() | bits) }
}

unsafe fn reg_clear(reg: *mut u8, bits: u8) {
    // SAFETY: as `reg_set`.
    unsafe { reg.write_volatile(reg.read_volatile() & !bits) }
}

/// The external-interrupt register block.
pub struct AvrExtInt;

impl IrqRegs for AvrExtInt {
    fn mask_line(&self, line: &LineSpec) {
        unsafe { reg_clear(EIMSK, 1 << line.line_id) }
    }

    fn clear_trigger(&self, line: &LineSpec) {
        unsafe { reg_clear(ctrl_reg(line), (1 << line.isc0) | (1 << line.isc1)) }
    }

    fn program_trigger(&self, line: &LineSpec, trigger: TriggerMode) {
        let bits = match trigger {
            // Level-low is the reset trigger encoding: both bits clear.
            TriggerMode::LevelLow => 0,
            TriggerMode::AnyChange => 1 << line.isc0,
            TriggerMode::FallingEdge => 1 << line.isc1,
            TriggerMode::RisingEdge => (1 << line.isc0) | (1 << line.isc1),
        };
        if bits != 0 {
            unsafe { reg_set(ctrl_reg(line), bits) }
        }
    }

    fn ack_pending(&self, line: &LineSpec) {
        // Write-one-to-clear; a plain store, not a read-modify-write,
        // so other lines' pending flags are left untouched.
        unsafe { EIFR.write_volatile(1 << line.line_id) }
    }

    fn unmask_line(&self, line: &LineSpec) {
        unsafe { reg_set(EIMSK, 1 << line.line_id) }
    }
}

/// DDR/PORT-level pin configuration for ports A–G.
pub struct AvrPins;

impl PinSetup for AvrPins {
    fn setup_input(&mut self, pin: u8, pull_up: bool) {
        let port = pins::port_letter(pin) as u8 - b'A';
        let bit = 1 << pins::port_index(pin);
        // PINx/DDRx/PORTx triplets start at 0x20 and stride by 3.
        let ddr = (0x21 + 3 * u16::from(port)) as *mut u8;
        let port_reg = (0x22 + 3 * u16::from(port)) as *mut u8;
        critical_section::with(|_cs| unsafe {
            reg_clear(ddr, bit);
            if pull_up {
                reg_set(port_reg, bit);
            } else {
                reg_clear(port_reg, bit);
            }
        });
    }
}

// ── ISR trampolines ───────────────────────────────────────────

/// Installed service, written once at boot before `sei()`.
///
/// SAFETY: `install()` is called from the single boot context before any
/// interrupt can fire; the vectors below only ever read the pointer.
static SERVICE: AtomicPtr<TachService<AvrExtInt>> = AtomicPtr::new(core::ptr::null_mut());

/// Point the interrupt vectors at `service`.  Must run before interrupts
/// are enabled.
pub fn install(service: &'static TachService<AvrExtInt>) {
    SERVICE.store(core::ptr::from_ref(service).cast_mut(), Ordering::Release);
}

fn isr_dispatch(line_index: usize) {
    let service = SERVICE.load(Ordering::Acquire);
    if !service.is_null() {
        // SAFETY: install() stored a 'static reference.
        unsafe { (*service).pulse_isr(line_index) }
    }
}

macro_rules! pulse_vector {
    ($vector:ident, $line_index:expr) => {
        #[unsafe(no_mangle)]
        pub unsafe extern "avr-interrupt" fn $vector() {
            isr_dispatch($line_index);
        }
    };
}

#[cfg(feature = "atmega2560")]
mod vectors {
    use super::isr_dispatch;

    pulse_vector!(__vector_1, 0);
    pulse_vector!(__vector_2, 1);
    pulse_vector!(__vector_3, 2);
    pulse_vector!(__vector_4, 3);
    pulse_vector!(__vector_5, 4);
    pulse_vector!(__vector_6, 5);
    pulse_vector!(__vector_7, 6);
    pulse_vector!(__vector_8, 7);
}

#[cfg(all(feature = "atmega32u4", not(feature = "atmega2560")))]
mod vectors {
    use super::isr_dispatch;

    pulse_vector!(__vector_1, 0);
    pulse_vector!(__vector_2, 1);
    pulse_vector!(__vector_3, 2);
    pulse_vector!(__vector_4, 3);
    // INT6 is the fifth (and last) line on this variant.
    pulse_vector!(__vector_7, 4);
}

#[cfg(all(
    feature = "atmega644p",
    not(any(feature = "atmega2560", feature = "atmega32u4"))
))]
mod vectors {
    use super::isr_dispatch;

    pulse_vector!(__vector_1, 0);
    pulse_vector!(__vector_2, 1);
    pulse_vector!(__vector_3, 2);
}

#[cfg(all(
    feature = "atmega328p",
    not(any(
        feature = "atmega2560",
        feature = "atmega32u4",
        feature = "atmega644p"
    ))
))]
mod vectors {
    use super::isr_dispatch;

    pulse_vector!(__vector_1, 0);
    pulse_vector!(__vector_2, 1);
}
