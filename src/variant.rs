//! Hardware-variant tables for the external interrupt controller.
//!
//! Each AVR variant wires a small fixed set of pins to dedicated external
//! interrupt lines (`INTn`).  The tables below are selected at build time
//! by cargo feature and resolved to constants, so the ISR dispatch path
//! carries no runtime variant branching.
//!
//! The feature checks form a precedence chain: enabling several variant
//! features selects the widest one instead of failing, which keeps
//! `--all-features` builds meaningful.

use crate::pins::gpio;

/// Static description of one external interrupt line.
///
/// `isc0`/`isc1` are the bit positions of the line's trigger-mode pair
/// within its control register (`EICRA` for lines 0–3, `EICRB` above).
/// They are fixed hardware properties, never written after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    /// Hardware interrupt line number (`INTn`).
    pub line_id: u8,
    /// Bit position of the low trigger-mode bit.
    pub isc0: u8,
    /// Bit position of the high trigger-mode bit.
    pub isc1: u8,
}

const fn line(n: u8) -> LineSpec {
    LineSpec {
        line_id: n,
        isc0: (n % 4) * 2,
        isc1: (n % 4) * 2 + 1,
    }
}

#[cfg(feature = "atmega2560")]
mod table {
    use super::{LineSpec, gpio, line};

    pub const VARIANT: &str = "atmega2560";
    pub const LINE_COUNT: usize = 8;
    pub const LINES: [LineSpec; LINE_COUNT] = [
        line(0),
        line(1),
        line(2),
        line(3),
        line(4),
        line(5),
        line(6),
        line(7),
    ];
    /// Interrupt-capable pins, in line order.
    pub const SUPPORTED_PINS: [u8; LINE_COUNT] = [
        gpio(b'D', 0),
        gpio(b'D', 1),
        gpio(b'D', 2),
        gpio(b'D', 3),
        gpio(b'E', 4),
        gpio(b'E', 5),
        gpio(b'E', 6),
        gpio(b'E', 7),
    ];
}

#[cfg(all(feature = "atmega32u4", not(feature = "atmega2560")))]
mod table {
    use super::{LineSpec, gpio, line};

    pub const VARIANT: &str = "atmega32u4";
    pub const LINE_COUNT: usize = 5;
    pub const LINES: [LineSpec; LINE_COUNT] =
        [line(0), line(1), line(2), line(3), line(6)];
    pub const SUPPORTED_PINS: [u8; LINE_COUNT] = [
        gpio(b'D', 0),
        gpio(b'D', 1),
        gpio(b'D', 2),
        gpio(b'D', 3),
        gpio(b'E', 6),
    ];
}

#[cfg(all(
    feature = "atmega644p",
    not(any(feature = "atmega2560", feature = "atmega32u4"))
))]
mod table {
    use super::{LineSpec, gpio, line};

    pub const VARIANT: &str = "atmega644p";
    pub const LINE_COUNT: usize = 3;
    pub const LINES: [LineSpec; LINE_COUNT] = [line(0), line(1), line(2)];
    pub const SUPPORTED_PINS: [u8; LINE_COUNT] =
        [gpio(b'D', 2), gpio(b'D', 3), gpio(b'B', 2)];
}

#[cfg(all(
    feature = "atmega328p",
    not(any(
        feature = "atmega2560",
        feature = "atmega32u4",
        feature = "atmega644p"
    ))
))]
mod table {
    use super::{LineSpec, gpio, line};

    pub const VARIANT: &str = "atmega328p";
    pub const LINE_COUNT: usize = 2;
    pub const LINES: [LineSpec; LINE_COUNT] = [line(0), line(1)];
    pub const SUPPORTED_PINS: [u8; LINE_COUNT] = [gpio(b'D', 2), gpio(b'D', 3)];
}

#[cfg(not(any(
    feature = "atmega2560",
    feature = "atmega32u4",
    feature = "atmega644p",
    feature = "atmega328p"
)))]
compile_error!(
    "no hardware variant selected: enable one of the atmega*/at90usb* features"
);

pub use table::{LINE_COUNT, LINES, SUPPORTED_PINS, VARIANT};

/// Resolve a pin id to its interrupt line index, or `None` when the pin is
/// not wired to an external interrupt line on this variant.
pub fn line_for_pin(pin: u8) -> Option<usize> {
    SUPPORTED_PINS.iter().position(|&p| p == pin)
}
