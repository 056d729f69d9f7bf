//! TachSense firmware sensing core.
//!
//! Interrupt-driven fan-tachometer support for AVR-class controllers:
//! a fixed registry of external-pin interrupt lines, and a tachometer
//! driver that counts pulses in ISR context and reports them to the host
//! on a fixed-rate schedule.
//!
//! Pure-logic modules are exposed for integration testing and external
//! inspection; all AVR-specific code is confined to
//! `adapters::avr` behind `#[cfg(target_arch = "avr")]`.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]
#![deny(unused_must_use)]

pub mod app;
pub mod error;
pub mod events;
pub mod irq;
pub mod pins;
pub mod tach;
pub mod variant;

pub mod adapters;

pub use error::{Fatal, Result};
