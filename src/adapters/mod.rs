//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements | Connects to                        |
//! |--------------|------------|------------------------------------|
//! | `log_sink`   | EventSink  | Serial log output                  |
//! | `queue_sink` | EventSink  | Bounded queue drained by host link |
//! | `avr`        | IrqRegs    | EIMSK/EICRA/EICRB/EIFR registers   |
//! |              | PinSetup   | DDRx/PORTx registers               |
//!
//! The `avr` module is compiled only for the real target; everything else
//! runs on the host as well.

pub mod log_sink;
pub mod queue_sink;

#[cfg(target_arch = "avr")]
pub mod avr;
