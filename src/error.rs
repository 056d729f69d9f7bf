//! Unified error type for the sensing core.
//!
//! Every fallible operation in this crate funnels into [`Fatal`].  The name
//! is deliberate: there is no soft-error or retry path here.  Each variant
//! indicates a firmware/host protocol mismatch, and the enclosing firmware
//! reacts by reporting the message to the host and halting.  Conditions
//! that merely re-request the current state (same trigger mode, disable
//! while disabled) are handled as no-ops by the drivers, never as errors.
//!
//! All variants are `Copy` so they can be passed through the command
//! dispatch loop without allocation.

use core::fmt;

/// Unrecoverable configuration errors raised by the sensing core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatal {
    /// The requested pin has no external interrupt line on this hardware
    /// variant.
    UnsupportedPin,
    /// A trigger-mode value outside 0..=4 was requested.
    InvalidMode,
    /// A command referenced an oid that was never configured.
    UnknownOid,
    /// `config_tachometer` was issued twice for the same oid.
    OidInUse,
    /// All tachometer slots are allocated.
    TableFull,
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPin => write!(f, "pin is not interrupt-capable"),
            Self::InvalidMode => write!(f, "invalid interrupt pin mode"),
            Self::UnknownOid => write!(f, "unknown tachometer oid"),
            Self::OidInUse => write!(f, "tachometer oid already configured"),
            Self::TableFull => write!(f, "tachometer table full"),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Fatal>;
