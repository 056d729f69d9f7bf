//! Inbound host commands.
//!
//! These are the decoded forms of the wire commands; framing, parsing and
//! the dispatch table live in the host-link layer of the enclosing
//! firmware.  The [`TachService`](super::service::TachService) interprets
//! and acts on them.

/// Commands the host can send into the sensing core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `config_tachometer oid=%c pin=%u` — allocate a tachometer instance
    /// counting pulses on `pin`.
    ConfigTachometer { oid: u8, pin: u8 },

    /// `update_tach_timer clock=%u rest_ticks=%u` — reschedule the shared
    /// report timer; `rest_ticks == 0` stops reporting.
    UpdateTachTimer { clock: u32, rest_ticks: u32 },

    /// `set_tach_irq_state oid=%c mode=%c` — change an instance's trigger
    /// mode (0–3) or disable it (4).
    SetTachIrqState { oid: u8, mode: u8 },
}
