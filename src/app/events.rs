//! Outbound host events.
//!
//! The drain task emits these through the [`EventSink`](super::ports::
//! EventSink) port, one per enabled tachometer per drain cycle.  Adapters
//! on the other side decide where they go — the host link in production,
//! a log line or a test vector elsewhere.

/// `tach_response oid=%c pulse_count=%u` — pulses accumulated since the
/// previous drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TachResponse {
    pub oid: u8,
    pub pulse_count: u32,
}
