//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each tachometer report to the
//! logger (UART / debug console in production).  Useful during bring-up
//! and as the fallback sink when the host link is down.

use log::info;

use crate::app::events::TachResponse;
use crate::app::ports::EventSink;

/// Adapter that logs every report to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, response: &TachResponse) {
        info!(
            "TACH | oid={} pulse_count={}",
            response.oid, response.pulse_count
        );
    }
}
