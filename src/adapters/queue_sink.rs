//! Bounded-queue event sink adapter.
//!
//! Buffers drain reports in a fixed-capacity queue for the host-link
//! layer to encode and transmit.  Both the drain task and the host link
//! run in the cooperative main loop, so no interrupt-safety is needed
//! here — plain FIFO semantics, no heap.
//!
//! Capacity is two full drain cycles of the largest slot table; if the
//! host link stalls longer than that, the oldest reports are dropped and
//! counted rather than blocking the drain.

use log::warn;

use crate::app::events::TachResponse;
use crate::app::ports::EventSink;
use crate::tach::MAX_TACHOMETERS;

const QUEUE_CAP: usize = MAX_TACHOMETERS * 2;

/// Adapter that queues reports until the host link drains them.
pub struct QueueSink {
    queue: heapless::Deque<TachResponse, QUEUE_CAP>,
    dropped: u32,
}

impl QueueSink {
    pub fn new() -> Self {
        Self {
            queue: heapless::Deque::new(),
            dropped: 0,
        }
    }

    /// Next report for the host link, oldest first.
    pub fn pop(&mut self) -> Option<TachResponse> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Reports discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl EventSink for QueueSink {
    fn emit(&mut self, response: &TachResponse) {
        if self.queue.push_back(*response).is_err() {
            // Oldest-first drop keeps the freshest counts flowing.
            let _ = self.queue.pop_front();
            let _ = self.queue.push_back(*response);
            self.dropped = self.dropped.wrapping_add(1);
            warn!("tach: report queue full, dropped oldest (total {})", self.dropped);
        }
    }
}
