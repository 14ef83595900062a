//! In-process realtime event bus.
//!
//! Stands in for the socket connection: publishers fan events out to every
//! subscriber, and slow subscribers lose old events rather than block.

use tokio::sync::broadcast;

use crate::domain::ports::EventBus;
use crate::domain::types::RealtimeEvent;

const CHANNEL_CAPACITY: usize = 64;

pub struct InProcessBus {
    tx: broadcast::Sender<RealtimeEvent>,
}

impl InProcessBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Deliver an event to all current subscribers. Events published with no
    /// subscriber are dropped.
    pub fn publish(&self, event: RealtimeEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for InProcessBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for InProcessBus {
    fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.tx.subscribe()
    }
}
