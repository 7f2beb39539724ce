//! Consumers of enriched events.
//!
//! Serialization and transport belong to the host; these consumers only
//! hand the [`LogEvent`] on.

use crate::event::LogEvent;
use parking_lot::Mutex;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Receives every enriched event.
pub trait EventConsumer: Send + Sync + 'static {
    fn consume(&self, event: LogEvent);
}

/// Keeps events in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsumer {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl MemoryConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    /// Remove and return all collected events.
    pub fn drain(&self) -> Vec<LogEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventConsumer for MemoryConsumer {
    fn consume(&self, event: LogEvent) {
        self.events.lock().push(event);
    }
}

/// Forwards events over an in-process channel.
#[derive(Debug, Clone)]
pub struct ChannelConsumer {
    sender: Sender<LogEvent>,
}

impl ChannelConsumer {
    pub fn new_pair() -> (Self, Receiver<LogEvent>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }
}

impl EventConsumer for ChannelConsumer {
    fn consume(&self, event: LogEvent) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.sender.send(event);
    }
}
