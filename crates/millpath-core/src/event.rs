//! Program ledger change notification
//!
//! Provides:
//! - Event types describing changes to the program ledger
//! - Event dispatcher for publishing events to external views
//!
//! The dispatcher uses a broadcast channel, so publishing is synchronous and
//! never waits on a subscriber.

use tokio::sync::broadcast;

/// Program ledger event types
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramEvent {
    /// The ledger was cleared at the start of a pass
    Cleared,
    /// A batch of lines was appended
    LinesAppended {
        /// Index of the first appended line.
        start: usize,
        /// Number of appended lines.
        count: usize,
    },
    /// A generation pass ended
    PassFinished {
        /// Number of lines in the ledger when the pass ended.
        lines: usize,
        /// Whether every shape was processed.
        succeeded: bool,
    },
}

impl std::fmt::Display for ProgramEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramEvent::Cleared => write!(f, "Program cleared"),
            ProgramEvent::LinesAppended { start, count } => {
                write!(f, "Appended {} lines at {}", count, start)
            }
            ProgramEvent::PassFinished { lines, succeeded } => {
                if *succeeded {
                    write!(f, "Pass finished with {} lines", lines)
                } else {
                    write!(f, "Pass aborted with {} lines", lines)
                }
            }
        }
    }
}

/// Event dispatcher for publishing ledger events to subscribers
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    /// Broadcast sender channel for program events.
    tx: broadcast::Sender<ProgramEvent>,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    ///
    /// # Arguments
    /// * `buffer_size` - Number of events a slow subscriber may fall behind
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self { tx }
    }

    /// Create a new event dispatcher with default buffer size
    pub fn default_with_buffer() -> Self {
        Self::new(256)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ProgramEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it; having none is not
    /// an error for the ledger.
    pub fn publish(&self, event: ProgramEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::default_with_buffer()
    }
}
