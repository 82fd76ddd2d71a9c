//! Program ledger
//!
//! The ordered list of program lines a generation pass rebuilds. Views learn
//! about changes through [`ProgramEvent`]s published on the ledger's
//! dispatcher.

mod field;

pub use field::{format_number, round_value, Field, ProgramLine, OUTPUT_PRECISION};

use crate::event::{EventDispatcher, ProgramEvent};
use tokio::sync::broadcast;

/// Ordered program lines plus optional prologue and epilogue fragments.
#[derive(Debug, Clone, Default)]
pub struct Program {
    lines: Vec<ProgramLine>,
    prologue: Option<String>,
    epilogue: Option<String>,
    events: EventDispatcher,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger that publishes on an existing dispatcher.
    pub fn with_dispatcher(events: EventDispatcher) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Removes every line and both fragments.
    pub fn clear(&mut self) {
        tracing::trace!("Clearing program of {} lines", self.lines.len());
        self.lines.clear();
        self.prologue = None;
        self.epilogue = None;
        self.events.publish(ProgramEvent::Cleared);
    }

    /// Appends a batch of lines in order. An empty batch is a no-op.
    pub fn append(&mut self, lines: Vec<ProgramLine>) {
        if lines.is_empty() {
            return;
        }
        let start = self.lines.len();
        let count = lines.len();
        self.lines.extend(lines);
        tracing::trace!(start, count, "Appended program lines");
        self.events
            .publish(ProgramEvent::LinesAppended { start, count });
    }

    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn set_prologue(&mut self, text: Option<String>) {
        self.prologue = text;
    }

    pub fn set_epilogue(&mut self, text: Option<String>) {
        self.epilogue = text;
    }

    pub fn prologue(&self) -> Option<&str> {
        self.prologue.as_deref()
    }

    pub fn epilogue(&self) -> Option<&str> {
        self.epilogue.as_deref()
    }

    /// Announces the end of a generation pass.
    pub fn finish_pass(&self, succeeded: bool) {
        self.events.publish(ProgramEvent::PassFinished {
            lines: self.lines.len(),
            succeeded,
        });
    }

    /// Subscribe to ledger change events
    pub fn subscribe(&self) -> broadcast::Receiver<ProgramEvent> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Renders the program as text: prologue, one line per program line, then
    /// epilogue. Fragments are copied verbatim.
    pub fn to_gcode(&self) -> String {
        let mut out = String::new();
        if let Some(prologue) = &self.prologue {
            out.push_str(prologue);
            if !prologue.is_empty() && !prologue.ends_with('\n') {
                out.push('\n');
            }
        }
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        if let Some(epilogue) = &self.epilogue {
            out.push_str(epilogue);
        }
        out
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_gcode())
    }
}
