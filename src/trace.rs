//! In-session diagnostic trace.
//!
//! Every notable event (file processed, question asked, retrieval outcome,
//! error recovered) is appended as a timestamped entry. The trace lives as
//! long as the session, is never trimmed, and can be dumped for inspection
//! after a run. Entries render as `[HH:MM:SS] message`.

use chrono::{DateTime, Utc};
use std::fmt;

/// One timestamped trace entry.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Append-only journal of session events.
#[derive(Debug, Default)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, stamped with the current UTC time.
    pub fn record(&mut self, message: impl Into<String>) {
        let entry = TraceEntry {
            at: Utc::now(),
            message: message.into(),
        };
        tracing::debug!(target: "docchat::trace", "{}", entry);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_kept_in_order() {
        let mut trace = Trace::new();
        trace.record("[INIT] ready");
        trace.record("[QUESTION] what is this");
        trace.record("[ANSWER] done");

        let messages: Vec<&str> = trace
            .entries()
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(
            messages,
            ["[INIT] ready", "[QUESTION] what is this", "[ANSWER] done"]
        );
    }

    #[test]
    fn test_display_prefixes_time_of_day() {
        let mut trace = Trace::new();
        trace.record("[PDF] sample.pdf: 120 chars");

        let rendered = trace.entries()[0].to_string();
        assert!(rendered.starts_with('['));
        // "[HH:MM:SS] " prefix is 11 chars.
        assert_eq!(&rendered[9..11], "] ");
        assert!(rendered.ends_with("[PDF] sample.pdf: 120 chars"));
    }

    #[test]
    fn test_new_trace_is_empty() {
        let trace = Trace::new();
        assert!(trace.is_empty());
        assert_eq!(trace.len(), 0);
    }
}
