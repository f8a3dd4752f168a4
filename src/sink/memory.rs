//! In-memory capture sink for tests and embedded assertions.

use std::sync::{Mutex, PoisonError};

use crate::logger::Fields;
use crate::sink::{LevelListener, LevelSpec, LevelState, Sink};

/// One captured log line.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: String,
    pub message: String,
    pub meta: Fields,
}

/// Sink that records every delivered line instead of emitting it.
///
/// Carries the same runtime-mutable level machinery as the production sink,
/// so level-change propagation can be exercised in tests.
pub struct MemorySink {
    state: LevelState,
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    /// All five standard levels, enabled.
    pub fn new() -> Self {
        Self::with_levels(
            ["trace", "debug", "info", "warn", "error"]
                .into_iter()
                .map(|name| (name, true)),
        )
    }

    pub fn with_levels<I, S>(taxonomy: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            state: LevelState::new(taxonomy),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) {
        self.state.set_enabled(name, enabled);
    }

    pub fn enable_only(&self, names: &[&str]) {
        self.state.enable_only(names);
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn log(&self, level: &str, message: &str, meta: &Fields) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogRecord {
                level: level.to_string(),
                message: message.to_string(),
                meta: meta.clone(),
            });
    }

    fn levels(&self) -> Vec<LevelSpec> {
        self.state.specs()
    }

    fn subscribe(&self, listener: LevelListener) {
        self.state.subscribe(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_records_in_order() {
        let sink = MemorySink::new();
        sink.log("info", "first", &Fields::new());
        sink.log("error", "second", &Fields::new());

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, "info");
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].level, "error");
    }

    #[test]
    fn custom_taxonomy() {
        let sink = MemorySink::with_levels([("audit", true), ("debug", false)]);
        let levels = sink.levels();
        assert_eq!(levels.len(), 2);
        assert!(levels.iter().any(|l| l.name == "audit" && l.enabled));
        assert!(levels.iter().any(|l| l.name == "debug" && !l.enabled));
    }
}
