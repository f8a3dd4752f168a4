//! Structured-logging sink boundary.
//!
//! # Responsibilities
//! - Define the [`Sink`] contract the logger core writes through
//! - Own the level taxonomy and its runtime-mutable enabled set
//! - Notify subscribers whenever the enabled set changes
//!
//! # Design Decisions
//! - Level names are plain strings; the taxonomy is sink-defined
//! - Enabled-set changes fan out through registered listeners, so the
//!   logger core can rebuild its callable set without polling

use std::sync::{Mutex, PoisonError, RwLock};

use crate::logger::Fields;

pub mod memory;
pub mod tracing;

pub use self::memory::{LogRecord, MemorySink};
pub use self::tracing::{init_logging, TracingSink};

/// Callback invoked whenever a sink's enabled level set changes.
pub type LevelListener = Box<dyn Fn() + Send + Sync>;

/// One entry of a sink's level taxonomy.
#[derive(Debug, Clone)]
pub struct LevelSpec {
    pub name: String,
    pub enabled: bool,
}

/// A destination for level-tagged messages with structured metadata.
pub trait Sink: Send + Sync {
    /// Deliver one message at the given level. Callers only pass levels that
    /// were enabled at lookup time; sinks may still drop them.
    fn log(&self, level: &str, message: &str, meta: &Fields);

    /// The full level taxonomy, active and inactive.
    fn levels(&self) -> Vec<LevelSpec>;

    /// Register a change listener. Listeners are never removed.
    fn subscribe(&self, listener: LevelListener);
}

/// Taxonomy + enabled set + listener list, shared by sink implementations.
pub struct LevelState {
    levels: RwLock<Vec<(String, bool)>>,
    listeners: Mutex<Vec<LevelListener>>,
}

impl LevelState {
    pub fn new<I, S>(taxonomy: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            levels: RwLock::new(
                taxonomy
                    .into_iter()
                    .map(|(name, enabled)| (name.into(), enabled))
                    .collect(),
            ),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn specs(&self) -> Vec<LevelSpec> {
        self.levels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, enabled)| LevelSpec {
                name: name.clone(),
                enabled: *enabled,
            })
            .collect()
    }

    pub fn enabled(&self, name: &str) -> bool {
        self.levels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(n, enabled)| n == name && *enabled)
    }

    /// Flip one level. Unknown names are ignored; listeners fire only when
    /// the set actually changed.
    pub fn set_enabled(&self, name: &str, enabled: bool) {
        let changed = {
            let mut levels = self
                .levels
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match levels.iter_mut().find(|(n, _)| n == name) {
                Some((_, current)) if *current != enabled => {
                    *current = enabled;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Enable exactly the named levels, disabling the rest of the taxonomy.
    pub fn enable_only(&self, names: &[&str]) {
        {
            let mut levels = self
                .levels
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for (name, enabled) in levels.iter_mut() {
                *enabled = names.contains(&name.as_str());
            }
        }
        self.notify();
    }

    pub fn subscribe(&self, listener: LevelListener) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    fn notify(&self) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener();
        }
    }
}
