//! Process-wide logger state: extender chain + callable level snapshot.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::logger::extender::Extender;
use crate::logger::request::{RequestInfo, RequestLogger};
use crate::logger::Fields;
use crate::sink::Sink;

/// Shared state behind every request logger.
///
/// Holds the ordered extender chain and a mirror of the sink's enabled
/// level set. The mirror is a copy-on-write snapshot replaced wholesale on
/// each sink change notification, so every extant logger observes level
/// changes on its next lookup without re-derivation.
pub struct LogRegistry {
    sink: Arc<dyn Sink>,
    extenders: RwLock<Vec<Extender>>,
    levels: ArcSwap<HashSet<String>>,
}

impl LogRegistry {
    /// Build a registry over the given sink.
    ///
    /// Synchronizes the level set immediately and subscribes one change
    /// listener for the registry's lifetime. The listener holds a weak
    /// back-reference, so sink and registry do not keep each other alive.
    pub fn new(sink: Arc<dyn Sink>) -> Arc<Self> {
        let registry = Arc::new(Self {
            sink,
            extenders: RwLock::new(Vec::new()),
            levels: ArcSwap::from_pointee(HashSet::new()),
        });
        registry.sync_levels();

        let weak = Arc::downgrade(&registry);
        registry.sink.subscribe(Box::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.sync_levels();
            }
        }));
        registry
    }

    /// Append a property-name extender (or a prebuilt [`Extender`]).
    ///
    /// Extenders accumulate for the process lifetime and are immediately
    /// visible to every logger already derived from this registry.
    pub fn add(&self, extender: impl Into<Extender>) {
        self.extenders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(extender.into());
    }

    /// Append a closure extender.
    pub fn add_fn<F>(&self, f: F)
    where
        F: Fn(&RequestInfo) -> Value + Send + Sync + 'static,
    {
        self.add(Extender::from_fn(f));
    }

    /// The root logger for one request: registry + request bound, no name.
    pub fn request_logger(self: &Arc<Self>, request: Arc<RequestInfo>) -> RequestLogger {
        RequestLogger::root(self.clone(), request)
    }

    /// Whether the level resolved as callable at the most recent sync.
    pub fn level_enabled(&self, name: &str) -> bool {
        self.levels.load().contains(name)
    }

    /// Fold the extender chain over `meta` for the given request,
    /// registration order, later entries winning on key collision.
    pub(crate) fn apply_extenders(&self, request: &RequestInfo, mut meta: Fields) -> Fields {
        let extenders = self
            .extenders
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for extender in extenders.iter() {
            if let Some(fields) = extender.apply(request) {
                for (key, value) in fields {
                    meta.insert(key, value);
                }
            }
        }
        meta
    }

    pub(crate) fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }

    fn sync_levels(&self) {
        let enabled: HashSet<String> = self
            .sink
            .levels()
            .into_iter()
            .filter(|spec| spec.enabled)
            .map(|spec| spec.name)
            .collect();
        self.levels.store(Arc::new(enabled));
    }
}
