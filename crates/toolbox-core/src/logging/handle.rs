//! Logger handles

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use super::config::LoggerConfig;
use super::format::LogRecord;
use super::level::LogLevel;
use super::sink::BoxedSink;
use super::traits::Logger;

/// Name-keyed map of registered loggers, shared by a registry and its handles
pub(crate) type LoggerMap = RwLock<HashMap<String, LoggerHandle>>;

/// A configured logger owning its sinks
///
/// Handles are cheap to clone; clones share the same logger. Two handles
/// compare equal only when they point at the same instance.
#[derive(Clone)]
pub struct LoggerHandle {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    name: String,
    level: LogLevel,
    propagate: bool,
    // Weak so the map's handles don't keep the map alive
    registry: Option<Weak<LoggerMap>>,
    config: LoggerConfig,
    sinks: Mutex<Vec<BoxedSink>>,
}

impl LoggerHandle {
    /// Create a standalone logger with no sinks
    ///
    /// A standalone logger has no ancestors, so `propagate` has no effect.
    pub fn new(name: impl Into<String>, config: LoggerConfig) -> Self {
        Self::with_registry(name, config, None)
    }

    /// Create a logger whose ancestors are looked up in `registry`
    pub(crate) fn attached(name: impl Into<String>, config: LoggerConfig, registry: Weak<LoggerMap>) -> Self {
        Self::with_registry(name, config, Some(registry))
    }

    fn with_registry(name: impl Into<String>, config: LoggerConfig, registry: Option<Weak<LoggerMap>>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                name: name.into(),
                level: config.resolved_level(),
                propagate: config.propagate,
                registry,
                config,
                sinks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Severity threshold of this logger
    pub fn level(&self) -> LogLevel {
        self.inner.level
    }

    pub fn propagates(&self) -> bool {
        self.inner.propagate
    }

    /// The configuration this logger was built from
    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    /// Closest registered dotted-name ancestor (`a.b.c` -> `a.b` -> `a`)
    ///
    /// Looked up on every call, so an ancestor registered after this logger
    /// is found too.
    pub fn parent(&self) -> Option<LoggerHandle> {
        let map = self.inner.registry.as_ref()?.upgrade()?;
        let loggers = map.read();

        let mut prefix = self.inner.name.as_str();
        while let Some(idx) = prefix.rfind('.') {
            prefix = &prefix[..idx];
            if let Some(handle) = loggers.get(prefix) {
                return Some(handle.clone());
            }
        }
        None
    }

    pub fn add_sink(&self, sink: BoxedSink) {
        self.inner.sinks.lock().push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.inner.sinks.lock().len()
    }

    /// Whether both handles point at the same logger
    pub fn same_as(&self, other: &LoggerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Flush every sink of this logger
    pub fn flush(&self) {
        for sink in self.inner.sinks.lock().iter_mut() {
            sink.flush();
        }
    }

    fn write_sinks(&self, record: &LogRecord) {
        for sink in self.inner.sinks.lock().iter_mut() {
            if sink.accepts(record.level) {
                sink.write(record);
            }
        }
    }

    fn dispatch(&self, record: &LogRecord) {
        self.write_sinks(record);

        // Ancestors skip their own logger threshold; only their sinks filter.
        // `parent` releases the map lock before any sink is written.
        let mut current = self.clone();
        while current.inner.propagate {
            match current.parent() {
                Some(parent) => {
                    parent.write_sinks(record);
                    current = parent;
                }
                None => break,
            }
        }
    }
}

impl Logger for LoggerHandle {
    fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let record = LogRecord::new(self.inner.name.clone(), level, message);
        self.dispatch(&record);
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.inner.level
    }
}

impl PartialEq for LoggerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for LoggerHandle {}

impl std::fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("name", &self.inner.name)
            .field("level", &self.inner.level)
            .field("propagate", &self.inner.propagate)
            .field("parent", &self.parent().map(|p| p.name().to_string()))
            .field("sinks", &self.sink_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::format::RecordFormatter;
    use crate::logging::sink::{ConsoleSink, SharedBuffer};

    fn captured(handle: &LoggerHandle, level: LogLevel) -> SharedBuffer {
        let buffer = SharedBuffer::new();
        handle.add_sink(Box::new(ConsoleSink::with_writer(
            Box::new(buffer.clone()),
            RecordFormatter::new("{name}:{levelname}:{message}", "%H"),
            level,
        )));
        buffer
    }

    fn register(map: &Arc<LoggerMap>, name: &str, config: LoggerConfig) -> LoggerHandle {
        let handle = LoggerHandle::attached(name, config, Arc::downgrade(map));
        map.write().insert(name.to_string(), handle.clone());
        handle
    }

    #[test]
    fn test_level_filtering() {
        let handle = LoggerHandle::new("svc", LoggerConfig::new().with_level("warning"));
        let out = captured(&handle, LogLevel::Warning);

        handle.info("hidden");
        handle.warning("shown");
        handle.critical("also shown");

        assert_eq!(out.contents(), "svc:WARNING:shown\nsvc:CRITICAL:also shown\n");
    }

    #[test]
    fn test_clones_are_identical() {
        let a = LoggerHandle::new("svc", LoggerConfig::default());
        let b = a.clone();
        let c = LoggerHandle::new("svc", LoggerConfig::default());

        assert!(a.same_as(&b));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_propagation_reaches_ancestors() {
        let map = Arc::new(LoggerMap::default());
        let root = register(&map, "app", LoggerConfig::default());
        let root_out = captured(&root, LogLevel::Info);

        let child = register(
            &map,
            "app.worker",
            LoggerConfig::new().with_level("debug").with_propagate(true),
        );
        let child_out = captured(&child, LogLevel::Debug);

        child.debug("detail");
        child.info("progress");

        assert_eq!(
            child_out.contents(),
            "app.worker:DEBUG:detail\napp.worker:INFO:progress\n"
        );
        // The ancestor's sink threshold still applies
        assert_eq!(root_out.contents(), "app.worker:INFO:progress\n");
    }

    #[test]
    fn test_ancestor_registered_later_is_found() {
        let map = Arc::new(LoggerMap::default());
        let child = register(
            &map,
            "app.models.face",
            LoggerConfig::new().with_propagate(true),
        );
        assert!(child.parent().is_none());

        let root = register(&map, "app", LoggerConfig::default());
        let root_out = captured(&root, LogLevel::Debug);
        assert_eq!(child.parent().map(|p| p.name().to_string()).as_deref(), Some("app"));

        // A closer ancestor takes over once it exists
        let models = register(&map, "app.models", LoggerConfig::new().with_propagate(true));
        let models_out = captured(&models, LogLevel::Debug);
        assert!(child.parent().is_some_and(|p| p.same_as(&models)));

        child.warning("late ancestors");
        assert_eq!(models_out.contents(), "app.models.face:WARNING:late ancestors\n");
        assert_eq!(root_out.contents(), "app.models.face:WARNING:late ancestors\n");
    }

    #[test]
    fn test_no_propagation_by_default() {
        let map = Arc::new(LoggerMap::default());
        let root = register(&map, "app", LoggerConfig::default());
        let root_out = captured(&root, LogLevel::Debug);
        let child = register(&map, "app.worker", LoggerConfig::default());

        child.error("local only");
        assert!(root_out.contents().is_empty());
    }

    #[test]
    fn test_standalone_logger_has_no_parent() {
        let handle = LoggerHandle::new("app.worker", LoggerConfig::new().with_propagate(true));
        assert!(handle.parent().is_none());
        handle.info("nowhere to go");
    }
}
