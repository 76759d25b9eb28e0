//! Event sinks.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, info, trace, warn, Level};

/// Receiver of engine lifecycle events.
///
/// Called synchronously from the run loop and from plugin tasks, so
/// implementations must be cheap and must not panic.
pub trait EventSink: Send + Sync {
    /// Records one event. `event_type` is one of the constants in
    /// [`crate::events`].
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// Discards every event. The executor default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn try_emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}
}

/// Forwards events to `tracing` at a fixed level.
#[derive(Debug, Clone, Copy)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self::info()
    }
}

impl LoggingEventSink {
    /// Logs every event at `level`.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Debug-level sink.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Info-level sink.
    #[must_use]
    pub const fn info() -> Self {
        Self::new(Level::INFO)
    }

    /// The level events are logged at.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl EventSink for LoggingEventSink {
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        let plugin_id = plugin_id_of(data.as_ref());
        let plugin_id = plugin_id.as_deref().unwrap_or("-");

        if self.level == Level::TRACE {
            trace!(event_type, plugin_id, event_data = ?data, "engine event");
        } else if self.level == Level::DEBUG {
            debug!(event_type, plugin_id, event_data = ?data, "engine event");
        } else if self.level == Level::INFO {
            info!(event_type, plugin_id, event_data = ?data, "engine event");
        } else if self.level == Level::WARN {
            warn!(event_type, plugin_id, event_data = ?data, "engine event");
        } else {
            error!(event_type, plugin_id, event_data = ?data, "engine event");
        }
    }
}

/// An event captured by [`CollectingEventSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Event name, e.g. `plugin.faulted`.
    pub event_type: String,
    /// Plugin the event concerns; `None` for run-level events.
    pub plugin_id: Option<String>,
    /// Context the event concerns, when the payload names one.
    pub context_id: Option<String>,
    /// Raw payload.
    pub data: Option<serde_json::Value>,
    /// When the sink received the event.
    pub recorded_at: DateTime<Utc>,
}

impl RecordedEvent {
    fn new(event_type: &str, data: Option<serde_json::Value>) -> Self {
        let context_id = data
            .as_ref()
            .and_then(|d| d.get("context_id"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        Self {
            event_type: event_type.to_string(),
            plugin_id: plugin_id_of(data.as_ref()),
            context_id,
            data,
            recorded_at: Utc::now(),
        }
    }

    /// True for `plugin.*` events.
    #[must_use]
    pub fn is_plugin_event(&self) -> bool {
        self.plugin_id.is_some()
    }
}

/// Keeps every event in memory, in emission order. Intended for tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Event names in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.event_type.clone()).collect()
    }

    /// Events concerning `plugin_id`.
    #[must_use]
    pub fn for_plugin(&self, plugin_id: &str) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.plugin_id.as_deref() == Some(plugin_id))
            .cloned()
            .collect()
    }

    /// Number of events named exactly `event_type`.
    #[must_use]
    pub fn count(&self, event_type: &str) -> usize {
        self.events.lock().iter().filter(|e| e.event_type == event_type).count()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drops every recorded event.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for CollectingEventSink {
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        let event = RecordedEvent::new(event_type, data);
        self.events.lock().push(event);
    }
}

fn plugin_id_of(data: Option<&serde_json::Value>) -> Option<String> {
    data.and_then(|d| d.get("plugin_id"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EXECUTION_STARTED, PLUGIN_FAULTED, PLUGIN_STARTED};
    use serde_json::json;

    #[test]
    fn test_logging_sink_keeps_requested_level() {
        for level in [Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR] {
            let sink = LoggingEventSink::new(level);
            assert_eq!(sink.level(), level);
            sink.try_emit(PLUGIN_STARTED, Some(json!({"plugin_id": "P1"})));
            sink.try_emit(EXECUTION_STARTED, None);
        }
        assert_eq!(LoggingEventSink::default().level(), Level::INFO);
        assert_eq!(LoggingEventSink::debug().level(), Level::DEBUG);
    }

    #[test]
    fn test_collecting_sink_types_events() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.try_emit(EXECUTION_STARTED, Some(json!({"context_id": "ctx-1"})));
        sink.try_emit(PLUGIN_STARTED, Some(json!({"plugin_id": "P1", "context_id": "ctx-1"})));
        sink.try_emit(PLUGIN_FAULTED, Some(json!({"plugin_id": "P1", "kind": "panic"})));
        sink.try_emit(PLUGIN_STARTED, Some(json!({"plugin_id": "P2"})));

        let events = sink.events();
        assert_eq!(events.len(), 4);
        assert!(!events[0].is_plugin_event());
        assert_eq!(events[0].context_id.as_deref(), Some("ctx-1"));
        assert_eq!(events[1].plugin_id.as_deref(), Some("P1"));

        let p1: Vec<String> = sink.for_plugin("P1").into_iter().map(|e| e.event_type).collect();
        assert_eq!(p1, vec![PLUGIN_STARTED, PLUGIN_FAULTED]);
        assert_eq!(sink.count(PLUGIN_STARTED), 2);
        assert_eq!(sink.count("plugin."), 0);

        sink.clear();
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn test_noop_sink_accepts_anything() {
        NoOpEventSink.try_emit("anything", Some(json!({"x": 1})));
    }
}
