//! Diagnostic side channel for emitter activity.
//!
//! Every subscribe, unsubscribe, emit, and listener invocation is reported to
//! a [`DiagnosticSink`] injected at construction time, keeping dispatch logic
//! free of any logging concern. The crate ships two sinks: [`ConsoleSink`]
//! (the debug-mode default) and [`NullSink`].

use std::fmt;

use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::{EventKey, EventPayload};

/// The kind of emitter activity being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A registration was created.
    Subscribe,
    /// A registration was removed.
    Unsubscribe,
    /// An event was published.
    Emit,
    /// A single listener was invoked during dispatch.
    Invoke,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::Emit => "emit",
            Self::Invoke => "invoke",
        };
        f.write_str(tag)
    }
}

/// The data accompanying a diagnostic record.
///
/// Emit records carry the published payload; invoke records carry the
/// listener's reply value, if any; registration records carry nothing.
pub enum DiagnosticPayload<'a, T> {
    /// No accompanying data.
    None,
    /// The payload of a published event.
    Event(&'a EventPayload<T>),
    /// The value a listener returned.
    Reply(&'a Value),
}

/// Receiver for emitter diagnostics.
///
/// Implement this to route emitter activity anywhere; the emitter itself
/// never formats or prints. Sinks must be cheap and must not call back into
/// the emitter that reports to them.
pub trait DiagnosticSink<T>: Send + Sync {
    /// Record one unit of emitter activity.
    fn record(&self, kind: DiagnosticKind, key: &EventKey, payload: DiagnosticPayload<'_, T>);
}

/// Sink that discards everything. Installed when debug output is off.
pub struct NullSink;

impl<T> DiagnosticSink<T> for NullSink {
    fn record(&self, _kind: DiagnosticKind, _key: &EventKey, _payload: DiagnosticPayload<'_, T>) {}
}

/// Sink that prints grouped entries to stdout.
///
/// Each record becomes a header line followed by an indented payload line:
///
/// ```text
/// [14:03:52][eventType: emit][eventName: orders]
///   payload: {
///     "id": 7
///   }
/// ```
///
/// Textual payloads are parsed as JSON and pretty-printed when they parse,
/// shown raw when they do not; an absent payload renders as an empty string.
#[derive(Default)]
pub struct ConsoleSink;

impl<T> DiagnosticSink<T> for ConsoleSink
where
    T: Serialize + Send + Sync,
{
    fn record(&self, kind: DiagnosticKind, key: &EventKey, payload: DiagnosticPayload<'_, T>) {
        let stamp = Local::now().format("%H:%M:%S");
        let tag = format!("[eventType: {kind}]");
        let tag = match kind {
            DiagnosticKind::Subscribe => tag.green(),
            DiagnosticKind::Unsubscribe => tag.red(),
            DiagnosticKind::Emit => tag.cyan(),
            DiagnosticKind::Invoke => tag.blue(),
        };
        println!(
            "{}{}{}",
            format!("[{stamp}]").dimmed(),
            tag,
            format!("[eventName: {key}]").bold()
        );
        println!("  payload: {}", render_payload(payload));
    }
}

fn render_payload<T: Serialize>(payload: DiagnosticPayload<'_, T>) -> String {
    match payload {
        DiagnosticPayload::None => String::new(),
        DiagnosticPayload::Reply(value) => render_value(value),
        DiagnosticPayload::Event(event) => match serde_json::to_value(&**event) {
            Ok(value) => render_value(&value),
            Err(err) => {
                log::warn!("failed to serialize payload for diagnostics: {err}");
                String::new()
            }
        },
    }
}

/// Render a payload value, parsing textual payloads as structured data when
/// they parse and falling back to the raw text when they do not.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed) => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| text.clone()),
            Err(_) => text.clone(),
        },
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
