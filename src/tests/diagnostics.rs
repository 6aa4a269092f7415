use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{json, Value};

use crate::diagnostics::render_value;
use crate::{
    DiagnosticKind, DiagnosticPayload, DiagnosticSink, EventEmitter, EventKey, EventPayload,
    Listener,
};

/// Sink that stores records for inspection instead of printing them.
#[derive(Default)]
struct MemorySink {
    records: Mutex<Vec<(DiagnosticKind, EventKey, Option<Value>)>>,
}

impl MemorySink {
    fn kinds(&self) -> Vec<DiagnosticKind> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(kind, _, _)| *kind)
            .collect()
    }
}

impl<T: Serialize + Send + Sync> DiagnosticSink<T> for MemorySink {
    fn record(&self, kind: DiagnosticKind, key: &EventKey, payload: DiagnosticPayload<'_, T>) {
        let payload = match payload {
            DiagnosticPayload::None => None,
            DiagnosticPayload::Event(event) => serde_json::to_value(event.as_ref()).ok(),
            DiagnosticPayload::Reply(value) => Some(value.clone()),
        };
        self.records
            .lock()
            .unwrap()
            .push((kind, key.clone(), payload));
    }
}

fn observed_emitter() -> (EventEmitter<Value>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let emitter =
        EventEmitter::with_sink(Arc::clone(&sink) as Arc<dyn DiagnosticSink<Value>>);
    (emitter, sink)
}

/// Every lifecycle step lands in the sink, in operation order
#[test]
fn records_follow_the_lifecycle() {
    let (emitter, sink) = observed_emitter();
    let listener = Listener::new(|payload: &EventPayload<Value>| {
        json!({ "echo": payload.as_ref().clone() })
    });

    emitter.subscribe("orders", &listener);
    emitter.publish("orders", Arc::new(json!({ "id": 7 })));
    emitter.unsubscribe("orders", &listener).unwrap();

    assert_eq!(
        sink.kinds(),
        vec![
            DiagnosticKind::Subscribe,
            DiagnosticKind::Emit,
            DiagnosticKind::Invoke,
            DiagnosticKind::Unsubscribe,
        ]
    );

    let records = sink.records.lock().unwrap();
    let (_, key, emitted) = &records[1];
    assert_eq!(key, &EventKey::from("orders"));
    assert_eq!(emitted.as_ref(), Some(&json!({ "id": 7 })));

    // the invoke record carries the listener's reply, not the payload
    let (_, _, reply) = &records[2];
    assert_eq!(reply.as_ref(), Some(&json!({ "echo": { "id": 7 } })));
}

/// One invoke record per listener in the dispatch snapshot
#[test]
fn invoke_records_per_listener() {
    let (emitter, sink) = observed_emitter();
    for _ in 0..3 {
        let listener = Listener::new(|_: &EventPayload<Value>| {});
        emitter.subscribe("fanout", &listener);
    }

    emitter.publish("fanout", Arc::new(json!("payload")));
    let invokes = sink
        .kinds()
        .into_iter()
        .filter(|kind| *kind == DiagnosticKind::Invoke)
        .count();
    assert_eq!(invokes, 3);
}

/// Lookups are silent
#[test]
fn has_listener_records_nothing() {
    let (emitter, sink) = observed_emitter();
    let listener = Listener::new(|_: &EventPayload<Value>| {});

    emitter.subscribe("quiet", &listener);
    let before = sink.kinds().len();
    assert!(emitter.has_listener("quiet", &listener));
    assert!(!emitter.has_listener("loud", &listener));
    assert_eq!(sink.kinds().len(), before);
}

/// A no-op token removal is silent; only the real removal is recorded
#[test]
fn noop_token_removal_records_nothing() {
    let (emitter, sink) = observed_emitter();
    let listener = Listener::new(|_: &EventPayload<Value>| {});

    let token = emitter.subscribe("once", &listener);
    assert!(token.unsubscribe());
    let after_removal = sink.kinds().len();

    assert!(!token.unsubscribe());
    assert_eq!(sink.kinds().len(), after_removal);
}

mod rendering {
    use super::*;

    #[test]
    fn textual_payloads_parse_as_structured_data() {
        let rendered = render_value(&json!("{\"x\": 1}"));
        assert_eq!(rendered, serde_json::to_string_pretty(&json!({ "x": 1 })).unwrap());
    }

    #[test]
    fn unparseable_text_falls_back_to_raw() {
        assert_eq!(render_value(&json!("plain words")), "plain words");
    }

    #[test]
    fn structured_payloads_pretty_print() {
        let rendered = render_value(&json!({ "x": 1 }));
        assert!(rendered.contains("\"x\": 1"));
    }
}
