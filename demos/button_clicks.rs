//! Example: GUI button click events with console diagnostics
use std::sync::Arc;

use keyed_events::{EventEmitter, EventPayload, Listener};

fn main() {
    // Default options keep debug diagnostics on, so every subscribe,
    // publish, and listener invocation prints a grouped console entry.
    let emitter = EventEmitter::<String>::default();

    let on_click = Listener::new(|payload: &EventPayload<String>| {
        println!("button pressed: {payload}");
    });

    let token = emitter.subscribe("button_click", &on_click);

    // Simulate two clicks
    emitter.publish("button_click", Arc::new("OK".to_string()));
    emitter.publish("button_click", Arc::new("Cancel".to_string()));

    // Tear the handler down via the token
    assert!(token.unsubscribe());
    emitter.publish("button_click", Arc::new("ignored".to_string()));
}
