//! Example: sensor readings fanned out under symbol keys
use std::sync::Arc;

use keyed_events::{EmitterOptions, EventEmitter, EventPayload, Listener, Symbol};
use serde_json::{json, Value};

fn main() {
    let emitter = EventEmitter::<Value>::new(EmitterOptions { debug: false });
    let temperature = Symbol::labeled("temperature");

    // A listener can hand a value back; replies feed diagnostics only.
    let alarm = Listener::new(|reading: &EventPayload<Value>| {
        let celsius = reading["celsius"].as_f64().unwrap_or(0.0);
        if celsius > 90.0 {
            println!("overheating: {celsius}");
        }
        json!({ "checked": celsius })
    });

    // The same listener can watch several keys independently.
    emitter.subscribe(temperature, &alarm);
    emitter.subscribe("calibration", &alarm);

    for celsius in [20.5, 88.0, 93.2] {
        emitter.publish(temperature, Arc::new(json!({ "celsius": celsius })));
    }

    emitter.unsubscribe(temperature, &alarm).expect("alarm was registered");
    println!("still watching: {:?}", emitter.event_names());
}
