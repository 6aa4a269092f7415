use std::sync::Arc;

use serde_json::Value;

/// Type alias for an event payload pointer.
///
/// Payloads are reference counted so a single emission can hand the same
/// value to every listener in the dispatch snapshot.
///
/// # Example
/// ```
/// use keyed_events::EventPayload;
/// use std::sync::Arc;
///
/// let payload: EventPayload<String> = Arc::new(String::from("emitted value"));
/// ```
pub type EventPayload<T> = Arc<T>;

/// Type alias for a listener callback pointer.
///
/// Callbacks receive a shared payload and produce a [`Reply`]. Requires
/// `Send + Sync` so emitters can be shared across threads.
///
/// # Example
/// ```
/// use keyed_events::{Callback, EventPayload, Reply};
/// use std::sync::Arc;
///
/// let callback: Callback<String> = Arc::new(|payload: &EventPayload<String>| {
///     println!("received: {payload}");
///     Reply::none()
/// });
/// ```
pub type Callback<T> = Arc<dyn Fn(&EventPayload<T>) -> Reply + Send + Sync>;

/// The optional value a listener hands back when invoked.
///
/// Replies are consumed by the diagnostic sink only; `publish` never surfaces
/// them to its caller. Closures that return `()` convert to an empty reply, so
/// most listeners never mention this type.
///
/// # Example
/// ```
/// use keyed_events::Reply;
/// use serde_json::json;
///
/// let silent: Reply = ().into();
/// assert!(silent.value().is_none());
///
/// let reply: Reply = json!({ "handled": true }).into();
/// assert!(reply.value().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reply(Option<Value>);

impl Reply {
    /// An empty reply.
    pub fn none() -> Self {
        Self(None)
    }

    /// The carried value, if the listener produced one.
    pub fn value(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    /// Consume the reply, yielding the carried value.
    pub fn into_value(self) -> Option<Value> {
        self.0
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Self(None)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self(Some(value))
    }
}

impl From<Option<Value>> for Reply {
    fn from(value: Option<Value>) -> Self {
        Self(value)
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Self(Some(Value::String(value)))
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Self(Some(Value::String(value.to_string())))
    }
}
