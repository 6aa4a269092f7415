use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use serde::Serialize;

use crate::diagnostics::{
    ConsoleSink, DiagnosticKind, DiagnosticPayload, DiagnosticSink, NullSink,
};
use crate::listener::ListenerId;
use crate::subscription::Subscription;
use crate::{Callback, EmitError, EventKey, EventPayload, Listener, Reply};

static NEXT_REGISTRATION: AtomicU64 = AtomicU64::new(1);

type WeakCallback<T> = Weak<dyn Fn(&EventPayload<T>) -> Reply + Send + Sync>;

/// Construction options for [`EventEmitter`].
///
/// `debug` (default `true`) toggles whether diagnostic entries are printed to
/// the console; turning it off installs a sink that discards everything.
#[derive(Debug, Clone, Copy)]
pub struct EmitterOptions {
    /// Print a console diagnostic entry for every subscribe, unsubscribe,
    /// emit, and listener invocation.
    pub debug: bool,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self { debug: true }
    }
}

/// One active registration: the stored callback plus a process-unique id.
///
/// Invocation goes through here so every listener call is reported to the
/// diagnostic sink without the callback itself changing shape.
pub(crate) struct Registration<T> {
    id: u64,
    callback: Callback<T>,
}

impl<T: Send + Sync + 'static> Registration<T> {
    fn new(callback: Callback<T>) -> Self {
        Self {
            id: NEXT_REGISTRATION.fetch_add(1, Ordering::Relaxed),
            callback,
        }
    }

    fn invoke(&self, key: &EventKey, payload: &EventPayload<T>, sink: &dyn DiagnosticSink<T>) {
        let reply = (self.callback)(payload);
        match reply.value() {
            Some(value) => sink.record(DiagnosticKind::Invoke, key, DiagnosticPayload::Reply(value)),
            None => sink.record(DiagnosticKind::Invoke, key, DiagnosticPayload::None),
        }
    }
}

struct IndexEntry<T> {
    registration: u64,
    // Non-owning on purpose: the index alone must never keep a caller's
    // callback alive. The registration set holds the strong reference.
    callback: WeakCallback<T>,
}

/// Shared emitter state: the keyed registration sets plus the pair index used
/// for removal-by-original-reference.
pub(crate) struct Registry<T> {
    channels: DashMap<EventKey, Vec<Arc<Registration<T>>>>,
    index: DashMap<(EventKey, ListenerId), IndexEntry<T>>,
    sink: Arc<dyn DiagnosticSink<T>>,
}

impl<T: Send + Sync + 'static> Registry<T> {
    /// Drop one registration from a key's set, pruning the key entry if the
    /// set becomes empty. No dangling empty sets survive.
    fn detach(&self, key: &EventKey, registration: u64) {
        if let Some(mut set) = self.channels.get_mut(key) {
            set.retain(|r| r.id != registration);
            let emptied = set.is_empty();
            drop(set);
            if emptied {
                // Re-checked under the guard: a subscribe may have landed in
                // between.
                self.channels.remove_if(key, |_, set| set.is_empty());
            }
        }
    }

    /// Token-based removal: succeeds only while the pair association still
    /// points at the token's own registration.
    pub(crate) fn cancel(&self, key: &EventKey, listener: ListenerId, registration: u64) -> bool {
        let removed = self
            .index
            .remove_if(&(key.clone(), listener), |_, entry| {
                entry.registration == registration
            });
        if removed.is_none() {
            return false;
        }
        self.detach(key, registration);
        self.sink
            .record(DiagnosticKind::Unsubscribe, key, DiagnosticPayload::None);
        true
    }
}

/// A keyed publish/subscribe event emitter.
///
/// Listeners are registered under an [`EventKey`] and invoked, in
/// registration order, whenever that key is published. Removal works either
/// through the [`Subscription`] token returned at subscribe time or by
/// handing back the original key/listener pair. Cloning an emitter is cheap
/// and yields a handle onto the same registrations.
///
/// # Type Parameters
/// * `T` - The payload type for events. Must be `Send + Sync + 'static`.
///
/// # Example
/// ```
/// use keyed_events::{EmitterOptions, EventEmitter, EventPayload, Listener};
/// use std::sync::Arc;
///
/// let emitter = EventEmitter::<String>::new(EmitterOptions { debug: false });
/// let listener = Listener::new(|payload: &EventPayload<String>| {
///     assert_eq!(payload.as_str(), "pressed");
/// });
///
/// emitter.subscribe("button", &listener);
/// emitter.publish("button", Arc::new("pressed".to_string()));
///
/// assert!(emitter.has_listener("button", &listener));
/// emitter.unsubscribe("button", &listener).unwrap();
/// assert!(!emitter.has_listener("button", &listener));
/// ```
pub struct EventEmitter<T: Send + Sync + 'static> {
    registry: Arc<Registry<T>>,
}

impl<T: Serialize + Send + Sync + 'static> EventEmitter<T> {
    /// Create an emitter from [`EmitterOptions`].
    ///
    /// With `debug: true` (the default) every operation prints a grouped
    /// console entry via [`ConsoleSink`]; with `debug: false` diagnostics are
    /// discarded.
    pub fn new(options: EmitterOptions) -> Self {
        let sink: Arc<dyn DiagnosticSink<T>> = if options.debug {
            Arc::new(ConsoleSink)
        } else {
            Arc::new(NullSink)
        };
        Self::with_sink(sink)
    }
}

impl<T: Serialize + Send + Sync + 'static> Default for EventEmitter<T> {
    /// An emitter with default options (console diagnostics on).
    fn default() -> Self {
        Self::new(EmitterOptions::default())
    }
}

impl<T: Send + Sync + 'static> EventEmitter<T> {
    /// Create an emitter reporting to an injected diagnostic sink.
    ///
    /// This is the seam tests use to observe emitter activity without
    /// touching stdout.
    pub fn with_sink(sink: Arc<dyn DiagnosticSink<T>>) -> Self {
        Self {
            registry: Arc::new(Registry {
                channels: DashMap::new(),
                index: DashMap::new(),
                sink,
            }),
        }
    }

    /// Register a listener under a key and return the removal token.
    ///
    /// The listener is appended to the key's registration set (created on
    /// first use). Re-subscribing the exact same key/listener pair replaces
    /// the prior registration rather than stacking a duplicate. The same
    /// listener may be registered under any number of distinct keys.
    ///
    /// Dropping the returned [`Subscription`] does NOT remove the
    /// registration; removal is always explicit.
    pub fn subscribe<K: Into<EventKey>>(&self, key: K, listener: &Listener<T>) -> Subscription<T> {
        let key = key.into();
        let registration = Arc::new(Registration::new(Arc::clone(listener.callback())));
        let registration_id = registration.id;

        let previous = self.registry.index.insert(
            (key.clone(), listener.id()),
            IndexEntry {
                registration: registration_id,
                callback: Arc::downgrade(listener.callback()),
            },
        );
        if let Some(previous) = previous {
            if let Some(mut set) = self.registry.channels.get_mut(&key) {
                set.retain(|r| r.id != previous.registration);
            }
        }
        self.registry
            .channels
            .entry(key.clone())
            .or_default()
            .push(registration);
        self.registry
            .sink
            .record(DiagnosticKind::Subscribe, &key, DiagnosticPayload::None);

        Subscription::new(
            Arc::clone(&self.registry),
            key,
            listener.id(),
            registration_id,
        )
    }

    /// Publish a payload to every listener registered under a key.
    ///
    /// Dispatch runs over a point-in-time snapshot taken before any listener
    /// executes: listeners that subscribe or unsubscribe during the pass do
    /// not change who gets this payload. Publishing to a key with no
    /// listeners is a no-op, not an error. Listener replies are reported to
    /// the diagnostic sink and never surfaced here.
    pub fn publish<K: Into<EventKey>>(&self, key: K, payload: EventPayload<T>) {
        let key = key.into();
        self.registry
            .sink
            .record(DiagnosticKind::Emit, &key, DiagnosticPayload::Event(&payload));

        // No map guard may be held while listeners run; a listener is free to
        // call back into this emitter.
        let snapshot: Vec<Arc<Registration<T>>> = self
            .registry
            .channels
            .get(&key)
            .map(|set| set.value().clone())
            .unwrap_or_default();

        for registration in &snapshot {
            registration.invoke(&key, &payload, self.registry.sink.as_ref());
        }
    }

    /// Remove the registration for a key/listener pair.
    ///
    /// # Errors
    /// * [`EmitError::UnknownListener`] if the listener has no recorded
    ///   registration for this pairing, or none at all.
    /// * [`EmitError::UnknownKey`] if the listener is registered elsewhere
    ///   but the key has no registration set.
    ///
    /// Unlike the token's silent no-op, repeating a removal here is an error;
    /// the asymmetry is intentional.
    pub fn unsubscribe<K: Into<EventKey>>(
        &self,
        key: K,
        listener: &Listener<T>,
    ) -> Result<(), EmitError> {
        let key = key.into();
        if let Some((_, entry)) = self.registry.index.remove(&(key.clone(), listener.id())) {
            self.registry.detach(&key, entry.registration);
            self.registry
                .sink
                .record(DiagnosticKind::Unsubscribe, &key, DiagnosticPayload::None);
            return Ok(());
        }
        // The listener association is the more specific miss: only a listener
        // that is registered somewhere can observe a missing key.
        let id = listener.id();
        let elsewhere = self.registry.index.iter().any(|entry| entry.key().1 == id);
        if elsewhere && !self.registry.channels.contains_key(&key) {
            Err(EmitError::UnknownKey)
        } else {
            Err(EmitError::UnknownListener)
        }
    }

    /// Whether a key/listener pair currently has a registration.
    ///
    /// Pure lookup: no mutation, no diagnostic record.
    pub fn has_listener<K: Into<EventKey>>(&self, key: K, listener: &Listener<T>) -> bool {
        self.registry
            .index
            .get(&(key.into(), listener.id()))
            .map_or(false, |entry| entry.callback.strong_count() > 0)
    }

    /// Keys that currently have one or more registrations.
    pub fn event_names(&self) -> Vec<EventKey> {
        self.registry
            .channels
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Number of registrations under a key; `0` when the key is absent.
    pub fn listener_count<K: Into<EventKey>>(&self, key: K) -> usize {
        self.registry
            .channels
            .get(&key.into())
            .map_or(0, |set| set.len())
    }
}

impl<T: Send + Sync + 'static> Clone for EventEmitter<T> {
    /// Clones share the underlying registrations and diagnostic sink.
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: Send + Sync + 'static> Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("keys", &self.registry.channels.len())
            .finish()
    }
}
