use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use futures::future::{ready, Ready};

use crate::emitter::Registry;
use crate::listener::ListenerId;
use crate::EventKey;

/// Removal token returned by [`subscribe`](crate::EventEmitter::subscribe).
///
/// The token pins the exact registration it was created for: if that
/// registration has since been removed or replaced, [`unsubscribe`] is a
/// no-op returning `false`. Dropping the token leaves the registration
/// active; removal is always explicit.
///
/// [`unsubscribe`]: Subscription::unsubscribe
///
/// # Example
/// ```
/// use keyed_events::{EmitterOptions, EventEmitter, EventPayload, Listener};
///
/// let emitter = EventEmitter::<String>::new(EmitterOptions { debug: false });
/// let listener = Listener::new(|_: &EventPayload<String>| {});
///
/// let token = emitter.subscribe("ping", &listener);
/// assert!(token.unsubscribe());
/// assert!(!token.unsubscribe());
/// ```
pub struct Subscription<T: Send + Sync + 'static> {
    registry: Arc<Registry<T>>,
    key: EventKey,
    listener: ListenerId,
    registration: u64,
}

impl<T: Send + Sync + 'static> Subscription<T> {
    pub(crate) fn new(
        registry: Arc<Registry<T>>,
        key: EventKey,
        listener: ListenerId,
        registration: u64,
    ) -> Self {
        Self {
            registry,
            key,
            listener,
            registration,
        }
    }

    /// The key this subscription was registered under.
    pub fn key(&self) -> &EventKey {
        &self.key
    }

    /// A synchronization point that completes immediately and never fails.
    ///
    /// Registration takes effect before `subscribe` returns; this future
    /// exists for API symmetry with asynchronous emitter variants.
    pub fn ready(&self) -> Ready<()> {
        ready(())
    }

    /// Remove this registration if it is still present.
    ///
    /// Returns `true` if removal occurred, `false` if the registration was
    /// already gone (removed directly, or replaced by a later subscribe of
    /// the same key/listener pair). Records an unsubscribe diagnostic only
    /// when something was removed.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .cancel(&self.key, self.listener, self.registration)
    }
}

impl<T: Send + Sync + 'static> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            key: self.key.clone(),
            listener: self.listener,
            registration: self.registration,
        }
    }
}

impl<T: Send + Sync + 'static> Debug for Subscription<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("registration", &self.registration)
            .finish()
    }
}
