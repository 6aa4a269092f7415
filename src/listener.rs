use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::{Callback, EventPayload, Reply};

/// A caller-owned handle for an event listener callback.
///
/// `Listener<T>` wraps a callback behind a shared pointer. Identity is the
/// pointer itself: clones of one handle refer to the same listener, while two
/// separately constructed handles are distinct registrations even if their
/// callbacks behave identically. The handle is what you pass back to the
/// emitter to remove or query a registration without keeping the
/// subscription token around.
///
/// # Examples
///
/// A listener that returns nothing:
/// ```
/// use keyed_events::{EventPayload, Listener};
///
/// let listener = Listener::new(|payload: &EventPayload<String>| {
///     println!("got: {payload}");
/// });
/// assert_eq!(listener, listener.clone());
/// ```
///
/// A listener that hands a value back for diagnostic logging:
/// ```
/// use keyed_events::{EventPayload, Listener};
/// use serde_json::json;
///
/// let listener = Listener::new(|payload: &EventPayload<u32>| {
///     json!({ "doubled": **payload * 2 })
/// });
/// # let _ = listener;
/// ```
pub struct Listener<T> {
    callback: Callback<T>,
}

/// Identity of a listener callback: the address of its shared allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ListenerId(usize);

impl<T: Send + Sync + 'static> Listener<T> {
    /// Wrap a callback into a listener handle.
    ///
    /// The callback may return `()` or any type that converts into [`Reply`];
    /// replies feed diagnostic logging only.
    pub fn new<F, R>(callback: F) -> Self
    where
        F: Fn(&EventPayload<T>) -> R + Send + Sync + 'static,
        R: Into<Reply>,
    {
        Self {
            callback: Arc::new(move |payload: &EventPayload<T>| callback(payload).into()),
        }
    }

    /// Wrap an already-shared callback pointer.
    ///
    /// Handles built from clones of the same `Arc` share one identity.
    pub fn from_callback(callback: Callback<T>) -> Self {
        Self { callback }
    }

    pub(crate) fn callback(&self) -> &Callback<T> {
        &self.callback
    }

    pub(crate) fn id(&self) -> ListenerId {
        ListenerId(Arc::as_ptr(&self.callback) as *const () as usize)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<T> Eq for Listener<T> {}

impl<T> Debug for Listener<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &(Arc::as_ptr(&self.callback) as *const () as usize))
            .finish()
    }
}
