use thiserror::Error;

/// Errors raised by emitter operations.
///
/// All errors are synchronous and raised at the violating call; there is no
/// deferred error path. The two precondition variants are contract
/// violations rather than recoverable runtime conditions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EmitError {
    /// A key value that is not text, an integer, or a symbol.
    ///
    /// Typed [`EventKey`](crate::EventKey) construction cannot produce this;
    /// it is raised by the untyped `TryFrom<&Value>` key boundary.
    #[error("event key must be a string, integer, or symbol")]
    InvalidKey,

    /// A listener that cannot be invoked.
    ///
    /// [`Listener`](crate::Listener) handles are callable by construction, so
    /// the typed API never raises this; the variant completes the error
    /// contract for the registration preconditions.
    #[error("listener is not callable")]
    InvalidListener,

    /// Removal was attempted on a key with no registrations.
    #[error("no listeners registered under the given key")]
    UnknownKey,

    /// Removal was attempted with a listener that has no recorded
    /// registration under the given key.
    #[error("listener is not registered under the given key")]
    UnknownListener,
}
