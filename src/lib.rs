//! # Keyed Events
//!
//! A minimal keyed publish/subscribe event emitter.
//!
//! - **EventEmitter**: registers listeners under a key and dispatches
//!   published payloads to them in registration order.
//! - **Listener**: a caller-owned callback handle; identity is the handle
//!   itself, so removal never needs the internal wrapper.
//! - **Subscription**: the token returned by `subscribe`, enabling removal
//!   without retaining the original key/listener pair.
//! - **EventKey**: text, integer, or opaque [`Symbol`] identifiers.
//! - **DiagnosticSink**: injected side channel for subscribe / unsubscribe /
//!   emit / invoke observability; the console sink is on by default.
//!
//! Dispatch is fully synchronous and runs over a snapshot taken before any
//! listener executes, so listeners may freely mutate registrations during a
//! pass without affecting it.

mod diagnostics;
mod emitter;
mod error;
mod key;
mod listener;
mod subscription;
mod types;

pub use diagnostics::{ConsoleSink, DiagnosticKind, DiagnosticPayload, DiagnosticSink, NullSink};
pub use emitter::{EmitterOptions, EventEmitter};
pub use error::EmitError;
pub use key::{EventKey, Symbol};
pub use listener::Listener;
pub use subscription::Subscription;
pub use types::{Callback, EventPayload, Reply};

#[cfg(test)]
mod tests;
