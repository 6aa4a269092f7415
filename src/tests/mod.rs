mod diagnostics;

use std::sync::Arc;

use crate::{DiagnosticSink, EventEmitter, NullSink};

/// An emitter that keeps test output clean by discarding diagnostics.
pub(crate) fn quiet<T: Send + Sync + 'static>() -> EventEmitter<T> {
    EventEmitter::with_sink(Arc::new(NullSink) as Arc<dyn DiagnosticSink<T>>)
}
