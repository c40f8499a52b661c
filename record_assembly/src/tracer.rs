//! A `tracing`-backed debug decorator over [`RecordConsumer`].

use crate::consumer::RecordConsumer;
use crate::primitive::{PrimitiveKind, PrimitiveValue};

/// Logs each callback at `TRACE` level before forwarding to the wrapped
/// consumer. Shares its decorator shape with
/// [`crate::validator::ValidatingConsumer`].
pub struct TracingConsumer<C> {
    inner: C,
}

impl<C> TracingConsumer<C> {
    #[must_use]
    pub const fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Unwraps back to the underlying consumer.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: RecordConsumer> RecordConsumer for TracingConsumer<C> {
    type Record = C::Record;

    fn start_message(&mut self) {
        tracing::trace!("startMessage");
        self.inner.start_message();
    }

    fn end_message(&mut self) {
        tracing::trace!("endMessage");
        self.inner.end_message();
    }

    fn start_field(&mut self, field: &str, index: usize) {
        tracing::trace!(field, index, "startField");
        self.inner.start_field(field, index);
    }

    fn end_field(&mut self, field: &str, index: usize) {
        tracing::trace!(field, index, "endField");
        self.inner.end_field(field, index);
    }

    fn start_group(&mut self) {
        tracing::trace!("startGroup");
        self.inner.start_group();
    }

    fn end_group(&mut self) {
        tracing::trace!("endGroup");
        self.inner.end_group();
    }

    fn add_primitive(&mut self, kind: PrimitiveKind, value: PrimitiveValue) {
        tracing::trace!(?kind, ?value, "addPrimitive");
        self.inner.add_primitive(kind, value);
    }

    fn take_record(&mut self) -> Self::Record {
        self.inner.take_record()
    }
}
