//! The record consumer protocol: the abstract sink that observes the
//! reassembled structured event stream.

use crate::primitive::{PrimitiveKind, PrimitiveValue};

/// Receives the reassembled event stream for one record.
///
/// Allowed sequences:
/// `message := startMessage field* endMessage`
/// `field := startField (group | primitive)+ endField`
/// `group := startGroup field* endGroup`
/// `primitive := addPrimitive`
///
/// The assembly loop is responsible for producing only allowed sequences;
/// [`crate::validator::ValidatingConsumer`] verifies this independently.
pub trait RecordConsumer {
    /// The materialized record type this consumer assembles.
    type Record;

    fn start_message(&mut self);
    fn end_message(&mut self);
    fn start_field(&mut self, field: &str, index: usize);
    fn end_field(&mut self, field: &str, index: usize);
    fn start_group(&mut self);
    fn end_group(&mut self);
    fn add_primitive(&mut self, kind: PrimitiveKind, value: PrimitiveValue);

    /// Returns (and resets, if the implementation needs to) the record
    /// assembled by the most recently completed `startMessage..endMessage`
    /// span.
    fn take_record(&mut self) -> Self::Record;
}
