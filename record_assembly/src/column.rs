//! The `ColumnReader` collaborator: one per leaf, yielding the current
//! (value, definition-level, repetition-level) triple and advancing on
//! `consume()`.
//!
//! Decoding pages/files into these triples is out of scope for this crate
//! this trait is the seam between that external reader and the
//! assembly loop.

use crate::primitive::PrimitiveValue;

/// A single leaf column's cursor over its (value, d, r) triples.
pub trait ColumnReader {
    /// Definition level of the value currently under the cursor, in
    /// `0..=max_def`.
    fn current_definition_level(&self) -> u8;

    /// Repetition level of the value currently under the cursor, in
    /// `0..=max_rep`.
    fn current_repetition_level(&self) -> u8;

    /// The value currently under the cursor. Only meaningful when
    /// `current_definition_level()` equals the leaf's `max_def` (i.e. the
    /// value is actually present).
    fn current_value(&self) -> PrimitiveValue;

    /// Advances the cursor to the next triple.
    fn consume(&mut self);

    /// Whether the cursor has run past the last triple: no further records
    /// can be assembled from this column.
    fn is_exhausted(&self) -> bool;
}
