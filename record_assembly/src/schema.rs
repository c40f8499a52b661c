//! The `LeafColumn` collaborator: everything the plan builder needs to know
//! about one leaf of the schema/column I/O tree.
//!
//! The schema tree itself, and the tree of nested/primitive column
//! descriptors built from it, are external collaborators out of scope for
//! this trait is the seam: implementors bind a
//! concrete schema representation to the assembly-plan builder.

use crate::primitive::PrimitiveKind;

/// Static, per-leaf description drawn from the schema/column I/O tree.
///
/// All methods here are queried only during [`crate::plan::Plan::build`];
/// nothing in the assembly loop calls back into a `LeafColumn` once the
/// plan exists.
pub trait LeafColumn {
    /// Ordered field-path (strings) from the message root to this leaf,
    /// inclusive of the leaf's own field name as the last element.
    fn field_path(&self) -> &[String];

    /// Parallel index-path: position among siblings at each level of
    /// `field_path`.
    fn index_path(&self) -> &[usize];

    /// Maximum definition level this leaf can carry.
    fn max_def(&self) -> u8;

    /// Maximum repetition level this leaf can carry.
    fn max_rep(&self) -> u8;

    /// Cumulative definition level already reached by ancestors *strictly
    /// above* the one at `level` (i.e. the count of optional/repeated
    /// ancestors at positions `< level`), equivalently the minimum `d`
    /// that must be met before group `level` needs to be opened. `level`
    /// runs `0..field_path().len() - 1` (the leaf itself is excluded); the
    /// first real ancestor (`level == 0`) therefore always reports `0`.
    fn definition_level_of_ancestor(&self, level: usize) -> u8;

    /// Whether this leaf's current occurrence is the first child of the
    /// repeated ancestor at repetition level `r`.
    fn is_first(&self, r: u8) -> bool;

    /// Whether this leaf's current occurrence is the last child of the
    /// repeated ancestor at repetition level `r`.
    fn is_last(&self, r: u8) -> bool;

    /// Length of the field path of the ancestor whose repetition level is
    /// `r` (i.e. `parent(r).field_path().len()`). Used to compute the
    /// depth to close down to when looping back to a repeated ancestor.
    fn parent_field_path_len(&self, r: u8) -> usize;

    /// The primitive kind this leaf's column carries.
    fn primitive_kind(&self) -> PrimitiveKind;
}

/// Length of the longest common prefix of two field paths.
pub(crate) fn common_prefix_len(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
