//! Shared scenario-test harness: a hand-built `LeafColumn`, a `VecColumnReader`
//! driven by literal (value, d, r) triples, and a `RecordingConsumer` that
//! captures the event stream as a `Vec<Event>` for exact-trace assertions.
#![allow(dead_code)]

use record_assembly::{ColumnReader, LeafColumn, PrimitiveKind, PrimitiveValue, RecordConsumer};

/// A schema leaf built entirely from literal values. The schema/column
/// I/O tree is out of scope for this crate, so tests supply these by
/// hand rather than compiling them from a higher-level schema language.
pub struct BuiltLeaf {
    pub field_path: Vec<String>,
    pub index_path: Vec<usize>,
    pub max_def: u8,
    pub max_rep: u8,
    pub ancestor_def_levels: Vec<u8>,
    pub is_first: Vec<bool>,
    pub is_last: Vec<bool>,
    pub parent_field_path_len: Vec<usize>,
    pub primitive_kind: PrimitiveKind,
}

impl LeafColumn for BuiltLeaf {
    fn field_path(&self) -> &[String] {
        &self.field_path
    }
    fn index_path(&self) -> &[usize] {
        &self.index_path
    }
    fn max_def(&self) -> u8 {
        self.max_def
    }
    fn max_rep(&self) -> u8 {
        self.max_rep
    }
    fn definition_level_of_ancestor(&self, level: usize) -> u8 {
        self.ancestor_def_levels[level]
    }
    fn is_first(&self, r: u8) -> bool {
        self.is_first[r as usize]
    }
    fn is_last(&self, r: u8) -> bool {
        self.is_last[r as usize]
    }
    fn parent_field_path_len(&self, r: u8) -> usize {
        self.parent_field_path_len[r as usize]
    }
    fn primitive_kind(&self) -> PrimitiveKind {
        self.primitive_kind
    }
}

fn path(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// Leaf for a single top-level required/optional field with no ancestors.
///
/// `is_last_overall` must be `true` only for the leaf that is actually last
/// in the whole leaves list passed to [`record_assembly::Plan::build`].
/// Repetition level 0's `isLast` means "last leaf of the message", not
/// "last sibling of some group", and getting this wrong reopens a group
/// that should have stayed open across a field transition.
pub fn flat_leaf(
    name: &str,
    index: usize,
    optional: bool,
    is_last_overall: bool,
    kind: PrimitiveKind,
) -> BuiltLeaf {
    let max_def = u8::from(optional);
    BuiltLeaf {
        field_path: path(&[name]),
        index_path: vec![index],
        max_def,
        max_rep: 0,
        ancestor_def_levels: vec![],
        is_first: vec![true; 1],
        is_last: vec![is_last_overall],
        parent_field_path_len: vec![1; 1],
        primitive_kind: kind,
    }
}

/// Leaf for a single top-level repeated scalar field (no group wrapper).
pub fn repeated_scalar_leaf(name: &str, kind: PrimitiveKind) -> BuiltLeaf {
    BuiltLeaf {
        field_path: path(&[name]),
        index_path: vec![0],
        max_def: 1,
        max_rep: 1,
        ancestor_def_levels: vec![],
        is_first: vec![true, true],
        is_last: vec![true, true],
        parent_field_path_len: vec![1, 1],
        primitive_kind: kind,
    }
}

/// Leaf `v` under a single repeated group `g`, `v` itself required
/// (`message M { repeated group g { required int32 v; } }`).
pub fn nested_required_leaf(group: &str, field: &str, kind: PrimitiveKind) -> BuiltLeaf {
    BuiltLeaf {
        field_path: path(&[group, field]),
        index_path: vec![0, 0],
        max_def: 1,
        max_rep: 1,
        ancestor_def_levels: vec![0],
        is_first: vec![true, true],
        is_last: vec![true, true],
        parent_field_path_len: vec![1, 1],
        primitive_kind: kind,
    }
}

/// One of two leaves (`a`, `b`), both optional, under a shared repeated
/// group `g`. `position` is this leaf's 0-based sibling
/// index under `g`; `sibling_count` is the total number of leaves under
/// `g`. Since `g` is the only group in this fixture schema, sibling order
/// under `g` and overall leaf order coincide, so the same positions also
/// answer repetition level 0's `isFirst`/`isLast` (see [`flat_leaf`]'s
/// doc comment for why that distinction matters).
pub fn nested_optional_leaf(
    group: &str,
    field: &str,
    index: usize,
    position: usize,
    sibling_count: usize,
    kind: PrimitiveKind,
) -> BuiltLeaf {
    let first = position == 0;
    let last = position + 1 == sibling_count;
    BuiltLeaf {
        field_path: path(&[group, field]),
        index_path: vec![0, index],
        max_def: 2,
        max_rep: 1,
        ancestor_def_levels: vec![0],
        is_first: vec![first, first],
        is_last: vec![last, last],
        parent_field_path_len: vec![1, 1],
        primitive_kind: kind,
    }
}

/// A column reader driven entirely by a literal list of (value, d, r)
/// triples, one per occurrence of the leaf across the whole stream.
pub struct VecColumnReader {
    triples: Vec<(PrimitiveValue, u8, u8)>,
    cursor: usize,
}

impl VecColumnReader {
    pub fn new(triples: Vec<(PrimitiveValue, u8, u8)>) -> Self {
        Self { triples, cursor: 0 }
    }
}

impl ColumnReader for VecColumnReader {
    fn current_definition_level(&self) -> u8 {
        self.triples.get(self.cursor).map_or(0, |t| t.1)
    }
    fn current_repetition_level(&self) -> u8 {
        self.triples.get(self.cursor).map_or(0, |t| t.2)
    }
    fn current_value(&self) -> PrimitiveValue {
        self.triples[self.cursor].0.clone()
    }
    fn consume(&mut self) {
        self.cursor += 1;
    }
    fn is_exhausted(&self) -> bool {
        self.cursor >= self.triples.len()
    }
}

/// One captured callback from the record consumer protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartMessage,
    EndMessage,
    StartField(String, usize),
    EndField(String, usize),
    StartGroup,
    EndGroup,
    AddPrimitive(PrimitiveKind, PrimitiveValue),
}

/// Builds a plan, drives it over literal column data, and collects the
/// captured event trace for each of `record_count` records. The shared
/// entry point behind [`assembly_test!`].
pub fn run_assembly_scenario<L: LeafColumn>(
    leaves: &[L],
    columns: Vec<Vec<(PrimitiveValue, u8, u8)>>,
    record_count: usize,
) -> Vec<Vec<Event>> {
    use record_assembly::{AssemblyConfig, AssemblyReader, Plan};

    let plan = Plan::build(leaves).expect("fixture schema should build a plan");
    let readers: Vec<Box<dyn ColumnReader>> = columns
        .into_iter()
        .map(|triples| Box::new(VecColumnReader::new(triples)) as Box<dyn ColumnReader>)
        .collect();
    let mut reader = AssemblyReader::new(&plan, readers, AssemblyConfig::default());
    let mut consumer = RecordingConsumer::default();
    (0..record_count)
        .map(|_| reader.read(&mut consumer).expect("fixture stream should have this many records"))
        .collect()
}

/// Declares a scenario test asserting an exact captured event trace.
///
/// Drives [`run_assembly_scenario`] over a schema fixture and a list of
/// per-leaf column triples, then diffs the result against the expected
/// trace.
#[macro_export]
macro_rules! assembly_test {
    (
        name: $test_name:ident,
        leaves: $leaves:expr,
        columns: $columns:expr,
        records: $count:expr,
        expect: $expected:expr
    ) => {
        #[test]
        fn $test_name() {
            let records = common::run_assembly_scenario(&$leaves, $columns, $count);
            assert_eq!(records, $expected);
        }
    };
}

/// Captures the full event stream for one record as a `Vec<Event>`.
#[derive(Default)]
pub struct RecordingConsumer {
    events: Vec<Event>,
}

impl RecordConsumer for RecordingConsumer {
    type Record = Vec<Event>;

    fn start_message(&mut self) {
        self.events.push(Event::StartMessage);
    }
    fn end_message(&mut self) {
        self.events.push(Event::EndMessage);
    }
    fn start_field(&mut self, field: &str, index: usize) {
        self.events.push(Event::StartField(field.to_string(), index));
    }
    fn end_field(&mut self, field: &str, index: usize) {
        self.events.push(Event::EndField(field.to_string(), index));
    }
    fn start_group(&mut self) {
        self.events.push(Event::StartGroup);
    }
    fn end_group(&mut self) {
        self.events.push(Event::EndGroup);
    }
    fn add_primitive(&mut self, kind: PrimitiveKind, value: PrimitiveValue) {
        self.events.push(Event::AddPrimitive(kind, value));
    }
    fn take_record(&mut self) -> Self::Record {
        std::mem::take(&mut self.events)
    }
}
