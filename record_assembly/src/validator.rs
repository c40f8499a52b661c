//! A validating decorator over [`RecordConsumer`] that checks the emitted
//! callback sequence against the structural grammar, plus
//! field order and primitive kind against a [`SchemaOutline`] derived from
//! the [`Plan`] that produced the events.
//!
//! Placed outside the assembly loop so the core stays validator-agnostic.

use std::collections::HashMap;

use crate::error::AssemblyError;
use crate::plan::Plan;
use crate::primitive::{PrimitiveKind, PrimitiveValue};
use crate::schema::LeafColumn;

/// For one group (identified by its ancestor field path), the ordered list
/// of immediate children as they first appear in document order, and
/// whether each child is itself a group or a primitive leaf.
#[derive(Debug, Clone)]
pub struct GroupOutline {
    children: Vec<(String, usize, ChildKind)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildKind {
    Group,
    Primitive(PrimitiveKind),
}

/// Schema structure derived from a [`Plan`]'s leaves, keyed by the path
/// (as a sequence of field names) from the message root. Built once,
/// consulted by [`ValidatingConsumer`] to check field order and primitive
/// kinds, independent of the external schema object that is otherwise out
/// of scope for this crate.
#[derive(Debug, Clone)]
pub struct SchemaOutline {
    groups: HashMap<Vec<String>, GroupOutline>,
}

impl SchemaOutline {
    /// Derives the outline from the same ordered leaves a [`Plan`] is
    /// built from.
    #[must_use]
    pub fn from_leaves<L: LeafColumn>(leaves: &[L]) -> Self {
        let mut groups: HashMap<Vec<String>, GroupOutline> = HashMap::new();
        for leaf in leaves {
            let path = leaf.field_path();
            for level in 0..path.len() {
                let prefix = path[..level].to_vec();
                let name = path[level].clone();
                let index = leaf.index_path()[level];
                let kind = if level + 1 == path.len() {
                    ChildKind::Primitive(leaf.primitive_kind())
                } else {
                    ChildKind::Group
                };
                let entry = groups.entry(prefix).or_insert_with(|| GroupOutline {
                    children: Vec::new(),
                });
                if !entry.children.iter().any(|(n, i, _)| *n == name && *i == index) {
                    entry.children.push((name, index, kind));
                }
            }
        }
        Self { groups }
    }

    /// Convenience constructor straight from a built [`Plan`]'s states
    /// (equivalent to `from_leaves`, since a `State` carries the same
    /// path/index/kind data its source leaf did).
    #[must_use]
    pub fn from_plan(plan: &Plan) -> Self {
        let mut groups: HashMap<Vec<String>, GroupOutline> = HashMap::new();
        for i in 0..plan.state_count() {
            let state = plan.state(i);
            for level in 0..state.field_path.len() {
                let prefix = state.field_path[..level].to_vec();
                let name = state.field_path[level].clone();
                let index = state.index_path[level];
                let kind = if level + 1 == state.field_path.len() {
                    ChildKind::Primitive(state.primitive_kind)
                } else {
                    ChildKind::Group
                };
                let entry = groups.entry(prefix).or_insert_with(|| GroupOutline {
                    children: Vec::new(),
                });
                if !entry.children.iter().any(|(n, idx, _)| *n == name && *idx == index) {
                    entry.children.push((name, index, kind));
                }
            }
        }
        Self { groups }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Inside a group (or the message root), expecting zero or more
    /// fields in schema order.
    ExpectingField,
    /// Inside a field, expecting one or more groups/primitives before
    /// `endField`.
    ExpectingBody { saw_child: bool },
}

/// Decorates a [`RecordConsumer`], intercepting each callback to verify
/// the structural grammar and field order against a [`SchemaOutline`]
/// before forwarding to the wrapped consumer. Fails with
/// [`AssemblyError::SchemaViolation`] at the first offending callback.
pub struct ValidatingConsumer<'s, C> {
    inner: C,
    outline: &'s SchemaOutline,
    path: Vec<String>,
    /// One counter per currently-open `ExpectingField` frame (message root
    /// or a group), tracking how many of that frame's children have been
    /// seen so far in schema order. Pushed/popped in lockstep with `stack`
    /// entries of `Frame::ExpectingField`.
    child_counters: Vec<usize>,
    stack: Vec<Frame>,
    error: Option<AssemblyError>,
}

impl<'s, C> ValidatingConsumer<'s, C> {
    #[must_use]
    pub fn new(inner: C, outline: &'s SchemaOutline) -> Self {
        Self {
            inner,
            outline,
            path: Vec::new(),
            child_counters: Vec::new(),
            stack: Vec::new(),
            error: None,
        }
    }

    /// Returns the first schema violation observed, if any.
    #[must_use]
    pub fn error(&self) -> Option<&AssemblyError> {
        self.error.as_ref()
    }

    fn fail(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(AssemblyError::SchemaViolation(message.into()));
        }
    }

    fn current_outline(&self) -> Option<&GroupOutline> {
        self.outline.groups.get(&self.path)
    }
}

impl<C: crate::consumer::RecordConsumer> crate::consumer::RecordConsumer for ValidatingConsumer<'_, C> {
    type Record = C::Record;

    fn start_message(&mut self) {
        self.path.clear();
        self.child_counters.clear();
        self.child_counters.push(0);
        self.stack.clear();
        self.stack.push(Frame::ExpectingField);
        self.inner.start_message();
    }

    fn end_message(&mut self) {
        match self.stack.last() {
            Some(Frame::ExpectingField) if self.stack.len() == 1 => {}
            _ => self.fail("endMessage while a field or group was still open"),
        }
        self.stack.pop();
        self.child_counters.pop();
        self.inner.end_message();
    }

    fn start_field(&mut self, field: &str, index: usize) {
        if !matches!(self.stack.last(), Some(Frame::ExpectingField)) {
            self.fail(format!("startField({field}, {index}) not allowed here"));
        }
        if let Some(outline) = self.current_outline() {
            let expected_index = *self.child_counters.last().unwrap_or(&0);
            match outline.children.get(expected_index) {
                Some((expected_name, expected_idx, _))
                    if expected_name == field && *expected_idx == index =>
                {
                    if let Some(top) = self.child_counters.last_mut() {
                        *top = expected_index + 1;
                    }
                }
                _ => self.fail(format!(
                    "field {field}:{index} out of schema order at path {:?}",
                    self.path
                )),
            }
        }
        self.path.push(field.to_string());
        self.stack.push(Frame::ExpectingBody { saw_child: false });
        self.inner.start_field(field, index);
    }

    fn end_field(&mut self, field: &str, index: usize) {
        match self.stack.last() {
            Some(Frame::ExpectingBody { saw_child: true }) => {}
            Some(Frame::ExpectingBody { saw_child: false }) => {
                self.fail(format!("endField({field}, {index}) with no group/primitive body"));
            }
            _ => self.fail(format!("endField({field}, {index}) without matching startField")),
        }
        self.stack.pop();
        self.path.pop();
        self.inner.end_field(field, index);
    }

    fn start_group(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::ExpectingBody { saw_child }) => *saw_child = true,
            _ => self.fail("startGroup not inside an open field"),
        }
        self.stack.push(Frame::ExpectingField);
        self.child_counters.push(0);
        self.inner.start_group();
    }

    fn end_group(&mut self) {
        match self.stack.last() {
            Some(Frame::ExpectingField) => {}
            _ => self.fail("endGroup with an unclosed field inside"),
        }
        self.stack.pop();
        self.child_counters.pop();
        self.inner.end_group();
    }

    fn add_primitive(&mut self, kind: PrimitiveKind, value: PrimitiveValue) {
        match self.stack.last_mut() {
            Some(Frame::ExpectingBody { saw_child }) => *saw_child = true,
            _ => self.fail("addPrimitive not inside an open field"),
        }
        if let Some(outline) = self.outline.groups.get(&self.path[..self.path.len().saturating_sub(1)]) {
            let field = self.path.last().cloned().unwrap_or_default();
            if let Some((_, _, ChildKind::Primitive(expected_kind))) =
                outline.children.iter().find(|(n, _, _)| *n == field)
            {
                if *expected_kind != kind {
                    self.fail(format!("primitive kind mismatch for field {field}"));
                }
            }
        }
        self.inner.add_primitive(kind, value);
    }

    fn take_record(&mut self) -> Self::Record {
        self.inner.take_record()
    }
}
