//! The assembly loop: drives the automaton to emit one record per call.

use crate::column::ColumnReader;
use crate::config::AssemblyConfig;
use crate::consumer::RecordConsumer;
use crate::error::{AssemblyError, CallerError, ReadIntoError};
use crate::plan::Plan;

/// Drives a [`Plan`]'s automaton over a set of column readers, emitting a
/// structured event stream to a [`RecordConsumer`] for each assembled
/// record.
///
/// Concurrent callers are not supported: a single `AssemblyReader` owns
/// its column readers and consumer exclusively for the duration of a
/// `read()`. The `Plan` itself may be shared (`&Plan`) across
/// any number of sibling readers, each with its own column readers.
pub struct AssemblyReader<'p> {
    plan: &'p Plan,
    readers: Vec<Box<dyn ColumnReader>>,
    config: AssemblyConfig,
    pending_end_field: Option<(String, usize)>,
}

impl<'p> AssemblyReader<'p> {
    /// Builds a reader bound to `plan`, with one column reader per state in
    /// document order.
    ///
    /// # Panics
    ///
    /// Panics if `readers.len() != plan.state_count()`: the column readers
    /// must exactly match the leaves the plan was built from.
    #[must_use]
    pub fn new(plan: &'p Plan, readers: Vec<Box<dyn ColumnReader>>, config: AssemblyConfig) -> Self {
        assert_eq!(
            readers.len(),
            plan.state_count(),
            "column reader count must match plan state count"
        );
        Self {
            plan,
            readers,
            config,
            pending_end_field: None,
        }
    }

    /// Assembles the next record, driving `consumer` through the
    /// structured event stream and returning its materialized record.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::StreamExhausted`] if the leading column
    /// reports no more data: a distinct terminal condition, not a
    /// successful empty record.
    pub fn read<C: RecordConsumer>(&mut self, consumer: &mut C) -> Result<C::Record, AssemblyError> {
        if self.readers[0].is_exhausted() {
            return Err(AssemblyError::StreamExhausted);
        }

        consumer.start_message();
        let plan = self.plan;
        let mut current_level: usize = 0;
        let mut state_id: usize = 0;

        loop {
            crate::profiling::record_state_visit(state_id);
            let state = plan.state(state_id);
            let d = self.readers[state_id].current_definition_level();
            let depth = state.definition_level_to_depth[d as usize];

            while (current_level as i32) <= depth {
                let field = state.field_path[current_level].as_str();
                let index = state.index_path[current_level];
                self.emit_start_field(consumer, field, index);
                self.emit_start_group(consumer);
                current_level += 1;
            }

            if d == state.max_def {
                let leaf_index = state.field_path.len() - 1;
                let leaf_field = state.field_path[leaf_index].as_str();
                let leaf_slot = state.index_path[leaf_index];
                let value = self.readers[state_id].current_value();
                self.emit_start_field(consumer, leaf_field, leaf_slot);
                consumer.add_primitive(state.primitive_kind, value);
                self.emit_end_field(consumer, leaf_field, leaf_slot);
            }

            self.readers[state_id].consume();

            let next_r = if state.max_rep == 0 {
                0
            } else {
                self.readers[state_id].current_repetition_level()
            };

            let target = state.next_level[next_r as usize];
            while current_level > target {
                current_level -= 1;
                self.emit_end_group(consumer);
                let field = state.field_path[current_level].as_str();
                let index = state.index_path[current_level];
                self.emit_end_field(consumer, field, index);
            }

            let next_state = state.next_state[next_r as usize];
            if next_state == plan.state_count() {
                break;
            }
            state_id = next_state;
        }

        self.flush_pending(consumer);
        consumer.end_message();
        Ok(consumer.take_record())
    }

    /// Assembles `count` consecutive records into `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`CallerError::BufferTooSmall`] if `count > buffer.len()`
    /// without mutating any state, or propagates an [`AssemblyError`] from
    /// an underlying `read()` call.
    pub fn read_into<C: RecordConsumer>(
        &mut self,
        consumer: &mut C,
        buffer: &mut [C::Record],
        count: usize,
    ) -> Result<(), ReadIntoError>
    where
        C::Record: Default,
    {
        if count > buffer.len() {
            return Err(ReadIntoError::Caller(CallerError::BufferTooSmall {
                requested: count,
                capacity: buffer.len(),
            }));
        }
        for slot in buffer.iter_mut().take(count) {
            *slot = self.read(consumer)?;
        }
        Ok(())
    }

    fn flush_pending<C: RecordConsumer>(&mut self, consumer: &mut C) {
        if let Some((field, index)) = self.pending_end_field.take() {
            consumer.end_field(&field, index);
        }
    }

    fn emit_start_field<C: RecordConsumer>(&mut self, consumer: &mut C, field: &str, index: usize) {
        if self.config.peephole_enabled() {
            if let Some((pending_field, pending_index)) = &self.pending_end_field {
                if pending_field == field && *pending_index == index {
                    self.pending_end_field = None;
                    return;
                }
            }
        }
        self.flush_pending(consumer);
        consumer.start_field(field, index);
    }

    fn emit_end_field<C: RecordConsumer>(&mut self, consumer: &mut C, field: &str, index: usize) {
        self.flush_pending(consumer);
        if self.config.peephole_enabled() {
            self.pending_end_field = Some((field.to_string(), index));
        } else {
            consumer.end_field(field, index);
        }
    }

    fn emit_start_group<C: RecordConsumer>(&mut self, consumer: &mut C) {
        self.flush_pending(consumer);
        consumer.start_group();
    }

    fn emit_end_group<C: RecordConsumer>(&mut self, consumer: &mut C) {
        self.flush_pending(consumer);
        consumer.end_group();
    }
}
