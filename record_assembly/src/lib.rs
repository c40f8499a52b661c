//! Record assembly core for a columnar storage system modeled on the
//! Dremel striping/assembly algorithm.
//!
//! Given a schema (modeled as an ordered list of [`schema::LeafColumn`]s)
//! and a set of [`column::ColumnReader`]s that each yield
//! `(value, repetition-level, definition-level)` triples in record order,
//! [`plan::Plan::build`] precomputes a deterministic finite automaton over
//! the leaf columns plus a per-state case table, and
//! [`assembly::AssemblyReader`] drives that automaton to reconstruct
//! nested records, emitting a structured event stream to a
//! [`consumer::RecordConsumer`].
//!
//! The schema tree, the column I/O tree built from it, per-column decoded
//! value readers, and the downstream materializer are external
//! collaborators, modeled here only by the traits in [`schema`] and
//! [`column`] plus the [`consumer::RecordConsumer`] sink.

pub mod assembly;
pub mod case;
pub mod column;
pub mod config;
pub mod consumer;
pub mod error;
pub mod plan;
pub mod primitive;
pub mod profiling;
pub mod schema;
pub mod state;
pub mod tracer;
pub mod validator;

#[cfg(test)]
mod test_fixtures;

pub use assembly::AssemblyReader;
pub use case::Case;
pub use column::ColumnReader;
pub use config::{AssemblyConfig, AssemblyConfigBuilder};
pub use consumer::RecordConsumer;
pub use error::{AssemblyError, CallerError, PlanError, ReadIntoError};
pub use plan::Plan;
pub use primitive::{PrimitiveKind, PrimitiveValue};
pub use schema::LeafColumn;
pub use state::State;
pub use tracer::TracingConsumer;
pub use validator::{SchemaOutline, ValidatingConsumer};
