//! Error types for plan construction and record assembly.
//!
//! Mirrors the split used throughout the rest of this workspace: one
//! `thiserror` enum per error kind from the design, rather than a single
//! catch-all. Most errors should occur at plan-build time (kind 1 below)
//! rather than on the per-record hot path.

use thiserror::Error;

/// Programming/plan errors: an inconsistent schema input was fed to
/// [`crate::plan::Plan::build`]. Fatal; there is no recovery path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// Step A computed a `nextLevel` deeper than the leaf's own field path
    /// allows.
    #[error(
        "leaf {leaf_index} ({field_path:?}): computed next_level {next_level} exceeds max depth {max_depth}"
    )]
    NextLevelExceedsDepth {
        leaf_index: usize,
        field_path: Vec<String>,
        next_level: usize,
        max_depth: usize,
    },

    /// `definitionLevelToDepth` is not monotone non-decreasing in `d`, or
    /// exceeds the bound of `field_path.len() - 2`.
    #[error(
        "leaf {leaf_index} ({field_path:?}): definition_level_to_depth[{d}] = {depth} violates monotonicity or bound {bound}"
    )]
    BadDefinitionLevelToDepth {
        leaf_index: usize,
        field_path: Vec<String>,
        d: u8,
        depth: i32,
        bound: i32,
    },

    /// The leaf list was empty; a plan needs at least one leaf to assemble
    /// anything.
    #[error("cannot build a plan from zero leaves")]
    NoLeaves,
}

/// Caller errors: a misuse of the reader-facing API that is reported
/// synchronously without mutating any state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallerError {
    /// `read_into(buffer, count)` was called with `count > buffer.len()`.
    #[error("requested {requested} records but buffer only holds {capacity}")]
    BufferTooSmall { requested: usize, capacity: usize },
}

/// Errors reachable while driving the assembly loop for a single record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// The column readers report no more data: this is a terminal
    /// condition, not a successful empty record.
    #[error("column stream exhausted: no further records to assemble")]
    StreamExhausted,

    /// A [`crate::validator::ValidatingConsumer`] observed a callback that
    /// violates the schema's structural grammar.
    #[error("schema violation: {0}")]
    SchemaViolation(String),
}

/// Combined error surfaced from `read_into`, which can fail either because
/// of caller misuse or because assembly itself hit a terminal condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadIntoError {
    #[error(transparent)]
    Caller(#[from] CallerError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}
