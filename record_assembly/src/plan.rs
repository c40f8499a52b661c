//! Assembly-plan builder: turns an ordered list of leaves into the
//! immutable automaton described in the data model (states, case tables).

use crate::case::CasePool;
use crate::error::PlanError;
use crate::schema::{common_prefix_len, LeafColumn};
use crate::state::State;

/// The immutable, read-only-after-construction automaton over a schema's
/// leaf columns. Built once; safe to share across any number of parallel
/// record streams.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    states: Vec<State>,
}

/// Computes one leaf's `definitionLevelToDepth` table (Step B), checking
/// monotonicity and the `field_path.len() - 2` bound as it goes.
///
/// The post-condition re-checks the same two properties the loop above
/// already enforces via its early `Err` returns; `contracts` makes that
/// redundancy explicit at the function boundary instead of leaving it
/// implicit in the loop body.
#[contracts::debug_ensures(ret.is_err() || {
    let table = ret.as_ref().unwrap();
    let bound = leaf.field_path().len() as i32 - 2;
    table.iter().all(|&v| v <= bound) && table.windows(2).all(|w| w[0] <= w[1])
})]
fn definition_level_to_depth_for_leaf<L: LeafColumn>(
    leaf_index: usize,
    leaf: &L,
) -> Result<Vec<i32>, PlanError> {
    let max_def = leaf.max_def();
    let ancestor_count = leaf.field_path().len() - 1;
    let bound = leaf.field_path().len() as i32 - 2;

    let mut table = Vec::with_capacity(max_def as usize + 1);
    let mut depth: usize = 0;
    let mut prev = -1i32;
    for d in 0..=max_def {
        while depth < ancestor_count && leaf.definition_level_of_ancestor(depth) < d {
            depth += 1;
        }
        let value = depth as i32 - 1;
        if value < prev || value > bound {
            return Err(PlanError::BadDefinitionLevelToDepth {
                leaf_index,
                field_path: leaf.field_path().to_vec(),
                d,
                depth: value,
                bound,
            });
        }
        prev = value;
        table.push(value);
    }
    Ok(table)
}

impl Plan {
    /// Builds the plan from an ordered list of leaves (document order).
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] if any sanity check in steps A/B fails. These
    /// are programming errors in the caller's schema, not recoverable
    /// runtime conditions.
    #[contracts::debug_ensures(ret.is_err() || ret.as_ref().unwrap().states.iter().all(|s| {
        s.next_level.iter().all(|&l| l <= s.field_path.len() - 1)
    }))]
    pub fn build<L: LeafColumn>(leaves: &[L]) -> Result<Self, PlanError> {
        if leaves.is_empty() {
            return Err(PlanError::NoLeaves);
        }
        let n = leaves.len();

        // --- Step A: transition targets -----------------------------------
        let max_rep_overall = leaves.iter().map(LeafColumn::max_rep).max().unwrap_or(0);
        let mut firsts: Vec<usize> = vec![0; max_rep_overall as usize + 1];
        let mut next_reader: Vec<Vec<usize>> = Vec::with_capacity(n);
        let mut next_level_table: Vec<Vec<usize>> = Vec::with_capacity(n);

        for (i, leaf) in leaves.iter().enumerate() {
            let max_rep = leaf.max_rep();
            let mut readers_for_leaf = Vec::with_capacity(max_rep as usize + 1);
            let mut levels_for_leaf = Vec::with_capacity(max_rep as usize + 1);

            for r in 0..=max_rep {
                if leaf.is_first(r) {
                    firsts[r as usize] = i;
                }

                let next = if r == 0 {
                    i + 1
                } else if leaf.is_last(r) {
                    firsts[r as usize]
                } else {
                    i + 1
                };

                let next_level = if next == n {
                    0
                } else if leaf.is_last(r) {
                    leaf.parent_field_path_len(r).saturating_sub(1)
                } else {
                    common_prefix_len(leaf.field_path(), leaves[next].field_path())
                };

                let max_depth = leaf.field_path().len() - 1;
                if next_level > max_depth {
                    return Err(PlanError::NextLevelExceedsDepth {
                        leaf_index: i,
                        field_path: leaf.field_path().to_vec(),
                        next_level,
                        max_depth,
                    });
                }

                readers_for_leaf.push(next);
                levels_for_leaf.push(next_level);
            }

            next_reader.push(readers_for_leaf);
            next_level_table.push(levels_for_leaf);
        }

        // --- Step B: definition-level-to-depth -----------------------------
        let mut definition_level_to_depth: Vec<Vec<i32>> = Vec::with_capacity(n);
        for (i, leaf) in leaves.iter().enumerate() {
            let table = definition_level_to_depth_for_leaf(i, leaf)?;
            definition_level_to_depth.push(table);
        }

        // --- Step C: state linkage (ids only; sink = n) ---------------------
        // `next_reader[i][r]` already holds the target leaf index, or `n`
        // for the sink; no further translation needed, states are
        // addressed by the same integer ids as leaves.

        // --- Step D: case table ----------------------------------------------
        let mut states = Vec::with_capacity(n);
        for (i, leaf) in leaves.iter().enumerate() {
            let field_path = leaf.field_path().to_vec();
            let index_path = leaf.index_path().to_vec();
            let max_def = leaf.max_def();
            let max_rep = leaf.max_rep();
            let ddt = &definition_level_to_depth[i];
            let next_level = &next_level_table[i];
            let next_state = &next_reader[i];

            let mut defined_pool = CasePool::default();
            let mut undefined_pool = CasePool::default();
            let mut case_lookup: Vec<Vec<Vec<u32>>> =
                vec![vec![vec![0u32; max_rep as usize + 1]; max_def as usize + 1]; field_path.len()];

            for current_level in 0..field_path.len() {
                for d in 0..=max_def {
                    let case_depth = ddt[d as usize].max(current_level as i32 - 1);
                    for r in 0..=max_rep {
                        let case_next_level =
                            next_level[r as usize].min((case_depth + 1) as usize);
                        let next_state_id =
                            u32::try_from(next_state[r as usize]).expect("state count fits u32");
                        let pool = if d == max_def {
                            &mut defined_pool
                        } else {
                            &mut undefined_pool
                        };
                        let case_id = pool.intern(
                            u16::try_from(current_level).expect("tree depth fits u16"),
                            case_depth,
                            u16::try_from(case_next_level).expect("tree depth fits u16"),
                            next_state_id,
                        );
                        case_lookup[current_level][d as usize][r as usize] = case_id;
                    }
                }
            }

            states.push(State {
                id: i,
                field_path,
                index_path,
                max_def,
                max_rep,
                primitive_kind: leaf.primitive_kind(),
                definition_level_to_depth: ddt.clone(),
                next_state: next_state.clone(),
                next_level: next_level.clone(),
                case_lookup,
                defined_cases: defined_pool.into_sorted_cases(),
                undefined_cases: undefined_pool.into_sorted_cases(),
            });
        }

        tracing::debug!(state_count = states.len(), "assembly plan built");
        Ok(Self { states })
    }

    /// Number of states (leaves) in the plan. The sink sentinel id is this
    /// value.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Borrows the state with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id >= state_count()` (the sink has no `State`).
    #[must_use]
    pub fn state(&self, id: usize) -> &State {
        &self.states[id]
    }

    /// `nextState[r]` for the given state, as an id (`state_count()` for
    /// the sink). Introspection helper for tests/tools.
    #[must_use]
    pub fn next_reader_id(&self, state_id: usize, r: u8) -> usize {
        self.states[state_id].next_state[r as usize]
    }

    /// `nextLevel[r]` for the given state. Introspection API for
    /// tests/tools.
    #[must_use]
    pub fn next_level(&self, state_id: usize, r: u8) -> usize {
        self.states[state_id].next_level[r as usize]
    }

    /// Human-readable dump of every state's tables, emitted through
    /// `tracing` rather than returned as a new external surface over
    /// already-specified introspection data.
    pub fn describe(&self) {
        for state in &self.states {
            tracing::debug!(
                state_id = state.id,
                field_path = ?state.field_path,
                definition_level_to_depth = ?state.definition_level_to_depth,
                next_state = ?state.next_state,
                next_level = ?state.next_level,
                "assembly state"
            );
        }
    }
}
