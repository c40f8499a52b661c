//! Hash-consed open/close [`Case`]s, per state.
//!
//! A `Case` is value-typed: identity for de-duplication is the 4-tuple
//! `(start_level, depth, next_level, next_state_id)`. Implementations must
//! provide a content-addressed lookup keyed on that tuple, but the
//! construction-time map itself is not retained; only the de-duplicated,
//! id-sorted pool and the 3-D `case_lookup` table survive into the plan.

use indexmap::IndexMap;

/// A precomputed open/close plan for one `(state, current_level, d, r)`
/// triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Case {
    /// Stable small-integer id, assigned in insertion order within the
    /// state's `defined_cases` or `undefined_cases` pool.
    pub id: u32,
    /// Tree level at entry.
    pub start_level: u16,
    /// Depth to which groups will be open after the opens
    /// (`-1` encoded as `i16::MIN`-free: depths are always `>= -1`, so we
    /// use `i32` to keep the sentinel obvious at call sites).
    pub depth: i32,
    /// Tree depth after the closes.
    pub next_level: u16,
    /// Id of the state (or the sink sentinel `state_count`) to transition
    /// to.
    pub next_state_id: u32,
}

impl Case {
    /// `true` when entry level is at or above the depth the opens will
    /// reach, i.e. this case does not need to open any new groups.
    ///
    /// An earlier design considered folding `going_up`/`going_down` into a
    /// coarser equality (cases with the same effective open/close behavior
    /// treated as one, even if their raw 4-tuples differ) and hash-consing
    /// on that instead. This crate never does so: `CasePool::intern` keys
    /// strictly on the 4-tuple, and these predicates stay derived, read-only
    /// views for callers, not an alternate identity.
    #[must_use]
    pub const fn going_up(&self) -> bool {
        (self.start_level as i32) <= self.depth
    }

    /// `true` when the depth reached after opens is deeper than
    /// `next_level`, i.e. this case must close at least one group. See
    /// [`Self::going_up`] for why this stays a derived view rather than a
    /// coarser `Case` identity.
    #[must_use]
    pub const fn going_down(&self) -> bool {
        self.depth + 1 > self.next_level as i32
    }
}

/// Hash-consing pool used only during plan construction. Not retained in
/// the built [`crate::plan::Plan`]; only `cases` (sorted by id) and
/// whatever 3-D lookup table the caller populates alongside it survive.
#[derive(Default)]
pub(crate) struct CasePool {
    by_key: IndexMap<(u16, i32, u16, u32), u32>,
    cases: Vec<Case>,
}

impl CasePool {
    /// Interns a case by its 4-tuple identity, returning the canonical id
    /// (assigned in first-insertion order).
    #[contracts::debug_ensures(self.by_key.len() == self.cases.len())]
    #[contracts::debug_ensures({
        let c = &self.cases[ret as usize];
        c.start_level == start_level && c.depth == depth && c.next_level == next_level && c.next_state_id == next_state_id
    })]
    pub(crate) fn intern(
        &mut self,
        start_level: u16,
        depth: i32,
        next_level: u16,
        next_state_id: u32,
    ) -> u32 {
        let key = (start_level, depth, next_level, next_state_id);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = u32::try_from(self.cases.len()).expect("case count fits in u32");
        self.cases.push(Case {
            id,
            start_level,
            depth,
            next_level,
            next_state_id,
        });
        self.by_key.insert(key, id);
        id
    }

    /// Consumes the pool, returning the de-duplicated cases sorted
    /// ascending by id (a no-op reorder given insertion-order ids, kept
    /// explicit to mirror the construction algorithm's stated steps).
    pub(crate) fn into_sorted_cases(self) -> Vec<Case> {
        let mut cases = self.cases;
        cases.sort_by_key(|c| c.id);
        cases
    }
}
