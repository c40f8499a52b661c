//! Per-state-transition visit counters, gated behind the `profiling`
//! feature as an enabled/disabled module-swap pair so the counting has
//! zero cost when the feature is off.

#[cfg(feature = "profiling")]
mod enabled {
    use std::sync::OnceLock;

    use indexmap::IndexMap;
    use std::sync::Mutex;

    static VISITS: OnceLock<Mutex<IndexMap<usize, u64>>> = OnceLock::new();

    fn visits() -> &'static Mutex<IndexMap<usize, u64>> {
        VISITS.get_or_init(|| Mutex::new(IndexMap::new()))
    }

    /// Records a transition into `state_id`.
    pub fn record_state_visit(state_id: usize) {
        let mut map = visits().lock().expect("profiling mutex poisoned");
        *map.entry(state_id).or_insert(0) += 1;
    }

    /// Emits a `tracing::info!` line per visited state, sorted by state id.
    pub fn report() {
        let map = visits().lock().expect("profiling mutex poisoned");
        let mut rows: Vec<(usize, u64)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        rows.sort_by_key(|(state_id, _)| *state_id);
        for (state_id, count) in rows {
            tracing::info!(state_id, count, "assembly state visits");
        }
    }
}

#[cfg(not(feature = "profiling"))]
mod disabled {
    #[inline]
    pub fn record_state_visit(_state_id: usize) {}

    #[inline]
    pub fn report() {}
}

#[cfg(feature = "profiling")]
pub use enabled::{record_state_visit, report};

#[cfg(not(feature = "profiling"))]
pub use disabled::{record_state_visit, report};
