//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every flag is additionally gated by `cfg(debug_assertions)`
//! at the call site.

pub struct DebugFlags {
    /// Emit the rank range and starting combination of every worker slice.
    pub print_partition_slices: bool,
    /// Emit per-worker visited/pruned counters once the slice is finished.
    pub print_worker_stats: bool,
    /// Emit a line for every feasible combination a worker accepts (very noisy).
    pub print_accepted_combinations: bool,
    /// Emit which outcome templates survived the filter and reachability checks.
    pub print_outcome_reachability: bool,
    /// Emit engine command/outcome traffic (submit, cancel, finished).
    pub print_engine_events: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_partition_slices: false,
    print_worker_stats: false,
    print_accepted_combinations: false,
    print_outcome_reachability: false,
    print_engine_events: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn test_diagnostics_are_off_by_default() {
        assert!(!DEBUG_FLAGS.print_partition_slices);
        assert!(!DEBUG_FLAGS.print_worker_stats);
        assert!(!DEBUG_FLAGS.print_accepted_combinations);
        assert!(!DEBUG_FLAGS.print_outcome_reachability);
        assert!(!DEBUG_FLAGS.print_engine_events);
    }
}
