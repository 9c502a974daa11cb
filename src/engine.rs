use tracing::debug;

use crate::coordinator;
use crate::error::ParfindError;
use crate::partition::partition;
use crate::results::{ScanStats, SearchReport};

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// How candidate indices from different workers are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Every worker scans its partition independently and returns its own
    /// first match. The lowest one wins once all workers have finished.
    Join,

    /// Workers publish matches to a single shared best index and stop as soon
    /// as nothing left in their partition could beat it.
    #[default]
    Shared,
}

// ---------------------------------------------------------------------------
// EngineOptions
// ---------------------------------------------------------------------------

/// Execution parameters passed from the builder to the engine.
///
/// `pub(crate)` — callers configure these via the builder methods
/// (`.threads()`, `.strategy()`, `.stack_size()`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct EngineOptions {
    pub threads:    usize,
    pub strategy:   Strategy,
    pub stack_size: Option<usize>,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Search `haystack` for the first occurrence of `target`.
///
/// Validates the thread count before anything is spawned, then hands the
/// partitions to the coordinator. Holds no state between calls.
pub(crate) fn run<T>(haystack: &[T], target: &T, opts: &EngineOptions) -> Result<SearchReport, ParfindError>
where
    T: PartialEq + Sync,
{
    let partitions = partition(haystack.len(), opts.threads)?;

    debug!(
        len = haystack.len(),
        threads = opts.threads,
        strategy = ?opts.strategy,
        "starting search"
    );

    let round = coordinator::run(haystack, target, &partitions, opts.strategy, opts.stack_size)?;

    let stats = ScanStats {
        workers:        round.reports.len(),
        scanned:        round.reports.iter().map(|r| r.scanned).sum(),
        pruned_workers: round.reports.iter().filter(|r| r.pruned).count(),
    };

    debug!(
        outcome = ?round.outcome,
        scanned = stats.scanned,
        pruned_workers = stats.pruned_workers,
        "search finished"
    );

    Ok(SearchReport {
        outcome: round.outcome,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::SearchOutcome;

    fn opts(threads: usize, strategy: Strategy) -> EngineOptions {
        EngineOptions { threads, strategy, stack_size: None }
    }

    #[test]
    fn join_strategy_scans_without_pruning() {
        let data = [0, 0, 0, 0, 0, 0, 0, 0];
        let report = run(&data, &7, &opts(4, Strategy::Join)).unwrap();

        assert_eq!(report.outcome, SearchOutcome::NotFound);
        assert_eq!(report.stats.workers, 4);
        assert_eq!(report.stats.scanned, 8);
        assert_eq!(report.stats.pruned_workers, 0);
    }

    #[test]
    fn match_at_index_zero_stops_every_shared_worker_early() {
        let mut data = vec![1u32; 4_000];
        data[0] = 9;

        let report = run(&data, &9, &opts(4, Strategy::Shared)).unwrap();
        assert_eq!(report.outcome, SearchOutcome::Found(0));
        assert!(report.stats.scanned <= data.len());
    }

    #[test]
    fn invalid_thread_count_is_rejected_up_front() {
        let err = run(&[1, 2, 3], &2, &opts(4, Strategy::Shared)).unwrap_err();
        assert!(err.is_configuration());
    }
}
