use crate::coordinator::SharedBest;
use crate::partition::Partition;

/// What a single worker observed while scanning its partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkerReport {
    pub partition: Partition,

    /// Lowest matching index inside `partition`, if the worker reached one.
    pub found: Option<usize>,

    /// Number of elements compared against the target.
    pub scanned: usize,

    /// The worker stopped because a better answer was already known.
    pub pruned: bool,
}

impl WorkerReport {
    /// Report for a worker that was released without scanning.
    pub(crate) fn idle(partition: Partition) -> Self {
        Self { partition, found: None, scanned: 0, pruned: false }
    }
}

/// Scan `partition` in ascending order and return the first match.
pub(crate) fn scan<T: PartialEq>(haystack: &[T], target: &T, partition: Partition) -> WorkerReport {
    let slice = haystack.get(partition.range()).unwrap_or_default();

    match slice.iter().position(|item| item == target) {
        Some(offset) => WorkerReport {
            partition,
            found:   Some(partition.start + offset),
            scanned: offset + 1,
            pruned:  false,
        },
        None => WorkerReport {
            partition,
            found:   None,
            scanned: slice.len(),
            pruned:  false,
        },
    }
}

/// Scan `partition` while consulting `best` to stop early.
///
/// Before each comparison the worker checks whether some match at or below
/// the current index is already known; if so nothing in the rest of this
/// partition can win and the worker returns without reporting. A match is
/// offered to `best`, which keeps it only if it is strictly lower.
///
/// The early-exit check reads a possibly stale value. That can only make
/// the worker scan more than needed, never report a worse answer, because
/// the final result is read from `best` after every worker has joined.
pub(crate) fn scan_pruned<T: PartialEq>(
    haystack:  &[T],
    target:    &T,
    partition: Partition,
    best:      &SharedBest,
) -> WorkerReport {
    let slice = haystack.get(partition.range()).unwrap_or_default();

    for (offset, item) in slice.iter().enumerate() {
        let index = partition.start + offset;

        if best.peek() <= index {
            return WorkerReport { partition, found: None, scanned: offset, pruned: true };
        }

        if item == target {
            best.offer(index);
            return WorkerReport {
                partition,
                found:   Some(index),
                scanned: offset + 1,
                pruned:  false,
            };
        }
    }

    WorkerReport { partition, found: None, scanned: slice.len(), pruned: false }
}
