/// The answer to a completed search.
///
/// A search that covered every element without a match is `NotFound`, not an
/// error. Configuration and resource failures are reported separately as
/// [`ParfindError`](crate::ParfindError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    /// Index of the first occurrence of the target.
    Found(usize),

    /// The target does not occur anywhere in the input.
    NotFound,
}

impl SearchOutcome {
    /// The matching index, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Found(i) => Some(i),
            Self::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// The output of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// First occurrence of the target, or `NotFound`.
    pub outcome: SearchOutcome,

    /// Per-search scan counters.
    pub stats: ScanStats,
}

/// How much work the workers did.
///
/// Purely diagnostic: under the shared strategy these numbers depend on
/// thread scheduling and vary between runs, while `outcome` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanStats {
    /// Number of worker threads that took part.
    pub workers: usize,

    /// Total elements compared against the target across all workers.
    pub scanned: usize,

    /// Workers that stopped early because a lower match was already known.
    pub pruned_workers: usize,
}
