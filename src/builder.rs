use crate::engine::{EngineOptions, Strategy, run};
use crate::error::ParfindError;
use crate::results::SearchReport;

// ---------------------------------------------------------------------------
// SearchBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a parallel search.
///
/// Created via [`parfind::search()`](crate::search). Configure with chained
/// builder methods, then call [`run()`](SearchBuilder::run) to execute.
///
/// # Example
///
/// ```rust
/// use parfind::{SearchOutcome, Strategy};
///
/// let data = [0, 0, 0, 7, 0, 0, 7, 0];
/// let report = parfind::search(&data, 7)
///     .threads(3)
///     .strategy(Strategy::Join)
///     .run()
///     .unwrap();
///
/// assert_eq!(report.outcome, SearchOutcome::Found(3));
/// ```
#[derive(Debug)]
pub struct SearchBuilder<'a, T> {
    haystack:   &'a [T],
    target:     T,
    threads:    Option<usize>,
    strategy:   Strategy,
    stack_size: Option<usize>,
}

impl<'a, T> SearchBuilder<'a, T>
where
    T: PartialEq + Sync,
{
    pub(crate) fn new(haystack: &'a [T], target: T) -> Self {
        Self {
            haystack,
            target,
            threads:    None,
            strategy:   Strategy::default(),
            stack_size: None,
        }
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Number of worker threads, one per partition.
    ///
    /// Must be between 1 and the input length; anything else makes
    /// [`run()`](Self::run) fail with [`ParfindError::InvalidThreadCount`].
    /// Defaults to the number of logical CPU cores, capped at the input
    /// length.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    /// How results from different workers are reconciled.
    ///
    /// Defaults to [`Strategy::Shared`], which lets workers stop early.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Stack size in bytes for each worker thread. Platform default if unset.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the search and return the report.
    ///
    /// Blocks until every worker thread has finished. No thread outlives
    /// this call, including on the error path.
    ///
    /// # Errors
    ///
    /// [`ParfindError::InvalidThreadCount`] for a thread count outside
    /// `1..=len` (including any search over an empty slice), and
    /// [`ParfindError::ThreadSpawn`] if the OS refuses to create a worker.
    pub fn run(self) -> Result<SearchReport, ParfindError> {
        let threads = self
            .threads
            .unwrap_or_else(|| num_cpus().min(self.haystack.len()).max(1));

        let opts = EngineOptions {
            threads,
            strategy:   self.strategy,
            stack_size: self.stack_size,
        };

        run(self.haystack, &self.target, &opts)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
