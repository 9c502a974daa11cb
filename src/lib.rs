//! # parfind
//!
//! Parallel first-occurrence search over large read-only slices.
//!
//! The input is split into one contiguous partition per worker thread. All
//! workers are released together, scan their partitions, and the lowest
//! matching index across all of them is returned. Two reconciliation
//! strategies are available:
//!
//! - [`Strategy::Shared`] (default): workers publish matches to a shared best
//!   index and abandon their partition as soon as it cannot contain a better
//!   answer.
//! - [`Strategy::Join`]: workers scan independently and the minimum is taken
//!   after all of them have joined.
//!
//! # Quick Start
//!
//! ```rust
//! use parfind::SearchOutcome;
//!
//! let data = [0, 0, 0, 7, 0, 0, 7, 0];
//!
//! assert_eq!(parfind::find_first(&data, &7, 3).unwrap(), SearchOutcome::Found(3));
//! assert_eq!(parfind::find_first(&data, &5, 3).unwrap(), SearchOutcome::NotFound);
//! assert!(parfind::find_first(&data, &7, 9).unwrap_err().is_configuration());
//! ```
//!
//! For control over the strategy or worker stack size, use [`search()`]:
//!
//! ```rust
//! use parfind::Strategy;
//!
//! let data: Vec<u32> = (0..10_000).collect();
//! let report = parfind::search(&data, 9_999)
//!     .threads(4)
//!     .strategy(Strategy::Join)
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(report.outcome.index(), Some(9_999));
//! assert_eq!(report.stats.workers, 4);
//! ```

#![forbid(unsafe_code)]

mod builder;
mod coordinator;
mod engine;
mod error;
mod partition;
mod results;
mod worker;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::SearchBuilder;
pub use engine::Strategy;
pub use error::ParfindError;
pub use partition::{Partition, partition};
pub use results::{ScanStats, SearchOutcome, SearchReport};

// ── Entry points ──────────────────────────────────────────────────────────────

/// Create a new [`SearchBuilder`] to configure and run a search.
///
/// # Example
///
/// ```rust
/// let data = [3, 1, 4, 1, 5, 9, 2, 6];
///
/// let report = parfind::search(&data, 1).threads(2).run().unwrap();
/// assert_eq!(report.outcome.index(), Some(1));
/// ```
pub fn search<T>(haystack: &[T], target: T) -> SearchBuilder<'_, T>
where
    T: PartialEq + Sync,
{
    SearchBuilder::new(haystack, target)
}

/// Find the first index of `target` in `haystack` using exactly `threads`
/// workers and the shared (early-terminating) strategy.
///
/// # Errors
///
/// [`ParfindError::InvalidThreadCount`] if `threads` is zero or exceeds
/// `haystack.len()`; [`ParfindError::ThreadSpawn`] if a worker thread could
/// not be created.
pub fn find_first<T>(haystack: &[T], target: &T, threads: usize) -> Result<SearchOutcome, ParfindError>
where
    T: PartialEq + Sync,
{
    let opts = engine::EngineOptions {
        threads,
        strategy:   Strategy::Shared,
        stack_size: None,
    };

    engine::run(haystack, target, &opts).map(|report| report.outcome)
}
