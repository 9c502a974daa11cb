use std::ops::Range;

use crate::error::ParfindError;

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// A contiguous, half-open index range assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// First index in the range.
    pub start: usize,

    /// One past the last index in the range.
    pub end: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }
}

// ---------------------------------------------------------------------------
// partition()
// ---------------------------------------------------------------------------

/// Split `len` elements into `threads` contiguous partitions.
///
/// Sizes differ by at most one: the first `len % threads` partitions get the
/// extra element. Together the partitions cover `0..len` exactly once, in
/// ascending order.
///
/// # Errors
///
/// [`ParfindError::InvalidThreadCount`] when `threads` is zero or larger than
/// `len`. An empty input can therefore never be partitioned.
pub fn partition(len: usize, threads: usize) -> Result<Vec<Partition>, ParfindError> {
    if threads == 0 || threads > len {
        return Err(ParfindError::InvalidThreadCount { threads, len });
    }

    let portion   = len / threads;
    let remainder = len % threads;

    let partitions = (0..threads)
        .map(|i| {
            if i < remainder {
                let start = i * (portion + 1);
                Partition { start, end: start + portion + 1 }
            } else {
                let start = remainder * (portion + 1) + (i - remainder) * portion;
                Partition { start, end: start + portion }
            }
        })
        .collect();

    Ok(partitions)
}
