use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ScopedJoinHandle};

use parking_lot::{Condvar, Mutex};
use tracing::{trace, warn};

use crate::engine::Strategy;
use crate::error::ParfindError;
use crate::partition::Partition;
use crate::results::SearchOutcome;
use crate::worker::{self, WorkerReport};

// ---------------------------------------------------------------------------
// SharedBest
// ---------------------------------------------------------------------------

const UNSET: usize = usize::MAX;

/// The best (lowest) matching index published so far by any worker.
///
/// Writers serialize on `writer` and only ever lower the value. Readers on
/// the scan path use a relaxed load and accept staleness; the authoritative
/// read happens through [`get`](Self::get) after every worker has joined.
#[derive(Debug)]
pub(crate) struct SharedBest {
    value:  AtomicUsize,
    writer: Mutex<()>,
}

impl SharedBest {
    pub(crate) fn new() -> Self {
        Self {
            value:  AtomicUsize::new(UNSET),
            writer: Mutex::new(()),
        }
    }

    /// Unsynchronized view of the current best, `usize::MAX` if unset.
    #[inline]
    pub(crate) fn peek(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }

    /// Publish `index` if it is strictly lower than the current best.
    ///
    /// Returns `true` when the value was replaced.
    pub(crate) fn offer(&self, index: usize) -> bool {
        let _guard = self.writer.lock();

        if index < self.value.load(Ordering::Relaxed) {
            self.value.store(index, Ordering::Release);
            true
        } else {
            false
        }
    }

    pub(crate) fn get(&self) -> Option<usize> {
        let value = self.value.load(Ordering::Acquire);
        (value != UNSET).then_some(value)
    }
}

// ---------------------------------------------------------------------------
// StartupGate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Waiting,
    Open,
    Aborted,
}

#[derive(Debug)]
struct GateInner {
    arrived: usize,
    state:   GateState,
}

/// One-shot rendezvous between `parties` workers and the coordinator.
///
/// Workers [`arrive`](Self::arrive) and block. The coordinator either
/// [`open`](Self::open)s the gate once every worker has arrived, releasing
/// them together, or [`abort`](Self::abort)s it, releasing whoever is waiting
/// with instructions not to scan.
#[derive(Debug)]
pub(crate) struct StartupGate {
    parties:     usize,
    inner:       Mutex<GateInner>,
    all_arrived: Condvar,
    released:    Condvar,
}

impl StartupGate {
    pub(crate) fn new(parties: usize) -> Self {
        Self {
            parties,
            inner: Mutex::new(GateInner {
                arrived: 0,
                state:   GateState::Waiting,
            }),
            all_arrived: Condvar::new(),
            released:    Condvar::new(),
        }
    }

    /// Block until the coordinator decides. Returns `true` if the caller
    /// should go ahead and scan.
    pub(crate) fn arrive(&self) -> bool {
        let mut inner = self.inner.lock();
        inner.arrived += 1;

        if inner.arrived == self.parties {
            self.all_arrived.notify_one();
        }

        while inner.state == GateState::Waiting {
            self.released.wait(&mut inner);
        }

        inner.state == GateState::Open
    }

    /// Wait for every worker to arrive, then release them all.
    pub(crate) fn open(&self) {
        let mut inner = self.inner.lock();

        while inner.arrived < self.parties && inner.state == GateState::Waiting {
            self.all_arrived.wait(&mut inner);
        }

        if inner.state == GateState::Waiting {
            inner.state = GateState::Open;
        }
        self.released.notify_all();
    }

    /// Release every waiting (and future) arrival without letting it scan.
    pub(crate) fn abort(&self) {
        let mut inner = self.inner.lock();
        inner.state = GateState::Aborted;
        self.released.notify_all();
        self.all_arrived.notify_all();
    }
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Everything a worker needs, owned once by the coordinator and borrowed by
/// every worker thread for the lifetime of the search scope.
struct SearchContext<'a, T> {
    haystack: &'a [T],
    target:   &'a T,
    strategy: Strategy,
    gate:     StartupGate,
    best:     SharedBest,
}

/// Result of a completed coordination round.
#[derive(Debug)]
pub(crate) struct Reconciled {
    pub outcome: SearchOutcome,
    pub reports: Vec<WorkerReport>,
}

/// Spawn one worker per partition, release them together, and reconcile
/// their findings once all of them have joined.
///
/// Workers are scoped threads: none of them can outlive this call, which is
/// what lets them borrow `haystack` and the shared context directly. If a
/// spawn fails, the gate is aborted so the workers already started return
/// without scanning, they are joined, and the failure is returned.
pub(crate) fn run<T>(
    haystack:   &[T],
    target:     &T,
    partitions: &[Partition],
    strategy:   Strategy,
    stack_size: Option<usize>,
) -> Result<Reconciled, ParfindError>
where
    T: PartialEq + Sync,
{
    let ctx = SearchContext {
        haystack,
        target,
        strategy,
        gate: StartupGate::new(partitions.len()),
        best: SharedBest::new(),
    };
    let ctx = &ctx;

    let reports = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(partitions.len());

        for (worker_index, &partition) in partitions.iter().enumerate() {
            let mut builder = thread::Builder::new().name(format!("parfind-w{worker_index}"));
            if let Some(bytes) = stack_size {
                builder = builder.stack_size(bytes);
            }

            match builder.spawn_scoped(scope, move || work(ctx, worker_index, partition)) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    warn!(
                        worker_index,
                        started = handles.len(),
                        error = %source,
                        "failed to spawn worker thread; unwinding search"
                    );
                    ctx.gate.abort();
                    join_all(handles);
                    return Err(ParfindError::ThreadSpawn { worker: worker_index, source });
                }
            }
        }

        ctx.gate.open();
        Ok(join_all(handles))
    })?;

    let outcome = reconcile(strategy, &reports, &ctx.best);
    Ok(Reconciled { outcome, reports })
}

fn work<T: PartialEq>(ctx: &SearchContext<'_, T>, worker_index: usize, partition: Partition) -> WorkerReport {
    if !ctx.gate.arrive() {
        trace!(worker_index, "released without scanning");
        return WorkerReport::idle(partition);
    }

    trace!(worker_index, start = partition.start, end = partition.end, "worker scanning");

    let report = match ctx.strategy {
        Strategy::Join   => worker::scan(ctx.haystack, ctx.target, partition),
        Strategy::Shared => worker::scan_pruned(ctx.haystack, ctx.target, partition, &ctx.best),
    };

    trace!(
        worker_index,
        found = ?report.found,
        scanned = report.scanned,
        pruned = report.pruned,
        "worker finished"
    );
    report
}

/// Join every handle, then re-raise the first worker panic if there was one.
fn join_all(handles: Vec<ScopedJoinHandle<'_, WorkerReport>>) -> Vec<WorkerReport> {
    let mut reports = Vec::with_capacity(handles.len());
    let mut first_panic = None;

    for handle in handles {
        match handle.join() {
            Ok(report) => reports.push(report),
            Err(payload) => {
                first_panic.get_or_insert(payload);
            }
        }
    }

    if let Some(payload) = first_panic {
        panic::resume_unwind(payload);
    }
    reports
}

fn reconcile(strategy: Strategy, reports: &[WorkerReport], best: &SharedBest) -> SearchOutcome {
    let index = match strategy {
        Strategy::Join   => reports.iter().filter_map(|r| r.found).min(),
        Strategy::Shared => best.get(),
    };

    index.map_or(SearchOutcome::NotFound, SearchOutcome::Found)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    use super::*;
    use crate::partition::partition;

    #[test]
    fn shared_best_only_moves_down() {
        let best = SharedBest::new();
        assert_eq!(best.get(), None);
        assert_eq!(best.peek(), usize::MAX);

        assert!(best.offer(10));
        assert!(best.offer(4));
        assert!(!best.offer(7));
        assert!(!best.offer(4));
        assert_eq!(best.get(), Some(4));
    }

    #[test]
    fn shared_best_concurrent_offers_keep_minimum() {
        let best = Arc::new(SharedBest::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let best = Arc::clone(&best);
                thread::spawn(move || {
                    for i in (t * 100..(t + 1) * 100).rev() {
                        best.offer(i + 5);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(best.get(), Some(5));
    }

    #[test]
    fn gate_holds_workers_until_opened() {
        let gate = Arc::new(StartupGate::new(3));
        let passed = Arc::new(AtomicBool::new(false));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let passed = Arc::clone(&passed);
                thread::spawn(move || {
                    let go = gate.arrive();
                    passed.store(true, Ordering::SeqCst);
                    go
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert!(!passed.load(Ordering::SeqCst), "no worker may pass a closed gate");

        gate.open();
        for h in handles {
            assert!(h.join().unwrap());
        }
    }

    #[test]
    fn aborted_gate_releases_without_scanning() {
        let gate = Arc::new(StartupGate::new(4));

        // Only two of four workers ever arrive, as after a failed spawn.
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let gate = Arc::clone(&gate);
                thread::spawn(move || gate.arrive())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        gate.abort();

        for h in handles {
            assert!(!h.join().unwrap());
        }
        assert!(!gate.arrive(), "late arrivals see the abort too");
    }

    #[test]
    fn both_strategies_agree_on_example() {
        let data = [0, 0, 0, 7, 0, 0, 7, 0];
        let parts = partition(data.len(), 3).unwrap();

        for strategy in [Strategy::Join, Strategy::Shared] {
            let result = run(&data, &7, &parts, strategy, None).unwrap();
            assert_eq!(result.outcome, SearchOutcome::Found(3), "{strategy:?}");
            assert_eq!(result.reports.len(), 3);
        }
    }

    #[test]
    fn join_strategy_reports_every_local_match() {
        let data = [0, 0, 0, 7, 0, 0, 7, 0];
        let parts = partition(data.len(), 3).unwrap();

        let result = run(&data, &7, &parts, Strategy::Join, None).unwrap();
        let found: Vec<_> = result.reports.iter().map(|r| r.found).collect();
        assert_eq!(found, vec![None, Some(3), Some(6)]);
        assert!(result.reports.iter().all(|r| !r.pruned));
    }

    #[test]
    fn reconcile_without_matches_is_not_found() {
        let best = SharedBest::new();
        let reports = [WorkerReport::idle(Partition { start: 0, end: 4 })];

        assert_eq!(reconcile(Strategy::Join, &reports, &best), SearchOutcome::NotFound);
        assert_eq!(reconcile(Strategy::Shared, &reports, &best), SearchOutcome::NotFound);
    }

    #[test]
    fn worker_panic_is_propagated_after_join() {
        #[derive(Debug)]
        struct Explosive(u8);

        impl PartialEq for Explosive {
            fn eq(&self, other: &Self) -> bool {
                assert!(self.0 != 13, "comparison blew up");
                self.0 == other.0
            }
        }

        let data: Vec<Explosive> = [1, 2, 13, 4].into_iter().map(Explosive).collect();
        let parts = partition(data.len(), 2).unwrap();

        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            run(&data, &Explosive(99), &parts, Strategy::Join, None)
        }));
        assert!(result.is_err());
    }
}
