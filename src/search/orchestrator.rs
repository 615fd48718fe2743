//! The frontier manager: the single owner of the edge set, the dedup set and bound updates.
//!
//! Each cycle: prune the over-bound tail, try to dispatch one state (skipping when the worker
//! input queue is full), drain everything the workers have produced without blocking, check
//! for termination, then re-sort the part of the frontier that will be consumed next.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{
    select, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::board::CompactState;
use crate::error::CoverageError;
use crate::search::counters::SearchCounters;
use crate::search::frontier::Frontier;
use crate::search::group::CancelToken;
use crate::search::reporter::{FrontierStats, Report};
use crate::search::worker::WorkerOutput;

/// How long in-flight results are drained after a deadline before workers are cancelled.
pub const DRAIN_WINDOW: Duration = Duration::from_millis(50);

/// Pause taken when a cycle neither dispatched nor ingested anything.
const IDLE_BACKOFF: Duration = Duration::from_micros(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Frontier and queues empty with nothing in flight.
    Exhausted,
    /// The configured deadline elapsed first.
    Deadline,
    /// Another task failed and cancelled the group.
    Cancelled,
}

/// What the frontier manager knows when it stops.
#[derive(Debug, Clone)]
pub struct ManagerSummary {
    pub termination: Termination,
    pub best: Option<CompactState>,
    /// Every value the bound was lowered to, in order.
    pub bound_history: Vec<u32>,
    pub seen: usize,
    pub frontier_left: usize,
}

enum Cycle {
    /// Something was dispatched or ingested.
    Busy,
    Idle,
    Done(Termination),
}

pub struct Orchestrator<'a> {
    frontier: Frontier,
    counters: &'a SearchCounters,
    cancel: &'a CancelToken,
    work_tx: Sender<CompactState>,
    /// Held only to discard queued work on a forced stop.
    work_rx: Receiver<CompactState>,
    results: Receiver<WorkerOutput>,
    report_tx: Sender<Report>,
    work_queue_capacity: usize,
    deadline: Option<Instant>,
    outstanding: usize,
    best: Option<CompactState>,
    bound_history: Vec<u32>,
}

impl<'a> Orchestrator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        root: CompactState,
        counters: &'a SearchCounters,
        cancel: &'a CancelToken,
        work_tx: Sender<CompactState>,
        work_rx: Receiver<CompactState>,
        results: Receiver<WorkerOutput>,
        report_tx: Sender<Report>,
        deadline: Option<Instant>,
    ) -> Self {
        let work_queue_capacity = work_tx.capacity().unwrap_or(0);
        Self {
            frontier: Frontier::seeded(root),
            counters,
            cancel,
            work_tx,
            work_rx,
            results,
            report_tx,
            work_queue_capacity,
            deadline,
            outstanding: 0,
            best: None,
            bound_history: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<ManagerSummary, CoverageError> {
        info!(
            "frontier manager started: bound {}, work queue {}",
            self.counters.bound(),
            self.work_queue_capacity
        );
        loop {
            if self.cancel.is_cancelled() {
                return Ok(self.summary(Termination::Cancelled));
            }
            match self.cycle()? {
                Cycle::Done(termination) => return Ok(self.shutdown(termination)),
                Cycle::Idle => thread::sleep(IDLE_BACKOFF),
                Cycle::Busy => {}
            }
        }
    }

    /// One prune, dispatch, ingest, terminate-check and re-sort pass.
    fn cycle(&mut self) -> Result<Cycle, CoverageError> {
        let pruned = self.frontier.prune_tail(self.counters.bound());
        if pruned > 0 {
            debug!("pruned {pruned} over-bound states");
        }
        let dispatched = self.dispatch()?;
        let mut bound_moved = false;
        let ingested = self.ingest(&mut bound_moved)?;

        if let Some(termination) = self.termination() {
            return Ok(Cycle::Done(termination));
        }

        self.frontier
            .sort_for_dispatch(ingested, self.work_queue_capacity, bound_moved);

        Ok(if !dispatched && ingested == 0 {
            Cycle::Idle
        } else {
            Cycle::Busy
        })
    }

    /// Hand the best frontier state to a worker if the input queue has room.
    fn dispatch(&mut self) -> Result<bool, CoverageError> {
        let Some(&next) = self.frontier.peek_next() else {
            return Ok(false);
        };
        match self.work_tx.try_send(next) {
            Ok(()) => {
                self.frontier.pop_next();
                self.outstanding += 1;
                self.counters.record_processed();
                // Sample for the reporter only if it is idle right now.
                let _ = self.report_tx.try_send(Report {
                    state: next,
                    stats: self.stats(),
                });
                Ok(true)
            }
            Err(TrySendError::Full(_)) => Ok(false),
            Err(TrySendError::Disconnected(_)) => {
                Err(CoverageError::QueueClosed { queue: "worker input" })
            }
        }
    }

    /// Drain every result currently available. Returns how many successors were received.
    fn ingest(&mut self, bound_moved: &mut bool) -> Result<usize, CoverageError> {
        let mut received = 0;
        loop {
            match self.results.try_recv() {
                Ok(WorkerOutput::Successor(state)) => {
                    received += 1;
                    if state.solved {
                        *bound_moved |= self.accept_solution(state)?;
                    } else if !self.frontier.insert(state) {
                        self.counters.record_duplicate();
                    }
                }
                Ok(WorkerOutput::Finished) => {
                    self.outstanding = self.outstanding.saturating_sub(1);
                }
                Err(TryRecvError::Empty) => return Ok(received),
                Err(TryRecvError::Disconnected) => {
                    return Err(CoverageError::QueueClosed { queue: "worker output" })
                }
            }
        }
    }

    /// Record a solved state and deliver it to the reporter. Returns whether the bound moved.
    fn accept_solution(&mut self, state: CompactState) -> Result<bool, CoverageError> {
        let moved = self.counters.tighten_bound(state.score);
        if moved {
            self.bound_history.push(state.score);
            info!("new best score {}", state.score);
        }
        if self.best.map_or(true, |best| state.score < best.score) {
            self.best = Some(state);
        }

        let report = Report {
            state,
            stats: self.stats(),
        };
        select! {
            send(self.report_tx, report) -> res => {
                res.map_err(|_| CoverageError::QueueClosed { queue: "reporter" })?;
            }
            recv(self.cancel.done()) -> _ => {}
        }
        Ok(moved)
    }

    fn termination(&self) -> Option<Termination> {
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(Termination::Deadline);
        }
        let idle = self.frontier.is_empty()
            && self.work_tx.is_empty()
            && self.results.is_empty()
            && self.outstanding == 0;
        idle.then_some(Termination::Exhausted)
    }

    /// Close the queues. After a deadline, discard queued work and drain in-flight results for
    /// at most [`DRAIN_WINDOW`]; workers still busy after that are cancelled.
    fn shutdown(mut self, termination: Termination) -> ManagerSummary {
        if termination == Termination::Deadline {
            warn!(
                "deadline reached with {} states on the frontier and {} expansions in flight",
                self.frontier.len(),
                self.outstanding
            );
            while self.work_rx.try_recv().is_ok() {
                self.outstanding = self.outstanding.saturating_sub(1);
            }
            let window_end = Instant::now() + DRAIN_WINDOW;
            let mut drained = 0usize;
            while self.outstanding > 0 {
                match self.results.recv_deadline(window_end) {
                    Ok(WorkerOutput::Successor(_)) => drained += 1,
                    Ok(WorkerOutput::Finished) => self.outstanding -= 1,
                    Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("drained {drained} in-flight results");
            if self.outstanding > 0 {
                warn!("cancelling {} unfinished expansions", self.outstanding);
                self.cancel.cancel();
            }
        }
        info!(
            "frontier manager finished ({termination:?}): seen {}, duplicates {}, processed {}",
            self.frontier.seen(),
            self.counters.duplicates(),
            self.counters.processed()
        );
        // Dropping `self` closes the worker input and reporter queues.
        self.summary(termination)
    }

    fn stats(&self) -> FrontierStats {
        FrontierStats {
            seen: self.frontier.seen(),
            duplicates: self.counters.duplicates(),
            frontier: self.frontier.len(),
            queued: self.work_tx.len(),
            prospects: self.results.len(),
            processed: self.counters.processed(),
        }
    }

    fn summary(&self, termination: Termination) -> ManagerSummary {
        ManagerSummary {
            termination,
            best: self.best,
            bound_history: self.bound_history.clone(),
            seen: self.frontier.seen(),
            frontier_left: self.frontier.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::search::heuristic::coverage_heuristic;
    use crossbeam_channel::{bounded, unbounded};

    struct Handles {
        work_tx: Sender<CompactState>,
        work_rx: Receiver<CompactState>,
        results: Sender<WorkerOutput>,
        _reports: Receiver<Report>,
    }

    fn manager<'a>(
        counters: &'a SearchCounters,
        cancel: &'a CancelToken,
        work_capacity: usize,
        deadline: Option<Instant>,
    ) -> (Orchestrator<'a>, Handles) {
        let (work_tx, work_rx) = bounded(work_capacity);
        let (results_tx, results_rx) = unbounded();
        let (report_tx, report_rx) = unbounded();
        let orchestrator = Orchestrator::new(
            CompactState::empty(2).unwrap(),
            counters,
            cancel,
            work_tx.clone(),
            work_rx.clone(),
            results_rx,
            report_tx,
            deadline,
        );
        let handles = Handles {
            work_tx,
            work_rx,
            results: results_tx,
            _reports: report_rx,
        };
        (orchestrator, handles)
    }

    fn state(rows: &[&str]) -> CompactState {
        Board::from_rows(rows).unwrap().compact(coverage_heuristic)
    }

    fn with_heuristic(rows: &[&str], heuristic: f32) -> CompactState {
        let mut s = state(rows);
        s.heuristic = heuristic;
        s
    }

    #[test]
    fn dispatch_skips_while_the_work_queue_is_full() {
        let counters = SearchCounters::new(28);
        let cancel = CancelToken::new();
        let (mut manager, handles) = manager(&counters, &cancel, 1, None);
        handles.work_tx.send(state(&["R_", "__"])).unwrap();

        assert!(!manager.dispatch().unwrap());
        assert_eq!(manager.frontier.len(), 1);
        assert_eq!(manager.outstanding, 0);
        assert_eq!(counters.processed(), 0);

        handles.work_rx.try_recv().unwrap();
        assert!(manager.dispatch().unwrap());
        assert!(manager.frontier.is_empty());
        assert_eq!(manager.outstanding, 1);
        assert_eq!(counters.processed(), 1);
        assert_eq!(handles.work_rx.try_recv().unwrap(), CompactState::empty(2).unwrap());
    }

    #[test]
    fn solutions_stay_off_the_frontier_and_tighten_the_bound_strictly() {
        let counters = SearchCounters::new(18);
        let cancel = CancelToken::new();
        let (mut manager, handles) = manager(&counters, &cancel, 4, None);

        let queens = state(&["QQ", "__"]);
        let rooks = state(&["RR", "__"]);
        assert!(queens.solved && rooks.solved);

        let mut moved = false;
        handles.results.send(WorkerOutput::Successor(queens)).unwrap();
        assert_eq!(manager.ingest(&mut moved).unwrap(), 1);
        assert!(!moved, "a score equal to the bound must not move it");
        assert_eq!(counters.bound(), 18);
        assert_eq!(manager.best, Some(queens));

        handles.results.send(WorkerOutput::Successor(rooks)).unwrap();
        manager.ingest(&mut moved).unwrap();
        assert!(moved);
        assert_eq!(counters.bound(), 10);
        assert_eq!(manager.bound_history, vec![10]);
        assert_eq!(manager.best.map(|b| b.score), Some(10));

        // Only the root is on the frontier; solutions are never expanded.
        assert_eq!(manager.frontier.len(), 1);
        assert!(!manager.frontier.has_seen(&rooks));
    }

    #[test]
    fn duplicate_results_are_counted_not_queued() {
        let counters = SearchCounters::new(28);
        let cancel = CancelToken::new();
        let (mut manager, handles) = manager(&counters, &cancel, 4, None);

        let rook = state(&["R_", "__"]);
        for s in [rook, rook, CompactState::empty(2).unwrap()] {
            handles.results.send(WorkerOutput::Successor(s)).unwrap();
        }
        let mut moved = false;
        assert_eq!(manager.ingest(&mut moved).unwrap(), 3);
        assert_eq!(manager.frontier.len(), 2);
        assert_eq!(counters.duplicates(), 2);
    }

    #[test]
    fn bound_move_forces_a_full_resort() {
        let build = |improving: bool| {
            let counters = SearchCounters::new(18);
            let cancel = CancelToken::new();
            let (mut manager, handles) = manager(&counters, &cancel, 1, None);
            // Keep the work queue full so nothing is dispatched.
            handles.work_tx.send(state(&["_P", "__"])).unwrap();
            manager.frontier.insert(with_heuristic(&["R_", "__"], 5.0));
            manager.frontier.insert(with_heuristic(&["_R", "__"], 1.0));
            manager.frontier.insert(with_heuristic(&["__", "R_"], 3.0));
            let solution = if improving {
                state(&["RR", "__"])
            } else {
                state(&["QQ", "__"])
            };
            handles.results.send(WorkerOutput::Successor(solution)).unwrap();
            assert!(matches!(manager.cycle().unwrap(), Cycle::Busy));
            manager
                .frontier
                .iter()
                .map(|s| s.heuristic)
                .collect::<Vec<f32>>()
        };

        let full = build(true);
        assert!(full.windows(2).all(|w| w[0] <= w[1]), "{full:?}");

        // Without a bound move only the tail window is re-sorted.
        let partial = build(false);
        assert!(!partial.windows(2).all(|w| w[0] <= w[1]), "{partial:?}");
        assert_eq!(partial.last(), Some(&3.0));
    }

    #[test]
    fn termination_waits_for_outstanding_expansions() {
        let counters = SearchCounters::new(28);
        let cancel = CancelToken::new();
        let (mut manager, handles) = manager(&counters, &cancel, 1, None);

        assert!(manager.dispatch().unwrap());
        handles.work_rx.try_recv().unwrap();
        // Frontier and both queues are empty, but the root is still being expanded.
        assert_eq!(manager.termination(), None);

        handles.results.send(WorkerOutput::Finished).unwrap();
        let mut moved = false;
        manager.ingest(&mut moved).unwrap();
        assert_eq!(manager.termination(), Some(Termination::Exhausted));
    }

    #[test]
    fn deadline_overrides_outstanding_work() {
        let counters = SearchCounters::new(28);
        let cancel = CancelToken::new();
        let (mut manager, _handles) = manager(&counters, &cancel, 1, Some(Instant::now()));
        assert!(manager.dispatch().unwrap());
        assert_eq!(manager.termination(), Some(Termination::Deadline));

        let summary = manager.shutdown(Termination::Deadline);
        assert_eq!(summary.termination, Termination::Deadline);
        // The queued root was discarded, so nothing was left to cancel.
        assert!(!cancel.is_cancelled());
    }
}
