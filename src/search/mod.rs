//! Concurrent best-first search for a cheap set of pieces covering the whole board.
//!
//! Task layout:
//! - `workers` [`worker::Worker`]s expand states into successors,
//! - one [`orchestrator::Orchestrator`] owns the frontier, the dedup set and the bound,
//! - one [`reporter::Reporter`] draws samples and solutions.
//!
//! They share only bounded queues, a cancel token and [`counters::SearchCounters`].

pub mod counters;
pub mod frontier;
pub mod group;
pub mod heuristic;
pub mod orchestrator;
pub mod reporter;
pub mod successors;
pub mod worker;

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use log::info;
use serde::Serialize;

use crate::board::{CompactState, Heuristic};
use crate::config::SearchConfig;
use crate::error::CoverageError;
use crate::search::counters::{SearchCounters, SearchCounts};
use crate::search::group::TaskGroup;
use crate::search::heuristic::coverage_heuristic;
use crate::search::orchestrator::{Orchestrator, Termination};
use crate::search::reporter::Reporter;
use crate::search::worker::Worker;

/// Everything a finished search reports.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub termination: Termination,
    /// Cheapest solution seen, if any.
    pub best: Option<CompactState>,
    /// Every solution delivered to the reporter, in arrival order.
    pub solutions: Vec<CompactState>,
    /// Successive values of the bound after the initial one; strictly decreasing.
    pub bound_history: Vec<u32>,
    pub counts: SearchCounts,
    pub seen: usize,
    pub frontier_left: usize,
    pub elapsed: Duration,
}

/// Run a search with the default [`coverage_heuristic`].
pub fn run(config: &SearchConfig) -> Result<SearchOutcome, CoverageError> {
    run_with_heuristic(config, coverage_heuristic)
}

pub fn run_with_heuristic(
    config: &SearchConfig,
    heuristic: Heuristic,
) -> Result<SearchOutcome, CoverageError> {
    config.validate()?;
    let root = CompactState::empty(config.board_size)?;

    let (work_tx, work_rx) = bounded(config.work_queue_capacity());
    let (result_tx, result_rx) = bounded(config.result_queue_capacity());
    // Rendezvous: `try_send` only succeeds while the reporter is waiting.
    let (report_tx, report_rx) = bounded(0);

    let counters = SearchCounters::new(config.initial_bound);
    let group = TaskGroup::new();
    let started = Instant::now();
    let deadline = match config.deadline() {
        Some(d) => Some(started.checked_add(d).ok_or_else(|| CoverageError::InvalidConfig {
            reason: format!("deadline of {d:?} is too far in the future"),
        })?),
        None => None,
    };

    info!(
        "searching {0}x{0} board with bound {1} on {2} workers",
        config.board_size, config.initial_bound, config.workers
    );

    let finished = thread::scope(|scope| {
        let group = &group;
        let counters = &counters;

        for id in 0..config.workers {
            let worker = Worker::new(
                id,
                work_rx.clone(),
                result_tx.clone(),
                counters,
                group.cancel_token(),
                heuristic,
            );
            scope.spawn(move || {
                let outcome = worker.run();
                // The worker keeps its output sender until the outcome is recorded, so the
                // manager never sees a disconnect before the cause is known.
                group.finish("worker", outcome);
                drop(worker);
            });
        }
        drop(result_tx);

        let reporter = Reporter::new(report_rx, group.cancel_token(), config.render_mode, heuristic);
        let reporter = scope.spawn(move || group.finish("reporter", reporter.run()));

        let orchestrator = Orchestrator::new(
            root,
            counters,
            group.cancel_token(),
            work_tx,
            work_rx,
            result_rx,
            report_tx,
            deadline,
        );
        let manager = scope.spawn(move || group.finish("frontier manager", orchestrator.run()));

        let summary = manager
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        let solutions = reporter
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        summary.zip(solutions)
    });

    let (summary, solutions) = group.into_result(finished)?;
    let outcome = SearchOutcome {
        termination: summary.termination,
        best: summary.best,
        solutions,
        bound_history: summary.bound_history,
        counts: counters.counts(),
        seen: summary.seen,
        frontier_left: summary.frontier_left,
        elapsed: started.elapsed(),
    };
    info!(
        "search finished ({:?}) in {:.2?}: best {:?}, {} solutions, {} states seen",
        outcome.termination,
        outcome.elapsed,
        outcome.best.map(|b| b.score),
        outcome.solutions.len(),
        outcome.seen
    );
    Ok(outcome)
}
