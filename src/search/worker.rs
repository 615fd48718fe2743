use crossbeam_channel::{select, Receiver, Sender};
use log::debug;

use crate::board::{CompactState, Heuristic};
use crate::error::CoverageError;
use crate::search::counters::SearchCounters;
use crate::search::group::CancelToken;
use crate::search::successors::propose;

/// What a worker sends back to the frontier manager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkerOutput {
    Successor(CompactState),
    /// Follows the last successor of one expansion; marks that expansion complete.
    Finished,
}

/// A stateless expander: pull one state, expand it, push back the successors within bound.
pub struct Worker<'a> {
    id: usize,
    input: Receiver<CompactState>,
    output: Sender<WorkerOutput>,
    counters: &'a SearchCounters,
    cancel: &'a CancelToken,
    heuristic: Heuristic,
}

impl<'a> Worker<'a> {
    pub fn new(
        id: usize,
        input: Receiver<CompactState>,
        output: Sender<WorkerOutput>,
        counters: &'a SearchCounters,
        cancel: &'a CancelToken,
        heuristic: Heuristic,
    ) -> Self {
        Self {
            id,
            input,
            output,
            counters,
            cancel,
            heuristic,
        }
    }

    /// Runs until the input queue is closed and drained, or the group is cancelled.
    pub fn run(&self) -> Result<(), CoverageError> {
        let mut expanded = 0u64;
        loop {
            let state = select! {
                recv(self.input) -> msg => match msg {
                    Ok(state) => state,
                    Err(_) => break,
                },
                recv(self.cancel.done()) -> _ => break,
            };

            let board = state.rebuild()?;
            // Filtering against the bound is best effort: the bound may tighten while
            // these are in flight, and the frontier manager prunes the stragglers.
            for next in propose(&board, self.heuristic) {
                if next.score <= self.counters.bound() && !self.emit(WorkerOutput::Successor(next))? {
                    return Ok(());
                }
            }
            if !self.emit(WorkerOutput::Finished)? {
                return Ok(());
            }
            expanded += 1;
        }
        debug!("worker {} stopped after {expanded} expansions", self.id);
        Ok(())
    }

    /// Blocking send that gives up on cancellation. Returns `false` when cancelled.
    ///
    /// The frontier manager cancels before it drops the output receiver, so a closed queue
    /// seen after cancellation is a normal stop rather than a failure.
    fn emit(&self, msg: WorkerOutput) -> Result<bool, CoverageError> {
        select! {
            send(self.output, msg) -> res => match res {
                Ok(()) => Ok(true),
                Err(_) if self.cancel.is_cancelled() => Ok(false),
                Err(_) => Err(CoverageError::QueueClosed { queue: "worker output" }),
            },
            recv(self.cancel.done()) -> _ => Ok(false),
        }
    }
}
