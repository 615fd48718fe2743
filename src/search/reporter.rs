use crossbeam_channel::{select, Receiver};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::board::render::render;
use crate::board::{CompactState, Heuristic, RenderMode};
use crate::error::CoverageError;
use crate::search::group::CancelToken;

/// Counters sampled by the frontier manager when it hands a state to the reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierStats {
    pub seen: usize,
    pub duplicates: u64,
    pub frontier: usize,
    pub queued: usize,
    pub prospects: usize,
    pub processed: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub state: CompactState,
    pub stats: FrontierStats,
}

/// Draws sampled in-progress states and every solution.
///
/// In-progress samples are offered with `try_send` and dropped while the reporter is busy;
/// solutions are sent blocking. Once the first solution arrives, in-progress samples are no
/// longer drawn.
pub struct Reporter<'a> {
    input: Receiver<Report>,
    cancel: &'a CancelToken,
    mode: RenderMode,
    heuristic: Heuristic,
}

impl<'a> Reporter<'a> {
    pub fn new(
        input: Receiver<Report>,
        cancel: &'a CancelToken,
        mode: RenderMode,
        heuristic: Heuristic,
    ) -> Self {
        Self {
            input,
            cancel,
            mode,
            heuristic,
        }
    }

    /// Runs until the frontier manager closes the queue (or the group is cancelled).
    /// Returns every solution received, in arrival order.
    pub fn run(&self) -> Result<Vec<CompactState>, CoverageError> {
        let mut solutions = Vec::new();
        loop {
            let report = select! {
                recv(self.input) -> msg => match msg {
                    Ok(report) => report,
                    Err(_) => break,
                },
                recv(self.cancel.done()) -> _ => break,
            };

            if report.state.solved {
                solutions.push(report.state);
            } else if !solutions.is_empty() {
                continue;
            }
            self.draw(&report);
        }
        info!("reporter completed with {} solutions", solutions.len());
        Ok(solutions)
    }

    fn draw(&self, report: &Report) {
        let text = match render(&report.state, self.mode, self.heuristic) {
            Ok(text) => text,
            Err(err) => {
                warn!("failed to render state: {err}");
                report.state.to_string()
            }
        };
        let s = &report.stats;
        info!(
            "\n{text}\nseen: {}\tduplicates: {}\tcurrent: {}\tqueued: {}\tprospects: {}\tprocessed: {}",
            s.seen, s.duplicates, s.frontier, s.queued, s.prospects, s.processed
        );
    }
}
