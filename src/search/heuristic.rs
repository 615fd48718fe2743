use crate::board::Board;

/// Coverage biased slightly towards material efficiency: `coverage / score + coverage`.
///
/// Not admissible, so the search ordering is best-first but not A*.
pub fn coverage_heuristic(board: &Board) -> f32 {
    let coverage = board.coverage_level() as f32;
    let score = board.score();
    if score == 0 {
        return coverage;
    }
    coverage / score as f32 + coverage
}
