//! End-to-end searches on boards small enough to exhaust.

use std::time::Duration;

use chess_coverage::board::{Board, RenderMode};
use chess_coverage::config::SearchConfig;
use chess_coverage::error::CoverageError;
use chess_coverage::search::orchestrator::Termination;
use chess_coverage::search;

fn config(size: u8, bound: u32, workers: usize) -> SearchConfig {
    SearchConfig {
        board_size: size,
        initial_bound: bound,
        workers,
        render_mode: RenderMode::Pieces,
        ..SearchConfig::default()
    }
}

#[test]
fn three_by_three_is_exhausted_with_a_covering() {
    let outcome = search::run(&config(3, 12, 2)).unwrap();

    assert_eq!(outcome.termination, Termination::Exhausted);
    assert_eq!(outcome.frontier_left, 0);

    // A centre queen plus a pawn guarding it scores 10 and is always reachable; two pawns
    // and two bishops (8) is the cheapest covering.
    let best = outcome.best.expect("3x3 has a covering under 12");
    assert!(best.solved);
    assert!((8..=10).contains(&best.score), "best score {}", best.score);
    let rebuilt = best.rebuild().unwrap();
    assert!(rebuilt.is_solved());
    assert_eq!(rebuilt.score(), best.score);

    assert!(!outcome.solutions.is_empty());
    assert!(outcome.solutions.iter().all(|s| s.solved && s.score <= 12));
    assert!(outcome.solutions.iter().any(|s| s.score == best.score));

    assert!(outcome.bound_history.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(outcome.bound_history.last(), Some(&best.score));
    assert_eq!(outcome.counts.bound, best.score);
    assert!(outcome.counts.processed > 0);
    assert!(outcome.seen as u64 >= outcome.counts.processed);
}

#[test]
fn single_worker_also_finds_a_covering() {
    let outcome = search::run(&config(3, 12, 1)).unwrap();
    assert_eq!(outcome.termination, Termination::Exhausted);
    let best = outcome.best.expect("3x3 has a covering under 12");
    assert!((8..=10).contains(&best.score), "best score {}", best.score);
}

#[test]
fn one_cell_board_cannot_be_covered() {
    // A lone piece never covers its own cell, and nothing else fits.
    let outcome = search::run(&config(1, 28, 1)).unwrap();
    assert_eq!(outcome.termination, Termination::Exhausted);
    assert!(outcome.best.is_none());
    assert!(outcome.solutions.is_empty());
    assert!(outcome.bound_history.is_empty());
    assert_eq!(outcome.counts.bound, 28);
}

#[test]
fn bound_below_every_covering_finds_nothing() {
    let outcome = search::run(&config(2, 3, 2)).unwrap();
    assert_eq!(outcome.termination, Termination::Exhausted);
    assert!(outcome.best.is_none());
}

#[test]
fn deadline_stops_a_large_search() {
    let mut cfg = config(8, 28, 2);
    cfg.deadline_secs = Some(0.2);
    let outcome = search::run(&cfg).unwrap();
    assert_eq!(outcome.termination, Termination::Deadline);
    assert!(outcome.elapsed >= Duration::from_millis(200));
    assert!(outcome.elapsed < Duration::from_secs(30));
    assert!(outcome.counts.processed > 0);
}

#[test]
fn deadline_with_expansions_in_flight_ends_cleanly() {
    // Each expansion on 8x8 compacts hundreds of states, so with this heuristic the drain
    // window closes while workers are still busy and have to be cancelled.
    fn slow(board: &Board) -> f32 {
        std::thread::sleep(Duration::from_micros(300));
        board.coverage_level() as f32
    }
    for _ in 0..6 {
        let mut cfg = config(8, 28, 3);
        cfg.deadline_secs = Some(0.15);
        let outcome = search::run_with_heuristic(&cfg, slow).unwrap();
        assert_eq!(outcome.termination, Termination::Deadline);
    }
}

#[test]
fn deadline_past_the_clock_range_is_rejected() {
    let mut cfg = config(1, 28, 1);
    // A valid `Duration`, but no `Instant` can be that far ahead.
    cfg.deadline_secs = Some(1.8e19);
    assert!(cfg.validate().is_ok());
    assert!(matches!(
        search::run(&cfg),
        Err(CoverageError::InvalidConfig { .. })
    ));
}

#[test]
fn custom_heuristic_still_finds_a_covering() {
    fn cheapest_first(board: &Board) -> f32 {
        -(board.score() as f32)
    }
    let outcome = search::run_with_heuristic(&config(3, 12, 2), cheapest_first).unwrap();
    assert_eq!(outcome.termination, Termination::Exhausted);
    let best = outcome.best.expect("3x3 has a covering under 12");
    assert!((8..=10).contains(&best.score), "best score {}", best.score);
}

#[test]
fn invalid_config_is_rejected_before_spawning() {
    assert!(matches!(
        search::run(&config(0, 10, 1)),
        Err(CoverageError::InvalidConfig { .. })
    ));
    assert!(matches!(
        search::run(&config(3, 10, 0)),
        Err(CoverageError::InvalidConfig { .. })
    ));
}

#[test]
fn outcome_serializes_for_the_summary_file() {
    let outcome = search::run(&config(2, 28, 1)).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["termination"], "exhausted");
    assert!(json["best"]["rows"].is_array());
    assert_eq!(json["best"]["solved"], true);
    assert!(json["counts"]["processed"].as_u64().unwrap() > 0);
}
