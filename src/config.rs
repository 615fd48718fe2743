//! Search configuration.
//!
//! `SearchConfig::default()` is the classic 8×8 problem with the bound of 28 points; every
//! field can be overridden from JSON (missing fields keep their defaults) or by the CLI.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{validate_size, RenderMode};
use crate::core::position::MAX_BOARD_SIZE;
use crate::error::CoverageError;

/// Worker input queue slots per worker.
pub const WORK_QUEUE_FACTOR: usize = 8;

/// Worker output queue slots per worker and board cell: five placements plus one reduction.
pub const RESULT_QUEUE_FACTOR: usize = 5 + 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub board_size: u8,
    /// Upper bound on the score of any state worth expanding.
    pub initial_bound: u32,
    pub workers: usize,
    pub work_queue_factor: usize,
    /// Stop early after this many seconds.
    pub deadline_secs: Option<f64>,
    pub render_mode: RenderMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            board_size: MAX_BOARD_SIZE as u8,
            // Best known score for the 8×8 board.
            initial_bound: 28,
            workers: default_workers(),
            work_queue_factor: WORK_QUEUE_FACTOR,
            deadline_secs: None,
            render_mode: RenderMode::SupportCounts,
        }
    }
}

/// One core is left for the frontier manager.
pub fn default_workers() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), CoverageError> {
        validate_size(self.board_size)?;
        if self.workers == 0 {
            return Err(CoverageError::InvalidConfig {
                reason: "workers must be >= 1".to_string(),
            });
        }
        if self.work_queue_factor == 0 {
            return Err(CoverageError::InvalidConfig {
                reason: "work_queue_factor must be >= 1".to_string(),
            });
        }
        if let Some(secs) = self.deadline_secs {
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(CoverageError::InvalidConfig {
                    reason: format!("deadline_secs must be a representable duration, got {secs}"),
                });
            }
        }
        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn work_queue_capacity(&self) -> usize {
        self.workers * self.work_queue_factor
    }

    pub fn result_queue_capacity(&self) -> usize {
        let area = self.board_size as usize * self.board_size as usize;
        self.workers * area * RESULT_QUEUE_FACTOR
    }

    pub fn from_json_str(text: &str) -> Result<Self, CoverageError> {
        serde_json::from_str(text).map_err(|source| CoverageError::Json {
            stage: "config",
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, CoverageError> {
        let text = fs::read_to_string(path).map_err(|source| CoverageError::Io {
            stage: "config",
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_keep_defaults() {
        let config = SearchConfig::from_json_str(r#"{"board_size": 4, "deadline_secs": 1.5}"#).unwrap();
        assert_eq!(config.board_size, 4);
        assert_eq!(config.initial_bound, 28);
        assert_eq!(config.work_queue_factor, WORK_QUEUE_FACTOR);
        assert_eq!(config.deadline(), Some(Duration::from_millis(1500)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn render_mode_is_snake_case() {
        let config = SearchConfig::from_json_str(r#"{"render_mode": "pieces"}"#).unwrap();
        assert_eq!(config.render_mode, RenderMode::Pieces);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = SearchConfig {
            board_size: 9,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoverageError::InvalidConfig { .. })));

        config.board_size = 3;
        config.workers = 0;
        assert!(matches!(config.validate(), Err(CoverageError::InvalidConfig { .. })));

        config.workers = 2;
        config.deadline_secs = Some(-1.0);
        assert!(matches!(config.validate(), Err(CoverageError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_deadlines_that_are_not_durations() {
        for secs in [1e300, f64::NAN, f64::INFINITY, -0.5] {
            let config = SearchConfig {
                deadline_secs: Some(secs),
                ..SearchConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(CoverageError::InvalidConfig { .. })),
                "accepted deadline {secs}"
            );
            assert_eq!(config.deadline(), None);
        }
    }

    #[test]
    fn queue_capacities_scale_with_workers() {
        let config = SearchConfig {
            board_size: 3,
            workers: 2,
            ..SearchConfig::default()
        };
        assert_eq!(config.work_queue_capacity(), 16);
        assert_eq!(config.result_queue_capacity(), 2 * 9 * 6);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            SearchConfig::from_json_str("{ not json"),
            Err(CoverageError::Json { .. })
        ));
    }
}
