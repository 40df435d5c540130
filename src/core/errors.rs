/*!
 * Core Errors
 * Fail-fast construction errors for simulator inputs
 */

use super::types::Priority;
use thiserror::Error;

/// Simulator errors
///
/// Runtime scheduling has no error path (resource denial is a boolean
/// outcome, release is idempotent); these cover invalid construction
/// inputs only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid burst time {0}: must be at least 1 simulated second")]
    InvalidBurstTime(u32),

    #[error("invalid demand {got} for resource type {index}: per-type maximum is {max}")]
    InvalidResourceDemand { index: usize, got: u32, max: u32 },

    #[error("invalid priority {0}: levels are 0..=2")]
    InvalidPriority(Priority),

    #[error("invalid time quantum {0}: must be at least 1 simulated second")]
    InvalidTimeQuantum(u32),
}
