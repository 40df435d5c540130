/*!
 * Scheduler Types
 * Configuration, constants, and observer-facing snapshots
 */

use crate::core::errors::SimError;
use crate::core::types::{Pid, ResourceVec, SimResult, PRIORITY_LEVELS, RESOURCE_TYPES};
use crate::resource::DEFAULT_UNITS_PER_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bound on each ready queue
pub const QUEUE_CAPACITY: usize = 5;

/// Dispatch slots per level per round (level 0 first)
pub const DISPATCH_WEIGHTS: [usize; PRIORITY_LEVELS] = [3, 2, 1];

/// Default slice length in simulated seconds
pub const DEFAULT_TIME_QUANTUM_SECS: u32 = 5;

/// Default processes per `generate` call
pub const DEFAULT_GENERATE_COUNT: usize = 10;

/// Scheduler configuration
///
/// One simulated second costs `tick_millis` of wall time; the defaults
/// reproduce the 1 s cadence of the interactive simulator, while tests drive
/// the same loop with millisecond ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    pub time_quantum_secs: u32,
    pub resource_units: ResourceVec,
    pub tick_millis: u64,
    pub round_delay_millis: u64,
}

impl SchedulerConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.time_quantum_secs < 1 {
            return Err(SimError::InvalidTimeQuantum(self.time_quantum_secs));
        }
        Ok(())
    }

    pub fn with_time_quantum(mut self, secs: u32) -> Self {
        self.time_quantum_secs = secs;
        self
    }

    pub fn with_resource_units(mut self, units: ResourceVec) -> Self {
        self.resource_units = units;
        self
    }

    pub fn with_tick(mut self, millis: u64) -> Self {
        self.tick_millis = millis;
        self
    }

    pub fn with_round_delay(mut self, millis: u64) -> Self {
        self.round_delay_millis = millis;
        self
    }

    /// Wall duration of one simulated second
    #[inline]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Wall delay between dispatch rounds
    #[inline]
    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.round_delay_millis)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_quantum_secs: DEFAULT_TIME_QUANTUM_SECS,
            resource_units: [DEFAULT_UNITS_PER_TYPE; RESOURCE_TYPES],
            tick_millis: 1_000,
            round_delay_millis: 1_000,
        }
    }
}

/// Pid ordering of the wait queue and the three ready queues
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueSnapshot {
    pub wait: Vec<Pid>,
    pub levels: [Vec<Pid>; PRIORITY_LEVELS],
}

/// Aggregate metrics over completed processes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    pub avg_turnaround_secs: f64,
    pub avg_wait_secs: f64,
    pub completed: usize,
}
