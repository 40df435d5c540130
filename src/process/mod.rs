/*!
 * Process Records
 * Synthetic process records managed by the scheduler
 */

use crate::core::errors::SimError;
use crate::core::types::{Pid, Priority, ResourceVec, SimResult, MAX_PRIORITY};
use std::time::{Duration, Instant};

/// Minimum burst time accepted at submission
pub const MIN_BURST_SECS: u32 = 1;

/// Upper bound on generated burst times
pub const MAX_BURST_SECS: u32 = 10;

/// Maximum units of a single resource type one process may demand
pub const MAX_DEMAND_PER_TYPE: u32 = 2;

/// Demand-side description of a process before it is assigned a pid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec {
    pub priority: Priority,
    pub burst_secs: u32,
    pub demand: ResourceVec,
}

impl ProcessSpec {
    /// Validate submission inputs
    ///
    /// Burst times above [`MAX_BURST_SECS`] are accepted; the 1..=10 range
    /// applies to the random generator, not to explicit submission.
    pub fn validate(&self) -> SimResult<()> {
        if self.priority > MAX_PRIORITY {
            return Err(SimError::InvalidPriority(self.priority));
        }
        if self.burst_secs < MIN_BURST_SECS {
            return Err(SimError::InvalidBurstTime(self.burst_secs));
        }
        for (index, &got) in self.demand.iter().enumerate() {
            if got > MAX_DEMAND_PER_TYPE {
                return Err(SimError::InvalidResourceDemand {
                    index,
                    got,
                    max: MAX_DEMAND_PER_TYPE,
                });
            }
        }
        Ok(())
    }
}

/// A synthetic process: fixed identity and demand plus mutable runtime state
///
/// Ownership follows queue membership: a process lives in exactly one of the
/// wait queue, a ready queue, the dispatch loop's current slice, or the
/// completed list.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub priority: Priority,
    pub burst_secs: u32,
    pub remaining_secs: u32,
    pub demand: ResourceVec,
    pub arrived_at: Instant,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl Process {
    /// Build a process from an already-validated spec
    pub(crate) fn new(pid: Pid, spec: ProcessSpec, arrived_at: Instant) -> Self {
        Self {
            pid,
            priority: spec.priority,
            burst_secs: spec.burst_secs,
            remaining_secs: spec.burst_secs,
            demand: spec.demand,
            arrived_at,
            started_at: None,
            finished_at: None,
        }
    }

    /// Record the first dispatch; later calls leave the original timestamp
    pub(crate) fn mark_started(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Record completion; set at most once, when no work remains
    pub(crate) fn mark_finished(&mut self, now: Instant) {
        debug_assert_eq!(self.remaining_secs, 0);
        if self.finished_at.is_none() {
            self.finished_at = Some(now);
        }
    }

    /// Consume one simulated second of the current slice
    pub(crate) fn run_one_second(&mut self) {
        debug_assert!(self.remaining_secs > 0);
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
    }

    /// Demote one priority level on preemption, capped at the lowest level
    pub(crate) fn degrade(&mut self) {
        self.priority = (self.priority + 1).min(MAX_PRIORITY);
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_secs == 0
    }

    /// `finished - arrived`; `None` until the process completes
    pub fn turnaround(&self) -> Option<Duration> {
        self.finished_at.map(|end| end.duration_since(self.arrived_at))
    }

    /// `started - arrived`; `None` until the first dispatch
    pub fn wait(&self) -> Option<Duration> {
        self.started_at.map(|start| start.duration_since(self.arrived_at))
    }
}
