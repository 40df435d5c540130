/*!
 * Scheduler State
 * Queue ownership guarded by the scheduler's exclusive lock
 */

use super::types::{Metrics, QueueSnapshot, QUEUE_CAPACITY};
use crate::core::types::{Pid, PRIORITY_LEVELS};
use crate::process::Process;
use std::collections::VecDeque;

/// All scheduler-owned mutable state: the wait queue, the three bounded
/// ready queues, the completed list, and the pid counter
///
/// Everything here is reached only through the scheduler's mutex; a process
/// being sliced is temporarily owned by the dispatch loop and is in none of
/// these queues.
#[derive(Debug)]
pub(super) struct SchedulerState {
    pub wait: VecDeque<Process>,
    pub levels: [VecDeque<Process>; PRIORITY_LEVELS],
    pub completed: Vec<Process>,
    next_pid: Pid,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self {
            wait: VecDeque::new(),
            levels: std::array::from_fn(|_| VecDeque::new()),
            completed: Vec::new(),
            next_pid: 1,
        }
    }

    /// Hand out the next monotonic pid
    pub fn allocate_pid(&mut self) -> Pid {
        let pid = self.next_pid;
        self.next_pid += 1;
        pid
    }

    /// Move processes from the wait queue into their priority's ready queue
    ///
    /// Strict head-of-line FIFO: admission stops at the first process whose
    /// target queue is full, even if a later process targets a queue with
    /// room.
    pub fn admit_waiting(&mut self) {
        loop {
            let target = match self.wait.front() {
                Some(process) => process.priority as usize,
                None => break,
            };
            if self.levels[target].len() >= QUEUE_CAPACITY {
                break;
            }
            if let Some(process) = self.wait.pop_front() {
                self.levels[target].push_back(process);
            }
        }
    }

    pub fn queue_snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            wait: self.wait.iter().map(|p| p.pid).collect(),
            levels: std::array::from_fn(|level| {
                self.levels[level].iter().map(|p| p.pid).collect()
            }),
        }
    }

    /// Average turnaround and wait over completed processes
    ///
    /// `None` until at least one process has completed.
    pub fn metrics(&self) -> Option<Metrics> {
        if self.completed.is_empty() {
            return None;
        }

        let mut turnaround = 0.0;
        let mut wait = 0.0;
        for process in &self.completed {
            if let (Some(t), Some(w)) = (process.turnaround(), process.wait()) {
                turnaround += t.as_secs_f64();
                wait += w.as_secs_f64();
            }
        }

        let count = self.completed.len();
        Some(Metrics {
            avg_turnaround_secs: turnaround / count as f64,
            avg_wait_secs: wait / count as f64,
            completed: count,
        })
    }

    pub fn completed_pids(&self) -> Vec<Pid> {
        self.completed.iter().map(|p| p.pid).collect()
    }
}
