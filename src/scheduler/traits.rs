/*!
 * Scheduler Traits
 * Observer contract between the dispatch loop and a presentation layer
 */

use super::types::{Metrics, QueueSnapshot};
use crate::core::types::{Pid, Priority};
use crate::resource::ResourceSnapshot;

/// Presentation-layer callbacks fired after every state-changing event
///
/// Callbacks run synchronously on the dispatch task and have no return
/// value. Implementations must return promptly (hand the update to a
/// channel or buffer) so presentation cost never perturbs slice timing.
pub trait SchedulerObserver: Send + Sync {
    /// Queue membership changed (generation, admission, requeue, completion)
    fn on_queues_changed(&self, queues: &QueueSnapshot) {
        let _ = queues;
    }

    /// A process entered a slice or consumed one simulated second of it
    fn on_current_process_changed(&self, pid: Pid, priority: Priority, remaining_secs: u32) {
        let _ = (pid, priority, remaining_secs);
    }

    /// A process finished; feeds the rolling recent-completions display
    fn on_process_completed(&self, pid: Pid) {
        let _ = pid;
    }

    /// Averages over completed processes; not fired while none completed
    fn on_metrics_changed(&self, metrics: &Metrics) {
        let _ = metrics;
    }

    /// Resource pool availability or allocation rows changed
    fn on_resource_state_changed(&self, resources: &ResourceSnapshot) {
        let _ = resources;
    }
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NopObserver;

impl SchedulerObserver for NopObserver {}
