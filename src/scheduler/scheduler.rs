/*!
 * Scheduler
 * Multilevel-feedback scheduler with a resource-gated dispatch loop
 */

use super::state::SchedulerState;
use super::traits::SchedulerObserver;
use super::types::{Metrics, QueueSnapshot, SchedulerConfig};
use crate::core::types::{Pid, SimResult, MAX_PRIORITY};
use crate::process::{Process, ProcessSpec, MAX_BURST_SECS, MAX_DEMAND_PER_TYPE, MIN_BURST_SECS};
use crate::resource::{ResourceManager, ResourceSnapshot};
use log::{debug, info};
use parking_lot::Mutex;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Preemptive multilevel-feedback scheduler
///
/// Owns the wait queue, the three bounded ready queues, and the pid counter;
/// resource state is owned by the [`ResourceManager`] and touched only
/// through its operations. All mutation funnels through one exclusive lock,
/// so the foreground control surface (`generate`/`submit`/`admit`) is safe
/// to call while the dispatch loop runs.
pub struct Scheduler {
    pub(super) config: SchedulerConfig,
    pub(super) state: Mutex<SchedulerState>,
    pub(super) resources: Arc<ResourceManager>,
    pub(super) observer: Arc<dyn SchedulerObserver>,
    pub(super) running: AtomicBool,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(observer: Arc<dyn SchedulerObserver>) -> Self {
        // The default config always validates
        Self::build(SchedulerConfig::default(), observer)
    }

    pub fn with_config(
        config: SchedulerConfig,
        observer: Arc<dyn SchedulerObserver>,
    ) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::build(config, observer))
    }

    fn build(config: SchedulerConfig, observer: Arc<dyn SchedulerObserver>) -> Self {
        info!(
            "scheduler initialized: quantum={}s, resource units={:?}",
            config.time_quantum_secs, config.resource_units
        );
        Self {
            resources: Arc::new(ResourceManager::new(config.resource_units)),
            config,
            state: Mutex::new(SchedulerState::new()),
            observer,
            running: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Generate `n` random processes and append them to the wait queue
    ///
    /// Priority, burst time, and per-type demand are independent uniform
    /// draws; arrival is now. One queue notification covers the whole batch.
    pub fn generate(&self, n: usize) -> Vec<Pid> {
        let mut rng = rand::thread_rng();
        let mut pids = Vec::with_capacity(n);
        {
            let mut state = self.state.lock();
            for _ in 0..n {
                let spec = ProcessSpec {
                    priority: rng.gen_range(0..=MAX_PRIORITY),
                    burst_secs: rng.gen_range(MIN_BURST_SECS..=MAX_BURST_SECS),
                    demand: std::array::from_fn(|_| rng.gen_range(0..=MAX_DEMAND_PER_TYPE)),
                };
                let pid = state.allocate_pid();
                state.wait.push_back(Process::new(pid, spec, Instant::now()));
                pids.push(pid);
            }
        }

        info!("generated {} processes: {:?}", n, pids);
        self.observer.on_queues_changed(&self.queue_snapshot());
        pids
    }

    /// Append one explicitly described process to the wait queue
    ///
    /// Deterministic sibling of [`generate`](Self::generate); rejects
    /// out-of-range specs before touching the pid counter.
    pub fn submit(&self, spec: ProcessSpec) -> SimResult<Pid> {
        spec.validate()?;

        let pid = {
            let mut state = self.state.lock();
            let pid = state.allocate_pid();
            state.wait.push_back(Process::new(pid, spec, Instant::now()));
            pid
        };

        debug!(
            "submitted pid={} priority={} burst={}s demand={:?}",
            pid, spec.priority, spec.burst_secs, spec.demand
        );
        self.observer.on_queues_changed(&self.queue_snapshot());
        Ok(pid)
    }

    /// Admit waiting processes into their priority queues (strict FIFO,
    /// head-of-line blocking on a full queue); always notifies once
    pub fn admit(&self) {
        self.state.lock().admit_waiting();
        self.observer.on_queues_changed(&self.queue_snapshot());
    }

    /// Spawn the dispatch loop if it is not already live; idempotent
    pub fn start(self: &Arc<Self>) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        self.running.store(true, Ordering::Release);
        let scheduler = Arc::clone(self);
        *task = Some(tokio::spawn(async move {
            super::task::run_dispatch_loop(scheduler).await;
        }));
        info!("dispatch loop started");
    }

    /// Ask the dispatch loop to exit at the next round boundary
    ///
    /// Not instantaneous: a slice in progress runs to completion or quantum
    /// exhaustion first.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        info!("dispatch loop stop requested");
    }

    /// Stop and wait for the dispatch loop to finish its current round
    pub async fn shutdown(&self) {
        self.stop();
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                log::warn!("dispatch loop join error: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn queue_snapshot(&self) -> QueueSnapshot {
        self.state.lock().queue_snapshot()
    }

    pub fn metrics(&self) -> Option<Metrics> {
        self.state.lock().metrics()
    }

    /// Pids of completed processes, in completion order
    pub fn completed_pids(&self) -> Vec<Pid> {
        self.state.lock().completed_pids()
    }

    pub fn resource_snapshot(&self) -> ResourceSnapshot {
        self.resources.snapshot()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}
