/*!
 * Dispatch Loop
 * Background task running weighted rounds over the ready queues
 */

use super::scheduler::Scheduler;
use super::types::DISPATCH_WEIGHTS;
use crate::process::Process;
use log::{debug, info, trace};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;

/// Run rounds until the scheduler's run flag is cleared
///
/// The flag is observed once per round boundary; a slice in progress is
/// never cancelled. Each round visits the levels in priority order with
/// 3:2:1 dispatch slots, then admits from the wait queue and sleeps the
/// inter-round delay.
pub(super) async fn run_dispatch_loop(scheduler: Arc<Scheduler>) {
    info!(
        "dispatch loop running: weights={:?}, quantum={}s",
        DISPATCH_WEIGHTS, scheduler.config.time_quantum_secs
    );

    while scheduler.running.load(Ordering::Acquire) {
        run_round(&scheduler).await;
        scheduler.admit();
        sleep(scheduler.config.round_delay()).await;
    }

    info!("dispatch loop exited");
}

/// One weighted round: up to 3 dispatches from level 0, 2 from level 1,
/// 1 from level 2
async fn run_round(scheduler: &Scheduler) {
    for (level, &budget) in DISPATCH_WEIGHTS.iter().enumerate() {
        for _ in 0..budget {
            let popped = scheduler.state.lock().levels[level].pop_front();
            let Some(process) = popped else {
                break;
            };

            if scheduler.resources.request(process.pid, &process.demand) {
                execute_slice(scheduler, process).await;
            } else {
                // A denial still consumes this level's dispatch slot; the
                // process returns to the tail of the same queue
                trace!(
                    "pid {} denied resources, requeued at level {}",
                    process.pid,
                    level
                );
                scheduler.state.lock().levels[level].push_back(process);
            }
        }
    }
}

/// Run one granted process for up to a quantum of simulated seconds
///
/// The state lock is never held across a tick sleep; the process itself is
/// owned by the loop for the duration of the slice.
async fn execute_slice(scheduler: &Scheduler, mut process: Process) {
    process.mark_started(Instant::now());
    scheduler
        .observer
        .on_current_process_changed(process.pid, process.priority, process.remaining_secs);

    for _ in 0..scheduler.config.time_quantum_secs {
        if process.is_complete() {
            break;
        }
        sleep(scheduler.config.tick()).await;
        process.run_one_second();
        scheduler
            .observer
            .on_current_process_changed(process.pid, process.priority, process.remaining_secs);
    }

    if process.is_complete() {
        process.mark_finished(Instant::now());
        info!(
            "pid {} completed (burst {}s, priority {})",
            process.pid, process.burst_secs, process.priority
        );

        let pid = process.pid;
        scheduler.state.lock().completed.push(process);
        scheduler.resources.release(pid);
        scheduler.observer.on_process_completed(pid);
    } else {
        process.degrade();
        debug!(
            "pid {} preempted with {}s remaining, demoted to level {}",
            process.pid, process.remaining_secs, process.priority
        );

        let pid = process.pid;
        let level = process.priority as usize;
        scheduler.state.lock().levels[level].push_back(process);
        scheduler.resources.release(pid);
    }

    notify_round_state(scheduler);
}

/// Post-slice fan-out: queues, metrics (once anything has completed), and
/// the resource table
fn notify_round_state(scheduler: &Scheduler) {
    let (queues, metrics) = {
        let state = scheduler.state.lock();
        (state.queue_snapshot(), state.metrics())
    };

    scheduler.observer.on_queues_changed(&queues);
    if let Some(metrics) = metrics {
        scheduler.observer.on_metrics_changed(&metrics);
    }
    scheduler
        .observer
        .on_resource_state_changed(&scheduler.resources.snapshot());
}
