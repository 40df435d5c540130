/*!
 * Schedsim - Demo Entry Point
 *
 * Console frontend for the scheduler simulator: generates a batch of random
 * processes, runs the dispatch loop, and renders every observer notification
 * as a log line until the batch drains or ctrl-c arrives.
 */

use log::info;
use parking_lot::Mutex;
use schedsim::scheduler::DEFAULT_GENERATE_COUNT;
use schedsim::{
    Metrics, Pid, Priority, QueueSnapshot, ResourceSnapshot, Scheduler, SchedulerObserver,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// How many recent completions the console keeps on screen
const RECENT_COMPLETIONS: usize = 5;

/// Observer that renders state changes as log lines
///
/// Every callback formats and returns immediately; the only held state is
/// the rolling recent-completions window.
#[derive(Default)]
struct ConsoleObserver {
    recent: Mutex<VecDeque<Pid>>,
}

impl SchedulerObserver for ConsoleObserver {
    fn on_queues_changed(&self, queues: &QueueSnapshot) {
        info!(
            "queues: q0={:?} q1={:?} q2={:?} wait={:?}",
            queues.levels[0], queues.levels[1], queues.levels[2], queues.wait
        );
    }

    fn on_current_process_changed(&self, pid: Pid, priority: Priority, remaining_secs: u32) {
        info!(
            "running: pid={} priority={} remaining={}s",
            pid, priority, remaining_secs
        );
    }

    fn on_process_completed(&self, pid: Pid) {
        let mut recent = self.recent.lock();
        recent.push_back(pid);
        while recent.len() > RECENT_COMPLETIONS {
            recent.pop_front();
        }
        let chart: Vec<String> = recent.iter().map(|p| format!("P{}", p)).collect();
        info!("completed: {}", chart.join(" "));
    }

    fn on_metrics_changed(&self, metrics: &Metrics) {
        info!(
            "avg turnaround: {:.2}s, avg wait: {:.2}s ({} completed)",
            metrics.avg_turnaround_secs, metrics.avg_wait_secs, metrics.completed
        );
    }

    fn on_resource_state_changed(&self, resources: &ResourceSnapshot) {
        match serde_json::to_string(resources) {
            Ok(table) => info!("resources: {}", table),
            Err(e) => log::warn!("resource table serialization failed: {}", e),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("schedsim starting");

    let scheduler = Arc::new(Scheduler::new(Arc::new(ConsoleObserver::default())));
    scheduler.generate(DEFAULT_GENERATE_COUNT);
    scheduler.admit();
    scheduler.start();

    let drained = async {
        loop {
            tokio::time::sleep(Duration::from_millis(500)).await;
            if scheduler.completed_pids().len() >= DEFAULT_GENERATE_COUNT {
                break;
            }
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
        _ = drained => info!("all generated processes completed"),
    }

    scheduler.shutdown().await;

    if let Some(metrics) = scheduler.metrics() {
        info!(
            "final: {} completed, avg turnaround {:.2}s, avg wait {:.2}s",
            metrics.completed, metrics.avg_turnaround_secs, metrics.avg_wait_secs
        );
    }
}
