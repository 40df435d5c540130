/*!
 * Scheduler Module
 * Queueing discipline, dispatch loop, and the observer contract
 */

mod scheduler;
mod state;
mod task;
pub mod traits;
pub mod types;

pub use scheduler::Scheduler;
pub use traits::{NopObserver, SchedulerObserver};
pub use types::{
    Metrics, QueueSnapshot, SchedulerConfig, DEFAULT_GENERATE_COUNT, DEFAULT_TIME_QUANTUM_SECS,
    DISPATCH_WEIGHTS, QUEUE_CAPACITY,
};
