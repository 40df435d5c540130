/*!
 * Schedsim Library
 * Educational model of a preemptive multilevel-feedback scheduler with a
 * multi-resource allocator gating execution
 */

pub mod core;
pub mod process;
pub mod resource;
pub mod scheduler;

// Re-exports
pub use crate::core::{Pid, Priority, ResourceVec, SimError, SimResult};
pub use process::{Process, ProcessSpec};
pub use resource::{ResourceManager, ResourceSnapshot};
pub use scheduler::{
    Metrics, NopObserver, QueueSnapshot, Scheduler, SchedulerConfig, SchedulerObserver,
};
