/*!
 * Core Module
 * Shared types and errors
 */

pub mod errors;
pub mod types;

pub use errors::SimError;
pub use types::{Pid, Priority, ResourceVec, SimResult, MAX_PRIORITY, PRIORITY_LEVELS, RESOURCE_TYPES};
