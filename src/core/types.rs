/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Priority level (0 is highest, 2 is lowest)
pub type Priority = u8;

/// Number of priority levels
pub const PRIORITY_LEVELS: usize = 3;

/// Lowest priority level (numerically highest)
pub const MAX_PRIORITY: Priority = 2;

/// Number of distinct resource types in the pool
pub const RESOURCE_TYPES: usize = 5;

/// Per-process resource vector, one entry per resource type
pub type ResourceVec = [u32; RESOURCE_TYPES];

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
