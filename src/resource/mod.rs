/*!
 * Resource Module
 * Resource pool ownership and the request/release protocol
 */

pub mod manager;

pub use manager::{ResourceManager, ResourceSnapshot, DEFAULT_UNITS_PER_TYPE};
