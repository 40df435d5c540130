/*!
 * Resource Manager
 * Multi-resource pool gating process execution
 */

use crate::core::types::{Pid, ResourceVec, RESOURCE_TYPES};
use log::{debug, trace};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Default capacity per resource type
pub const DEFAULT_UNITS_PER_TYPE: u32 = 5;

/// Immutable copy of the pool state for observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceSnapshot {
    pub total: ResourceVec,
    pub available: ResourceVec,
    /// Held units per process, ordered by pid
    pub allocation: BTreeMap<Pid, ResourceVec>,
}

#[derive(Debug)]
struct PoolState {
    available: ResourceVec,
    allocation: HashMap<Pid, ResourceVec>,
}

/// Owner of the resource pool
///
/// Grants are a one-shot feasibility check: a request succeeds iff every
/// demanded unit is available right now. There is no safe-state cycle
/// simulation; processes hold units only for the duration of one slice, so
/// the allocator never carries debt across rounds.
#[derive(Debug)]
pub struct ResourceManager {
    total: ResourceVec,
    state: Mutex<PoolState>,
}

impl ResourceManager {
    pub fn new(total: ResourceVec) -> Self {
        Self {
            total,
            state: Mutex::new(PoolState {
                available: total,
                allocation: HashMap::new(),
            }),
        }
    }

    pub fn total(&self) -> ResourceVec {
        self.total
    }

    /// Try to grant `demand` to `pid`
    ///
    /// On grant, debits `available` and credits the process's allocation row
    /// as one atomic unit and returns `true`. On denial there are no side
    /// effects.
    pub fn request(&self, pid: Pid, demand: &ResourceVec) -> bool {
        let mut state = self.state.lock();

        if demand
            .iter()
            .zip(state.available.iter())
            .any(|(needed, avail)| needed > avail)
        {
            trace!(
                "resource request denied: pid={} demand={:?} available={:?}",
                pid,
                demand,
                state.available
            );
            return false;
        }

        for r in 0..RESOURCE_TYPES {
            state.available[r] -= demand[r];
        }
        let held = state.allocation.entry(pid).or_insert([0; RESOURCE_TYPES]);
        for r in 0..RESOURCE_TYPES {
            held[r] += demand[r];
        }

        debug!("resources granted: pid={} demand={:?}", pid, demand);
        self.assert_conserved(&state);
        true
    }

    /// Return everything `pid` holds to the pool
    ///
    /// Idempotent; unknown pids and empty rows are silent no-ops.
    pub fn release(&self, pid: Pid) {
        let mut state = self.state.lock();

        // mem::take zeroes the row in place, so a second release is a no-op
        let Some(held) = state.allocation.get_mut(&pid).map(std::mem::take) else {
            return;
        };
        for r in 0..RESOURCE_TYPES {
            state.available[r] += held[r];
        }

        if held.iter().any(|&units| units > 0) {
            debug!("resources released: pid={} held={:?}", pid, held);
        }
        self.assert_conserved(&state);
    }

    /// Immutable copy of the current pool state
    pub fn snapshot(&self) -> ResourceSnapshot {
        let state = self.state.lock();
        ResourceSnapshot {
            total: self.total,
            available: state.available,
            allocation: state.allocation.iter().map(|(&pid, &held)| (pid, held)).collect(),
        }
    }

    /// Conservation invariant: available plus everything held equals total
    fn assert_conserved(&self, state: &PoolState) {
        if cfg!(debug_assertions) {
            for r in 0..RESOURCE_TYPES {
                let held: u32 = state.allocation.values().map(|row| row[r]).sum();
                debug_assert_eq!(state.available[r] + held, self.total[r]);
            }
        }
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new([DEFAULT_UNITS_PER_TYPE; RESOURCE_TYPES])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_debits_pool() {
        let rm = ResourceManager::default();

        assert!(rm.request(1, &[1, 0, 2, 0, 1]));

        let snap = rm.snapshot();
        assert_eq!(snap.available, [4, 5, 3, 5, 4]);
        assert_eq!(snap.allocation.get(&1), Some(&[1, 0, 2, 0, 1]));
    }

    #[test]
    fn test_denial_has_no_side_effects() {
        let rm = ResourceManager::new([1, 1, 1, 1, 1]);

        assert!(!rm.request(1, &[2, 0, 0, 0, 0]));

        let snap = rm.snapshot();
        assert_eq!(snap.available, [1, 1, 1, 1, 1]);
        assert!(snap.allocation.get(&1).is_none());
    }

    #[test]
    fn test_grant_safety_at_boundary() {
        let rm = ResourceManager::new([2, 2, 2, 2, 2]);

        assert!(rm.request(1, &[2, 2, 2, 2, 2]));
        // Pool is drained; even a single unit must be denied
        assert!(!rm.request(2, &[1, 0, 0, 0, 0]));
        assert!(rm.request(2, &[0; 5]));
    }

    #[test]
    fn test_release_restores_and_is_idempotent() {
        let rm = ResourceManager::default();

        assert!(rm.request(1, &[2, 1, 0, 0, 2]));
        rm.release(1);
        assert_eq!(rm.snapshot().available, [5; 5]);

        // Double release and unknown pids must not over-credit the pool
        rm.release(1);
        rm.release(99);
        assert_eq!(rm.snapshot().available, [5; 5]);
    }

    #[test]
    fn test_conservation_across_mixed_traffic() {
        let rm = ResourceManager::default();

        assert!(rm.request(1, &[1, 1, 1, 1, 1]));
        assert!(rm.request(2, &[2, 0, 2, 0, 2]));
        rm.release(1);
        assert!(rm.request(3, &[2, 2, 2, 2, 2]));
        rm.release(2);
        rm.release(3);

        let snap = rm.snapshot();
        assert_eq!(snap.available, snap.total);
        assert!(snap.allocation.values().all(|row| row == &[0; 5]));
    }
}
