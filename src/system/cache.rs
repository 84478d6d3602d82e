use std::collections::{HashMap, HashSet};

/// First-observed creation time per pid.
///
/// An entry is never overwritten while it lives, so a pid reused between two
/// refreshes keeps the start time of the process that first held it.
#[derive(Debug, Default)]
pub struct StartTimeCache {
    entries: HashMap<u32, u64>,
}

impl StartTimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `created_at` for `pid` unless already known. Returns the cached value.
    pub fn observe(&mut self, pid: u32, created_at: u64) -> u64 {
        *self.entries.entry(pid).or_insert(created_at)
    }

    pub fn get(&self, pid: u32) -> Option<u64> {
        self.entries.get(&pid).copied()
    }

    /// Drop entries for pids that were not in the latest enumeration.
    /// Returns how many were evicted.
    pub fn retain_alive(&mut self, alive_pids: &HashSet<u32>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|pid, _| alive_pids.contains(pid));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
