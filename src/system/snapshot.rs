use std::collections::HashSet;

use super::cache::StartTimeCache;
use super::collector::SystemSource;
use super::process::{ConnectionError, Connections, ProcessRecord};
use super::source::ProcessSource;

/// Turns the live process table into `ProcessRecord`s and keeps the
/// start-time cache across calls.
pub struct Snapshotter<S: ProcessSource = SystemSource> {
    source: S,
    cache: StartTimeCache,
    evict_exited: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnavailableCounts {
    pub permission_denied: usize,
    pub process_gone: usize,
    pub unsupported: usize,
    pub other: usize,
}

impl UnavailableCounts {
    pub fn tally(records: &[ProcessRecord]) -> Self {
        let mut counts = UnavailableCounts::default();
        for record in records {
            match record.connections.unavailable_reason() {
                Some(ConnectionError::PermissionDenied) => counts.permission_denied += 1,
                Some(ConnectionError::ProcessGone) => counts.process_gone += 1,
                Some(ConnectionError::Unsupported) => counts.unsupported += 1,
                Some(ConnectionError::Other(_)) => counts.other += 1,
                None => {}
            }
        }
        counts
    }
}

impl Snapshotter<SystemSource> {
    pub fn system(evict_exited: bool) -> Self {
        Snapshotter::new(SystemSource::new(), evict_exited)
    }
}

impl<S: ProcessSource> Snapshotter<S> {
    pub fn new(source: S, evict_exited: bool) -> Self {
        Snapshotter {
            source,
            cache: StartTimeCache::new(),
            evict_exited,
        }
    }

    /// Never fails as a whole: a process whose sockets cannot be read keeps
    /// its record with `Connections::Unavailable`.
    pub fn list_processes(&mut self) -> Vec<ProcessRecord> {
        let _span = tracing::debug_span!("snapshot.refresh").entered();

        self.source.refresh();

        let mut alive = HashSet::new();
        let records: Vec<ProcessRecord> = self
            .source
            .processes()
            .into_iter()
            .map(|raw| {
                alive.insert(raw.pid);
                self.cache.observe(raw.pid, raw.created_at);
                let connections = Connections::from(self.source.connections(raw.pid));
                ProcessRecord::from_raw(raw, connections)
            })
            .collect();

        let evicted = if self.evict_exited {
            self.cache.retain_alive(&alive)
        } else {
            0
        };

        let unavailable = UnavailableCounts::tally(&records);
        tracing::info!(
            records = records.len(),
            evicted,
            cached = self.cache.len(),
            permission_denied = unavailable.permission_denied,
            process_gone = unavailable.process_gone,
            unsupported = unavailable.unsupported,
            other = unavailable.other,
            "process snapshot taken"
        );

        records
    }

    pub fn cache(&self) -> &StartTimeCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
