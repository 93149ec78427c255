//! In-memory crash record store.
//!
//! Concurrent storage keyed by process id. A process-wide sequence number
//! keeps `list` in recording order across shards, and the store holds at
//! most `max_records` entries, dropping the oldest first.

use crate::application::ports::CrashRecorder;
use crate::domain::record::CrashRecord;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

/// Records kept by a store built with `new`.
pub const DEFAULT_MAX_RECORDS: usize = 1024;

/// Thread-safe crash store backed by DashMap.
#[derive(Debug)]
pub struct InMemoryCrashStore {
    records: DashMap<i32, Vec<(u64, CrashRecord)>>,
    sequence: AtomicU64,
    count: AtomicUsize,
    max_records: usize,
    eviction: Mutex<()>,
}

impl Default for InMemoryCrashStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCrashStore {
    /// Create an empty store holding up to `DEFAULT_MAX_RECORDS` records.
    pub fn new() -> Self {
        Self::with_max_records(DEFAULT_MAX_RECORDS)
    }

    /// Create an empty store with a custom capacity.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            records: DashMap::new(),
            sequence: AtomicU64::new(0),
            count: AtomicUsize::new(0),
            max_records: max_records.max(1),
            eviction: Mutex::new(()),
        }
    }

    /// Maximum number of records kept.
    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// Total number of records across all processes.
    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    /// Check if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.iter().all(|entry| entry.value().is_empty())
    }

    /// Records for one package, oldest first.
    pub fn records_for_package(&self, package: &str) -> Vec<CrashRecord> {
        self.ordered(|record| record.package == package)
    }

    fn ordered(&self, mut keep: impl FnMut(&CrashRecord) -> bool) -> Vec<CrashRecord> {
        let mut entries: Vec<(u64, CrashRecord)> = self
            .records
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|(_, record)| keep(record))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, record)| record).collect()
    }

    fn release(&self, removed: usize) {
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                Some(count.saturating_sub(removed))
            });
    }

    /// Drop the oldest records until the store is back within capacity.
    fn enforce_capacity(&self) {
        if self.count.load(Ordering::Acquire) <= self.max_records {
            return;
        }
        let _guard = self.eviction.lock().unwrap_or_else(PoisonError::into_inner);
        let mut evicted = 0usize;
        while self.count.load(Ordering::Acquire) > self.max_records {
            if !self.evict_oldest() {
                break;
            }
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, max_records = self.max_records, "oldest crash records evicted");
        }
    }

    /// Remove the record with the lowest sequence number.
    fn evict_oldest(&self) -> bool {
        loop {
            let oldest = self
                .records
                .iter()
                .filter_map(|entry| {
                    entry
                        .value()
                        .iter()
                        .map(|(seq, _)| *seq)
                        .min()
                        .map(|seq| (seq, *entry.key()))
                })
                .min();
            let Some((seq, pid)) = oldest else {
                return false;
            };

            let mut emptied = false;
            let removed = match self.records.get_mut(&pid) {
                Some(mut entry) => {
                    let records = entry.value_mut();
                    match records.iter().position(|(s, _)| *s == seq) {
                        Some(index) => {
                            records.remove(index);
                            emptied = records.is_empty();
                            true
                        }
                        None => false,
                    }
                }
                None => false,
            };
            if emptied {
                self.records.remove_if(&pid, |_, records| records.is_empty());
            }
            if removed {
                self.release(1);
                return true;
            }
        }
    }
}

impl CrashRecorder for InMemoryCrashStore {
    fn record(&self, record: CrashRecord) {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        trace!(pid = record.pid, package = %record.package, seq, "crash recorded");
        self.count.fetch_add(1, Ordering::AcqRel);
        self.records.entry(record.pid).or_default().push((seq, record));
        self.enforce_capacity();
    }

    fn records_for_pid(&self, pid: i32) -> Vec<CrashRecord> {
        self.records
            .get(&pid)
            .map(|entry| entry.value().iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default()
    }

    fn list(&self) -> Vec<CrashRecord> {
        self.ordered(|_| true)
    }

    fn remove(&self, pid: i32) -> usize {
        let removed = self
            .records
            .remove(&pid)
            .map(|(_, records)| records.len())
            .unwrap_or(0);
        self.release(removed);
        removed
    }

    fn clear(&self) {
        self.records.clear();
        self.count.store(0, Ordering::Release);
    }
}
