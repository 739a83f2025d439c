use super::{DetailType, Direction, StatType};
use rsopal_core::utils::get_env_bool;
use std::{
    collections::BTreeMap,
    sync::{atomic::AtomicU64, RwLock},
    time::{Duration, Instant},
};
use tracing::debug;

pub struct Stats {
    mutables: RwLock<StatMutables>,
    enable_logging: bool,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            mutables: RwLock::new(StatMutables {
                counters: BTreeMap::new(),
                timestamp: Instant::now(),
            }),
            enable_logging: get_env_bool("OPAL_LOG_STATS").unwrap_or(false),
        }
    }

    /// Add `value` to the given counter
    pub fn add(&self, stat_type: StatType, detail: DetailType, dir: Direction, value: u64) {
        if value == 0 {
            return;
        }

        if self.enable_logging {
            debug!("Stat: {:?}::{:?}::{:?} += {}", stat_type, detail, dir, value);
        }

        let key = CounterKey::new(stat_type, detail, dir);

        // This is a two-step process to avoid exclusively locking the mutex in the common case
        {
            let lock = self.mutables.read().unwrap();
            if let Some(counter) = lock.counters.get(&key) {
                counter.add(value);
                return;
            }
        }
        // Not found, create a new entry
        {
            let mut lock = self.mutables.write().unwrap();
            let counter = lock.counters.entry(key).or_insert_with(CounterEntry::new);
            counter.add(value);

            let all_key = CounterKey::new(stat_type, DetailType::All, dir);
            if key != all_key {
                lock.counters.entry(all_key).or_insert_with(CounterEntry::new);
            }
        }
    }

    pub fn inc(&self, stat_type: StatType, detail: DetailType) {
        self.add(stat_type, detail, Direction::In, 1)
    }

    pub fn inc_dir(&self, stat_type: StatType, detail: DetailType, dir: Direction) {
        self.add(stat_type, detail, dir, 1)
    }

    /// Current value of the given counter
    pub fn count(&self, stat_type: StatType, detail: DetailType, dir: Direction) -> u64 {
        let key = CounterKey::new(stat_type, detail, dir);
        self.mutables
            .read()
            .unwrap()
            .counters
            .get(&key)
            .map(|i| i.into())
            .unwrap_or_default()
    }

    /// Current value of the given counter summed over all details
    pub fn count_all(&self, stat_type: StatType, dir: Direction) -> u64 {
        let guard = self.mutables.read().unwrap();
        let start = CounterKey::new(stat_type, DetailType::All, dir);
        let mut result = 0u64;
        for (key, entry) in guard.counters.range(start..) {
            if key.stat_type != stat_type {
                break;
            }
            if key.dir == dir && key.detail != DetailType::All {
                result += u64::from(entry);
            }
        }
        result
    }

    /// Returns the duration since `clear()` was last called, or since
    /// node startup if it was never called.
    pub fn last_reset(&self) -> Duration {
        let lock = self.mutables.read().unwrap();
        lock.timestamp.elapsed()
    }

    /// Clear all stats
    pub fn clear(&self) {
        let mut lock = self.mutables.write().unwrap();
        lock.counters.clear();
        lock.timestamp = Instant::now();
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
struct CounterKey {
    stat_type: StatType,
    detail: DetailType,
    dir: Direction,
}

impl CounterKey {
    fn new(stat_type: StatType, detail: DetailType, dir: Direction) -> Self {
        Self {
            stat_type,
            detail,
            dir,
        }
    }
}

struct StatMutables {
    /// Stat entries are sorted by key to simplify processing of log output
    counters: BTreeMap<CounterKey, CounterEntry>,

    /// Time of last clear() call
    timestamp: Instant,
}

struct CounterEntry(AtomicU64);

impl CounterEntry {
    fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    fn add(&self, value: u64) {
        self.0.fetch_add(value, std::sync::atomic::Ordering::SeqCst);
    }
}

impl From<&CounterEntry> for u64 {
    fn from(value: &CounterEntry) -> Self {
        value.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}
