use rsopal_core::BlockHash;
use std::{
    collections::HashSet,
    sync::{Condvar, Mutex, MutexGuard},
};

/// Hashes awaiting a confirmation height update, plus the hash the worker
/// is processing right now. Shared between the worker thread and the rest
/// of the node, which only observes through `size`/`is_processing`/`current`.
pub struct PendingConfirmationHeight {
    mutex: Mutex<PendingHashes>,
    condition: Condvar,
}

#[derive(Default)]
pub(crate) struct PendingHashes {
    pub pending: HashSet<BlockHash>,
    /// Zero when the worker is idle
    pub current_hash: BlockHash,
    pub paused: bool,
}

impl PendingConfirmationHeight {
    pub fn new() -> Self {
        Self {
            mutex: Mutex::new(PendingHashes::default()),
            condition: Condvar::new(),
        }
    }

    /// Duplicate adds coalesce. Returns whether the hash was newly added.
    pub fn add(&self, hash: BlockHash) -> bool {
        let inserted = {
            let mut lk = self.mutex.lock().unwrap();
            lk.pending.insert(hash)
        };
        self.condition.notify_one();
        inserted
    }

    pub fn size(&self) -> usize {
        self.mutex.lock().unwrap().pending.len()
    }

    pub fn is_processing(&self, hash: &BlockHash) -> bool {
        let lk = self.mutex.lock().unwrap();
        if !lk.current_hash.is_zero() && lk.current_hash == *hash {
            return true;
        }
        lk.pending.contains(hash)
    }

    pub fn current(&self) -> BlockHash {
        self.mutex.lock().unwrap().current_hash
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, PendingHashes> {
        self.mutex.lock().unwrap()
    }

    pub(crate) fn wait<'a>(
        &self,
        guard: MutexGuard<'a, PendingHashes>,
    ) -> MutexGuard<'a, PendingHashes> {
        self.condition.wait(guard).unwrap()
    }

    pub(crate) fn notify_all(&self) {
        self.condition.notify_all();
    }
}

impl Default for PendingConfirmationHeight {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_coalesces_duplicates() {
        let pending = PendingConfirmationHeight::new();
        assert!(pending.add(BlockHash::from(1)));
        assert!(!pending.add(BlockHash::from(1)));
        assert!(pending.add(BlockHash::from(2)));
        assert_eq!(pending.size(), 2);
    }

    #[test]
    fn is_processing_sees_pending_and_current() {
        let pending = PendingConfirmationHeight::new();
        let hash = BlockHash::from(1);
        assert!(!pending.is_processing(&hash));

        pending.add(hash);
        assert!(pending.is_processing(&hash));

        {
            let mut guard = pending.lock();
            guard.pending.remove(&hash);
            guard.current_hash = hash;
        }
        assert!(pending.is_processing(&hash));
        assert_eq!(pending.current(), hash);

        pending.lock().current_hash = BlockHash::zero();
        assert!(!pending.is_processing(&hash));
        assert!(pending.current().is_zero());
    }

    #[test]
    fn zero_current_is_idle() {
        let pending = PendingConfirmationHeight::new();
        assert!(!pending.is_processing(&BlockHash::zero()));
    }
}
