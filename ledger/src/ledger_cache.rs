use std::sync::atomic::AtomicU64;

/// Ledger counters kept in memory so that RPC queries do not have to scan
/// the store.
pub struct LedgerCache {
    pub block_count: AtomicU64,
    pub account_count: AtomicU64,
    pub cemented_count: AtomicU64,
}

impl LedgerCache {
    pub fn new() -> Self {
        Self {
            block_count: AtomicU64::new(0),
            account_count: AtomicU64::new(0),
            cemented_count: AtomicU64::new(0),
        }
    }
}

impl Default for LedgerCache {
    fn default() -> Self {
        Self::new()
    }
}
