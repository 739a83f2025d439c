use crate::{
    AccountStore, BlockStore, NullTransactionTracker, ReadTransaction, Transaction,
    TransactionTracker, WriteTransaction,
};
use rsopal_core::{Account, AccountInfo, BlockEnum, BlockHash};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
};

#[derive(Default)]
pub(crate) struct StoreData {
    pub blocks: HashMap<BlockHash, BlockEnum>,
    pub accounts: HashMap<Account, AccountInfo>,
}

/// In-memory block and account store.
///
/// This is the nullable backend: reads and writes go to process memory and
/// the transaction objects only carry the read/write discipline. A durable
/// backend implements the same transaction traits against a database
/// environment.
pub struct Store {
    pub block: BlockStore,
    pub account: AccountStore,
    next_txn_id: AtomicU64,
    txn_tracker: Arc<dyn TransactionTracker>,
}

impl Store {
    pub fn new() -> Self {
        Self::with_txn_tracker(Arc::new(NullTransactionTracker::new()))
    }

    pub fn with_txn_tracker(txn_tracker: Arc<dyn TransactionTracker>) -> Self {
        let data = Arc::new(RwLock::new(StoreData::default()));
        Self {
            block: BlockStore::new(Arc::clone(&data)),
            account: AccountStore::new(data),
            next_txn_id: AtomicU64::new(0),
            txn_tracker,
        }
    }

    pub fn tx_begin_read(&self) -> StoreReadTransaction {
        let txn_id = self.next_txn_id.fetch_add(1, Ordering::Relaxed);
        StoreReadTransaction::new(txn_id, Arc::clone(&self.txn_tracker))
    }

    pub fn tx_begin_write(&self) -> StoreWriteTransaction {
        let txn_id = self.next_txn_id.fetch_add(1, Ordering::Relaxed);
        StoreWriteTransaction::new(txn_id, Arc::clone(&self.txn_tracker))
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

pub struct StoreReadTransaction {
    txn_id: u64,
    callbacks: Arc<dyn TransactionTracker>,
    active: bool,
}

impl StoreReadTransaction {
    fn new(txn_id: u64, callbacks: Arc<dyn TransactionTracker>) -> Self {
        callbacks.txn_start(txn_id, false);
        Self {
            txn_id,
            callbacks,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Transaction for StoreReadTransaction {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl ReadTransaction for StoreReadTransaction {
    fn txn(&self) -> &dyn Transaction {
        self
    }

    fn reset(&mut self) {
        debug_assert!(self.active, "cannot reset an inactive read transaction");
        self.active = false;
        self.callbacks.txn_end(self.txn_id, false);
    }

    fn renew(&mut self) {
        debug_assert!(!self.active, "cannot renew an active read transaction");
        self.active = true;
        self.callbacks.txn_start(self.txn_id, false);
    }

    fn refresh(&mut self) {
        self.reset();
        self.renew();
    }
}

impl Drop for StoreReadTransaction {
    fn drop(&mut self) {
        if self.active {
            self.callbacks.txn_end(self.txn_id, false);
        }
    }
}

pub struct StoreWriteTransaction {
    txn_id: u64,
    callbacks: Arc<dyn TransactionTracker>,
    active: bool,
}

impl StoreWriteTransaction {
    fn new(txn_id: u64, callbacks: Arc<dyn TransactionTracker>) -> Self {
        callbacks.txn_start(txn_id, true);
        Self {
            txn_id,
            callbacks,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Transaction for StoreWriteTransaction {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl WriteTransaction for StoreWriteTransaction {
    fn txn(&self) -> &dyn Transaction {
        self
    }

    fn commit(&mut self) {
        if self.active {
            self.active = false;
            self.callbacks.txn_end(self.txn_id, true);
        }
    }

    fn renew(&mut self) {
        debug_assert!(!self.active, "cannot renew an active write transaction");
        self.active = true;
        self.callbacks.txn_start(self.txn_id, true);
    }

    fn refresh(&mut self) {
        self.commit();
        self.renew();
    }
}

impl Drop for StoreWriteTransaction {
    fn drop(&mut self) {
        self.commit();
    }
}

/// Catches use of a transaction after `reset`/`commit` in debug builds.
pub(crate) fn assert_active(txn: &dyn Transaction) {
    if cfg!(debug_assertions) {
        let active = if let Some(t) = txn.as_any().downcast_ref::<StoreReadTransaction>() {
            t.is_active()
        } else if let Some(t) = txn.as_any().downcast_ref::<StoreWriteTransaction>() {
            t.is_active()
        } else {
            true
        };
        debug_assert!(active, "transaction used after reset/commit");
    }
}
