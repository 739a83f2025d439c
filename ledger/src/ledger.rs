use crate::{LedgerCache, LedgerConstants};
use rsopal_core::{
    Account, AccountInfo, BlockChainBuilder, BlockEnum, BlockHash, Link,
};
use rsopal_store::{
    ReadTransaction, Store, Transaction, TransactionTracker, WriteTransaction,
};
use std::sync::{atomic::Ordering, Arc};

/// Read and write surface of the ledger as used by the cementing machinery.
pub struct Ledger {
    pub store: Store,
    pub cache: LedgerCache,
    pub constants: LedgerConstants,
}

impl Ledger {
    pub fn new(store: Store, constants: LedgerConstants) -> Self {
        Self {
            store,
            cache: LedgerCache::new(),
            constants,
        }
    }

    pub fn new_null() -> Self {
        Self::null_builder().finish()
    }

    pub fn null_builder() -> NullLedgerBuilder {
        NullLedgerBuilder::new()
    }

    pub fn read_txn(&self) -> Box<dyn ReadTransaction> {
        Box::new(self.store.tx_begin_read())
    }

    pub fn rw_txn(&self) -> Box<dyn WriteTransaction> {
        Box::new(self.store.tx_begin_write())
    }

    pub fn get_block(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<BlockEnum> {
        self.store.block.get(txn, hash)
    }

    pub fn block_exists(&self, txn: &dyn Transaction, hash: &BlockHash) -> bool {
        self.store.block.exists(txn, hash)
    }

    /// 1-based height of the block within its account chain, 0 when the
    /// block is not known.
    pub fn block_account_height(&self, txn: &dyn Transaction, hash: &BlockHash) -> u64 {
        self.get_block(txn, hash).map(|b| b.height()).unwrap_or(0)
    }

    pub fn block_account(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Account> {
        self.get_block(txn, hash).map(|b| b.account())
    }

    pub fn account_info(&self, txn: &dyn Transaction, account: &Account) -> Option<AccountInfo> {
        self.store.account.get(txn, account)
    }

    pub fn confirmation_height(&self, txn: &dyn Transaction, account: &Account) -> u64 {
        self.account_info(txn, account)
            .map(|info| info.confirmation_height)
            .unwrap_or(0)
    }

    /// Does the paired send of a receive block exist in the ledger?
    pub fn source_exists(&self, txn: &dyn Transaction, source: &BlockHash) -> bool {
        self.store.block.exists(txn, source)
    }

    pub fn is_epoch_link(&self, link: &Link) -> bool {
        self.constants.epochs.is_epoch_link(link)
    }

    pub fn cemented_count(&self) -> u64 {
        self.cache.cemented_count.load(Ordering::SeqCst)
    }
}

/// Seeds an in-memory ledger for tests.
pub struct NullLedgerBuilder {
    blocks: Vec<BlockEnum>,
    accounts: Vec<(Account, AccountInfo)>,
    txn_tracker: Option<Arc<dyn TransactionTracker>>,
}

impl NullLedgerBuilder {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            accounts: Vec::new(),
            txn_tracker: None,
        }
    }

    pub fn block(mut self, block: &BlockEnum) -> Self {
        assert!(block.sideband().is_some());
        self.blocks.push(block.clone());
        self
    }

    pub fn blocks<'a>(mut self, blocks: impl IntoIterator<Item = &'a BlockEnum>) -> Self {
        for block in blocks {
            self = self.block(block);
        }
        self
    }

    pub fn account_info(mut self, account: &Account, info: &AccountInfo) -> Self {
        self.accounts.push((*account, info.clone()));
        self
    }

    /// Adds a whole account chain and the matching account record.
    pub fn chain(self, chain: &BlockChainBuilder, confirmation_height: u64) -> Self {
        assert!(confirmation_height <= chain.height());
        let info = AccountInfo {
            head: chain.frontier(),
            representative: chain.account(),
            open_block: chain.open(),
            block_count: chain.height(),
            confirmation_height,
            ..Default::default()
        };
        self.blocks(chain.blocks()).account_info(&chain.account(), &info)
    }

    pub fn txn_tracker(mut self, tracker: Arc<dyn TransactionTracker>) -> Self {
        self.txn_tracker = Some(tracker);
        self
    }

    pub fn finish(self) -> Ledger {
        let store = match self.txn_tracker {
            Some(tracker) => Store::with_txn_tracker(tracker),
            None => Store::new(),
        };

        let mut txn = store.tx_begin_write();
        for block in &self.blocks {
            store.block.put(&mut txn, block);
        }
        for (account, info) in &self.accounts {
            store.account.put(&mut txn, account, info);
        }
        drop(txn);

        let ledger = Ledger::new(store, LedgerConstants::unit_test());
        ledger
            .cache
            .block_count
            .store(self.blocks.len() as u64, Ordering::SeqCst);
        ledger
            .cache
            .account_count
            .store(self.accounts.len() as u64, Ordering::SeqCst);
        let cemented: u64 = self
            .accounts
            .iter()
            .map(|(_, info)| info.confirmation_height)
            .sum();
        ledger.cache.cemented_count.store(cemented, Ordering::SeqCst);
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ledger() {
        let ledger = Ledger::new_null();
        let txn = ledger.read_txn();
        assert_eq!(
            ledger.block_account_height(txn.txn(), &BlockHash::from(1)),
            0
        );
        assert_eq!(ledger.account_info(txn.txn(), &Account::from(1)), None);
        assert!(!ledger.source_exists(txn.txn(), &BlockHash::from(1)));
    }

    #[test]
    fn seeded_chain() {
        let chain = BlockChainBuilder::for_account(1)
            .legacy_open()
            .legacy_send()
            .legacy_send();
        let ledger = Ledger::null_builder().chain(&chain, 1).finish();

        let txn = ledger.read_txn();
        assert_eq!(
            ledger.block_account_height(txn.txn(), &chain.frontier()),
            3
        );
        assert_eq!(
            ledger.block_account(txn.txn(), &chain.frontier()),
            Some(chain.account())
        );
        let info = ledger.account_info(txn.txn(), &chain.account()).unwrap();
        assert_eq!(info.confirmation_height, 1);
        assert_eq!(info.block_count, 3);
        assert_eq!(info.head, chain.frontier());
        assert_eq!(ledger.cemented_count(), 1);
    }

    #[test]
    fn epoch_links_are_recognised() {
        let ledger = Ledger::new_null();
        assert!(ledger.is_epoch_link(&rsopal_core::epoch_v1_link()));
        assert!(!ledger.is_epoch_link(&Link::from(7)));
    }
}
