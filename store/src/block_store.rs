use crate::store::{assert_active, StoreData};
use crate::{Transaction, WriteTransaction};
use rsopal_core::{BlockEnum, BlockHash};
use std::sync::{Arc, RwLock};

pub struct BlockStore {
    data: Arc<RwLock<StoreData>>,
}

impl BlockStore {
    pub(crate) fn new(data: Arc<RwLock<StoreData>>) -> Self {
        Self { data }
    }

    pub fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<BlockEnum> {
        assert_active(txn);
        self.data.read().unwrap().blocks.get(hash).cloned()
    }

    pub fn exists(&self, txn: &dyn Transaction, hash: &BlockHash) -> bool {
        assert_active(txn);
        self.data.read().unwrap().blocks.contains_key(hash)
    }

    pub fn put(&self, txn: &mut dyn WriteTransaction, block: &BlockEnum) {
        assert_active(txn.txn());
        debug_assert!(block.sideband().is_some(), "block needs a sideband");
        self.data
            .write()
            .unwrap()
            .blocks
            .insert(block.hash(), block.clone());
    }

    pub fn del(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash) {
        assert_active(txn.txn());
        self.data.write().unwrap().blocks.remove(hash);
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        assert_active(txn);
        self.data.read().unwrap().blocks.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use crate::{ReadTransaction, Store};
    use rsopal_core::{BlockChainBuilder, BlockHash};

    #[test]
    fn put_get_del() {
        let store = Store::new();
        let chain = BlockChainBuilder::for_account(1).legacy_open().legacy_send();
        let block = chain.latest_block();

        let mut txn = store.tx_begin_write();
        store.block.put(&mut txn, block);
        drop(txn);

        let read = store.tx_begin_read();
        assert_eq!(
            store.block.get(read.txn(), &block.hash()),
            Some(block.clone())
        );
        assert!(store.block.exists(read.txn(), &block.hash()));
        assert_eq!(store.block.count(read.txn()), 1);
        assert!(!store.block.exists(read.txn(), &BlockHash::from(99)));
        drop(read);

        let mut txn = store.tx_begin_write();
        store.block.del(&mut txn, &block.hash());
        drop(txn);

        let read = store.tx_begin_read();
        assert_eq!(store.block.count(read.txn()), 0);
    }
}
