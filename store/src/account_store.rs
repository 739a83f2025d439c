use crate::store::{assert_active, StoreData};
use crate::{Transaction, WriteTransaction};
use rsopal_core::{Account, AccountInfo};
use std::sync::{Arc, RwLock};

pub struct AccountStore {
    data: Arc<RwLock<StoreData>>,
}

impl AccountStore {
    pub(crate) fn new(data: Arc<RwLock<StoreData>>) -> Self {
        Self { data }
    }

    pub fn get(&self, txn: &dyn Transaction, account: &Account) -> Option<AccountInfo> {
        assert_active(txn);
        self.data.read().unwrap().accounts.get(account).cloned()
    }

    pub fn put(&self, txn: &mut dyn WriteTransaction, account: &Account, info: &AccountInfo) {
        assert_active(txn.txn());
        self.data
            .write()
            .unwrap()
            .accounts
            .insert(*account, info.clone());
    }

    pub fn del(&self, txn: &mut dyn WriteTransaction, account: &Account) {
        assert_active(txn.txn());
        self.data.write().unwrap().accounts.remove(account);
    }

    pub fn count(&self, txn: &dyn Transaction) -> u64 {
        assert_active(txn);
        self.data.read().unwrap().accounts.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use crate::{ReadTransaction, Store};
    use rsopal_core::{Account, AccountInfo};

    #[test]
    fn put_overwrites() {
        let store = Store::new();
        let account = Account::from(1);
        let mut info = AccountInfo {
            block_count: 10,
            confirmation_height: 2,
            ..Default::default()
        };

        let mut txn = store.tx_begin_write();
        store.account.put(&mut txn, &account, &info);
        info.confirmation_height = 5;
        store.account.put(&mut txn, &account, &info);
        drop(txn);

        let read = store.tx_begin_read();
        let loaded = store.account.get(read.txn(), &account).unwrap();
        assert_eq!(loaded.confirmation_height, 5);
        assert_eq!(store.account.count(read.txn()), 1);
    }
}
