#[macro_use]
extern crate anyhow;

mod account;
pub use account::Account;

mod amount;
pub use amount::Amount;

mod block_hash;
pub use block_hash::{BlockHash, BlockHashBuilder};

mod u256_struct;

pub mod utils;

mod account_info;
pub use account_info::AccountInfo;

mod epoch;
pub use epoch::{epoch_v1_link, epoch_v2_link, Epoch, Epochs};

mod blocks;
pub use blocks::*;

u256_struct!(HashOrAccount);
u256_struct!(Link);

impl From<HashOrAccount> for Account {
    fn from(source: HashOrAccount) -> Self {
        Account::from_bytes(*source.as_bytes())
    }
}

impl From<Link> for Account {
    fn from(link: Link) -> Self {
        Account::from_bytes(*link.as_bytes())
    }
}

impl From<Account> for Link {
    fn from(account: Account) -> Self {
        Link::from_bytes(*account.as_bytes())
    }
}

impl From<BlockHash> for Link {
    fn from(hash: BlockHash) -> Self {
        Link::from_bytes(*hash.as_bytes())
    }
}

impl From<HashOrAccount> for BlockHash {
    fn from(source: HashOrAccount) -> Self {
        BlockHash::from_bytes(*source.as_bytes())
    }
}

impl From<Link> for BlockHash {
    fn from(link: Link) -> Self {
        BlockHash::from_bytes(*link.as_bytes())
    }
}

impl From<Account> for BlockHash {
    fn from(account: Account) -> Self {
        BlockHash::from_bytes(*account.as_bytes())
    }
}

impl From<BlockHash> for HashOrAccount {
    fn from(hash: BlockHash) -> Self {
        HashOrAccount::from_bytes(*hash.as_bytes())
    }
}
