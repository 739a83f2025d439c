use super::{Block, BlockSideband, BlockType, LazyBlockHash};
use crate::{Account, Amount, BlockHash, BlockHashBuilder, Link};

/// Distinguishes state block hashes from legacy block hashes.
fn state_preamble() -> BlockHash {
    BlockHash::from(6)
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StateHashables {
    pub account: Account,
    /// Zero for the first block of an account
    pub previous: BlockHash,
    pub representative: Account,
    pub balance: Amount,
    /// Destination account on a send, source block hash on a receive,
    /// epoch sentinel on an epoch block, zero on a pure representative
    /// change. The semantic context decides the interpretation.
    pub link: Link,
}

impl From<&StateHashables> for BlockHash {
    fn from(hashables: &StateHashables) -> Self {
        BlockHashBuilder::new()
            .update(state_preamble().as_bytes())
            .update(hashables.account.as_bytes())
            .update(hashables.previous.as_bytes())
            .update(hashables.representative.as_bytes())
            .update(hashables.balance.to_be_bytes())
            .update(hashables.link.as_bytes())
            .build()
    }
}

#[derive(Clone, Debug)]
pub struct StateBlock {
    hashables: StateHashables,
    hash: LazyBlockHash,
    sideband: Option<BlockSideband>,
}

impl StateBlock {
    pub fn new(
        account: Account,
        previous: BlockHash,
        representative: Account,
        balance: Amount,
        link: Link,
    ) -> Self {
        Self {
            hashables: StateHashables {
                account,
                previous,
                representative,
                balance,
                link,
            },
            hash: LazyBlockHash::new(),
            sideband: None,
        }
    }

    pub fn account(&self) -> Account {
        self.hashables.account
    }

    pub fn balance(&self) -> Amount {
        self.hashables.balance
    }

    pub fn link(&self) -> Link {
        self.hashables.link
    }
}

impl PartialEq for StateBlock {
    fn eq(&self, other: &Self) -> bool {
        self.hashables == other.hashables && self.sideband == other.sideband
    }
}

impl Eq for StateBlock {}

impl Block for StateBlock {
    fn block_type(&self) -> BlockType {
        BlockType::State
    }

    fn hash(&self) -> BlockHash {
        self.hash.hash(&self.hashables)
    }

    fn previous(&self) -> BlockHash {
        self.hashables.previous
    }

    fn account_field(&self) -> Option<Account> {
        Some(self.hashables.account)
    }

    fn source_field(&self) -> Option<BlockHash> {
        None
    }

    fn link_field(&self) -> Option<Link> {
        Some(self.hashables.link)
    }

    fn sideband(&self) -> Option<&BlockSideband> {
        self.sideband.as_ref()
    }

    fn set_sideband(&mut self, sideband: BlockSideband) {
        self.sideband = Some(sideband);
    }
}
