use super::{Block, BlockSideband, BlockType, LazyBlockHash};
use crate::{Account, Amount, BlockHash, BlockHashBuilder, Link};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SendHashables {
    pub previous: BlockHash,
    pub destination: Account,
    pub balance: Amount,
}

impl From<&SendHashables> for BlockHash {
    fn from(hashables: &SendHashables) -> Self {
        BlockHashBuilder::new()
            .update(hashables.previous.as_bytes())
            .update(hashables.destination.as_bytes())
            .update(hashables.balance.to_be_bytes())
            .build()
    }
}

#[derive(Clone, Debug)]
pub struct SendBlock {
    hashables: SendHashables,
    hash: LazyBlockHash,
    sideband: Option<BlockSideband>,
}

impl SendBlock {
    pub fn new(previous: BlockHash, destination: Account, balance: Amount) -> Self {
        Self {
            hashables: SendHashables {
                previous,
                destination,
                balance,
            },
            hash: LazyBlockHash::new(),
            sideband: None,
        }
    }

    pub fn destination(&self) -> &Account {
        &self.hashables.destination
    }

    pub fn balance(&self) -> Amount {
        self.hashables.balance
    }
}

impl PartialEq for SendBlock {
    fn eq(&self, other: &Self) -> bool {
        self.hashables == other.hashables && self.sideband == other.sideband
    }
}

impl Eq for SendBlock {}

impl Block for SendBlock {
    fn block_type(&self) -> BlockType {
        BlockType::LegacySend
    }

    fn hash(&self) -> BlockHash {
        self.hash.hash(&self.hashables)
    }

    fn previous(&self) -> BlockHash {
        self.hashables.previous
    }

    fn account_field(&self) -> Option<Account> {
        None
    }

    fn source_field(&self) -> Option<BlockHash> {
        None
    }

    fn link_field(&self) -> Option<Link> {
        None
    }

    fn sideband(&self) -> Option<&BlockSideband> {
        self.sideband.as_ref()
    }

    fn set_sideband(&mut self, sideband: BlockSideband) {
        self.sideband = Some(sideband);
    }
}
