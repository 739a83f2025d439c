use super::{Block, BlockSideband, BlockType, LazyBlockHash};
use crate::{Account, BlockHash, BlockHashBuilder, Link};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChangeHashables {
    pub previous: BlockHash,
    pub representative: Account,
}

impl From<&ChangeHashables> for BlockHash {
    fn from(hashables: &ChangeHashables) -> Self {
        BlockHashBuilder::new()
            .update(hashables.previous.as_bytes())
            .update(hashables.representative.as_bytes())
            .build()
    }
}

#[derive(Clone, Debug)]
pub struct ChangeBlock {
    hashables: ChangeHashables,
    hash: LazyBlockHash,
    sideband: Option<BlockSideband>,
}

impl ChangeBlock {
    pub fn new(previous: BlockHash, representative: Account) -> Self {
        Self {
            hashables: ChangeHashables {
                previous,
                representative,
            },
            hash: LazyBlockHash::new(),
            sideband: None,
        }
    }

    pub fn representative(&self) -> Account {
        self.hashables.representative
    }
}

impl PartialEq for ChangeBlock {
    fn eq(&self, other: &Self) -> bool {
        self.hashables == other.hashables && self.sideband == other.sideband
    }
}

impl Eq for ChangeBlock {}

impl Block for ChangeBlock {
    fn block_type(&self) -> BlockType {
        BlockType::LegacyChange
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
