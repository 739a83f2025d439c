use super::{Block, BlockSideband, BlockType, LazyBlockHash};
use crate::{Account, BlockHash, BlockHashBuilder, Link};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OpenHashables {
    /// The send block funding this account
    pub source: BlockHash,
    pub representative: Account,
    pub account: Account,
}

impl From<&OpenHashables> for BlockHash {
    fn from(hashables: &OpenHashables) -> Self {
        BlockHashBuilder::new()
            .update(hashables.source.as_bytes())
            .update(hashables.representative.as_bytes())
            .update(hashables.account.as_bytes())
            .build()
    }
}

#[derive(Clone, Debug)]
pub struct OpenBlock {
    hashables: OpenHashables,
    hash: LazyBlockHash,
    sideband: Option<BlockSideband>,
}

impl OpenBlock {
    pub fn new(source: BlockHash, representative: Account, account: Account) -> Self {
        Self {
            hashables: OpenHashables {
                source,
                representative,
                account,
            },
            hash: LazyBlockHash::new(),
            sideband: None,
        }
    }

    pub fn source(&self) -> BlockHash {
        self.hashables.source
    }

    pub fn account(&self) -> Account {
        self.hashables.account
    }
}

impl PartialEq for OpenBlock {
    fn eq(&self, other: &Self) -> bool {
        self.hashables == other.hashables && self.sideband == other.sideband
    }
}

impl Eq for OpenBlock {}

impl Block for OpenBlock {
    fn block_type(&self) -> BlockType {
        BlockType::LegacyOpen
    }

    fn hash(&self) -> BlockHash {
        self.hash.hash(&self.hashables)
    }

    fn previous(&self) -> BlockHash {
        BlockHash::zero()
    }

    fn account_field(&self) -> Option<Account> {
        Some(self.hashables.account)
    }

    fn source_field(&self) -> Option<BlockHash> {
        Some(self.hashables.source)
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
