use super::{Block, BlockSideband, BlockType, LazyBlockHash};
use crate::{Account, BlockHash, BlockHashBuilder, Link};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReceiveHashables {
    pub previous: BlockHash,
    pub source: BlockHash,
}

impl From<&ReceiveHashables> for BlockHash {
    fn from(hashables: &ReceiveHashables) -> Self {
        BlockHashBuilder::new()
            .update(hashables.previous.as_bytes())
            .update(hashables.source.as_bytes())
            .build()
    }
}

#[derive(Clone, Debug)]
pub struct ReceiveBlock {
    hashables: ReceiveHashables,
    hash: LazyBlockHash,
    sideband: Option<BlockSideband>,
}

impl ReceiveBlock {
    pub fn new(previous: BlockHash, source: BlockHash) -> Self {
        Self {
            hashables: ReceiveHashables { previous, source },
            hash: LazyBlockHash::new(),
            sideband: None,
        }
    }

    pub fn source(&self) -> BlockHash {
        self.hashables.source
    }
}

impl PartialEq for ReceiveBlock {
    fn eq(&self, other: &Self) -> bool {
        self.hashables == other.hashables && self.sideband == other.sideband
    }
}

impl Eq for ReceiveBlock {}

impl Block for ReceiveBlock {
    fn block_type(&self) -> BlockType {
        BlockType::LegacyReceive
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
