mod block_sideband;
pub use block_sideband::BlockSideband;

mod send_block;
pub use send_block::{SendBlock, SendHashables};

mod receive_block;
pub use receive_block::{ReceiveBlock, ReceiveHashables};

mod open_block;
pub use open_block::{OpenBlock, OpenHashables};

mod change_block;
pub use change_block::{ChangeBlock, ChangeHashables};

mod state_block;
pub use state_block::{StateBlock, StateHashables};

mod builders;
pub use builders::BlockChainBuilder;

use crate::{Account, BlockHash, Link};
use std::{
    ops::{Deref, DerefMut},
    sync::{Arc, RwLock},
};

#[repr(u8)]
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BlockType {
    LegacySend,
    LegacyReceive,
    LegacyOpen,
    LegacyChange,
    State,
}

/// Block hashes are only computed when first asked for and are then reused.
#[derive(Clone, Default)]
pub struct LazyBlockHash {
    hash: Arc<RwLock<BlockHash>>,
}

impl LazyBlockHash {
    pub fn new() -> Self {
        Self {
            hash: Arc::new(RwLock::new(BlockHash::zero())),
        }
    }

    pub fn hash(&self, factory: impl Into<BlockHash>) -> BlockHash {
        let mut value = self.hash.read().unwrap();
        if value.is_zero() {
            drop(value);
            let mut x = self.hash.write().unwrap();
            if x.is_zero() {
                *x = factory.into();
            }
            drop(x);
            value = self.hash.read().unwrap();
        }
        *value
    }
}

impl std::fmt::Debug for LazyBlockHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.hash.read().unwrap().deref(), f)
    }
}

pub trait Block {
    fn block_type(&self) -> BlockType;
    fn hash(&self) -> BlockHash;
    fn previous(&self) -> BlockHash;
    fn account_field(&self) -> Option<Account>;
    /// Source block for legacy open/receive blocks, `None` otherwise.
    fn source_field(&self) -> Option<BlockHash>;
    /// Link field of state blocks, `None` for legacy blocks.
    fn link_field(&self) -> Option<Link>;
    /// Contextual details about a block. Set when the block is held by the
    /// ledger; `None` for a freshly built block.
    fn sideband(&self) -> Option<&BlockSideband>;
    fn set_sideband(&mut self, sideband: BlockSideband);
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BlockEnum {
    LegacySend(SendBlock),
    LegacyReceive(ReceiveBlock),
    LegacyOpen(OpenBlock),
    LegacyChange(ChangeBlock),
    State(StateBlock),
}

impl BlockEnum {
    pub fn as_block(&self) -> &(dyn Block + 'static) {
        match self {
            BlockEnum::LegacySend(b) => b,
            BlockEnum::LegacyReceive(b) => b,
            BlockEnum::LegacyOpen(b) => b,
            BlockEnum::LegacyChange(b) => b,
            BlockEnum::State(b) => b,
        }
    }

    pub fn as_block_mut(&mut self) -> &mut (dyn Block + 'static) {
        match self {
            BlockEnum::LegacySend(b) => b,
            BlockEnum::LegacyReceive(b) => b,
            BlockEnum::LegacyOpen(b) => b,
            BlockEnum::LegacyChange(b) => b,
            BlockEnum::State(b) => b,
        }
    }

    pub fn account(&self) -> Account {
        match self.account_field() {
            Some(account) => account,
            None => self.sideband().unwrap().account,
        }
    }

    pub fn height(&self) -> u64 {
        self.sideband().map(|s| s.height).unwrap_or_default()
    }

    /// The block that an inbound receive takes its funds from. Legacy blocks
    /// carry it in `source`, state blocks in `link`; `source` wins when set.
    pub fn source_or_link(&self) -> BlockHash {
        let source = self.source_field().unwrap_or_default();
        if !source.is_zero() {
            source
        } else {
            self.link_field().unwrap_or_default().into()
        }
    }

    pub fn destination_or_link(&self) -> Account {
        match self {
            BlockEnum::LegacySend(send) => *send.destination(),
            _ => self.link_field().unwrap_or_default().into(),
        }
    }

    pub fn successor(&self) -> Option<BlockHash> {
        let successor = self.sideband()?.successor;
        if successor.is_zero() {
            None
        } else {
            Some(successor)
        }
    }
}

impl Deref for BlockEnum {
    type Target = dyn Block;

    fn deref(&self) -> &Self::Target {
        self.as_block()
    }
}

impl DerefMut for BlockEnum {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_block_mut()
    }
}
