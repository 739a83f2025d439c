use crate::{Account, BlockHash};

/// Ledger metadata stored next to each block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSideband {
    /// 1-based position of the block within its account chain
    pub height: u64,
    pub timestamp: u64,
    /// Successor to the current block, zero at the frontier
    pub successor: BlockHash,
    pub account: Account,
}

impl BlockSideband {
    pub fn new(account: Account, successor: BlockHash, height: u64, timestamp: u64) -> Self {
        Self {
            height,
            timestamp,
            successor,
            account,
        }
    }
}
