use crate::{
    Account, Amount, BlockEnum, BlockHash, BlockHashBuilder, BlockSideband, ChangeBlock, Link,
    OpenBlock, ReceiveBlock, SendBlock, StateBlock,
};

/// Builds a single account chain with correct sidebands, for tests.
pub struct BlockChainBuilder {
    account: Account,
    blocks: Vec<BlockEnum>,
}

impl BlockChainBuilder {
    pub fn new() -> Self {
        Self::for_account(42)
    }

    pub fn for_account<T: Into<Account>>(account: T) -> Self {
        Self {
            account: account.into(),
            blocks: Vec::new(),
        }
    }

    pub fn height(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub fn open(&self) -> BlockHash {
        self.blocks[0].hash()
    }

    pub fn frontier(&self) -> BlockHash {
        self.blocks.last().unwrap().hash()
    }

    pub fn account(&self) -> Account {
        self.account
    }

    pub fn blocks(&self) -> &[BlockEnum] {
        &self.blocks
    }

    pub fn latest_block(&self) -> &BlockEnum {
        self.blocks.last().unwrap()
    }

    pub fn block_at_height(&self, height: u64) -> &BlockEnum {
        &self.blocks[height as usize - 1]
    }

    fn add_block(&mut self, mut block: BlockEnum) -> &BlockEnum {
        block.set_sideband(BlockSideband::new(
            self.account,
            BlockHash::zero(),
            self.height() + 1,
            1,
        ));

        if !self.blocks.is_empty() {
            let hash = block.hash();
            let previous = self.blocks.last_mut().unwrap();
            let mut sideband = previous.sideband().unwrap().clone();
            sideband.successor = hash;
            previous.set_sideband(sideband);
        }

        self.blocks.push(block);
        self.blocks.last().unwrap()
    }

    /// Opens the account from a send that is not part of the test ledger.
    pub fn legacy_open(self) -> Self {
        let source = external_source(self.account);
        self.legacy_open_with_source(source)
    }

    pub fn legacy_open_from(self, send: &BlockEnum) -> Self {
        assert_eq!(send.destination_or_link(), self.account);
        let source = send.hash();
        self.legacy_open_with_source(source)
    }

    fn legacy_open_with_source(mut self, source: BlockHash) -> Self {
        assert!(self.blocks.is_empty());
        let block = OpenBlock::new(source, self.account, self.account);
        self.add_block(BlockEnum::LegacyOpen(block));
        self
    }

    pub fn legacy_send(self) -> Self {
        self.legacy_send_to(Account::zero())
    }

    pub fn legacy_send_to(mut self, destination: Account) -> Self {
        let block = SendBlock::new(self.frontier(), destination, Amount::zero());
        self.add_block(BlockEnum::LegacySend(block));
        self
    }

    pub fn legacy_receive_from(mut self, send: &BlockEnum) -> Self {
        assert_eq!(send.destination_or_link(), self.account);
        let block = ReceiveBlock::new(self.frontier(), send.hash());
        self.add_block(BlockEnum::LegacyReceive(block));
        self
    }

    pub fn legacy_change(mut self, representative: Account) -> Self {
        let block = ChangeBlock::new(self.frontier(), representative);
        self.add_block(BlockEnum::LegacyChange(block));
        self
    }

    pub fn state_send_to(mut self, destination: Account) -> Self {
        let block = StateBlock::new(
            self.account,
            self.frontier(),
            self.account,
            Amount::zero(),
            destination.into(),
        );
        self.add_block(BlockEnum::State(block));
        self
    }

    /// Adds an epoch upgrade block; its link is the epoch sentinel, not a
    /// real source.
    pub fn state_epoch(mut self, link: Link) -> Self {
        let block = StateBlock::new(
            self.account,
            self.frontier(),
            self.account,
            Amount::zero(),
            link,
        );
        self.add_block(BlockEnum::State(block));
        self
    }

    pub fn state_receive_from(mut self, send: &BlockEnum) -> Self {
        let previous = if self.blocks.is_empty() {
            BlockHash::zero()
        } else {
            self.frontier()
        };
        let block = StateBlock::new(
            self.account,
            previous,
            self.account,
            Amount::zero(),
            send.hash().into(),
        );
        self.add_block(BlockEnum::State(block));
        self
    }

    pub fn take_blocks(self) -> Vec<BlockEnum> {
        self.blocks
    }
}

impl Default for BlockChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn external_source(account: Account) -> BlockHash {
    BlockHashBuilder::new()
        .update(b"external source")
        .update(account.as_bytes())
        .build()
}
